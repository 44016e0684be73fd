//! The individual selection stages. Each one is a pure function from the
//! surviving records to the records that pass it, keeping input order.

use std::cmp::Ordering;

use fxhash::FxHashMap;

use gsift_core::guide_table::GuideRecord;

fn score(record: &GuideRecord) -> Option<f64> {
    record.candidate.relevance_score
}

fn mm(record: &GuideRecord, distance: usize) -> u64 {
    record.histogram.get(distance)
}

/// Keep rows scoring at least `min_score`. Rows without a score fail.
pub fn score_filter(records: Vec<GuideRecord>, min_score: f64) -> Vec<GuideRecord> {
    records
        .into_iter()
        .filter(|r| score(r).is_some_and(|s| s >= min_score))
        .collect()
}

/// Keep rows with `MM0 >= 1`, `MM1 <= mm1_ceiling` and `MM2 <= mm2_ceiling`.
pub fn mismatch_filter(
    records: Vec<GuideRecord>,
    mm1_ceiling: u64,
    mm2_ceiling: u64,
) -> Vec<GuideRecord> {
    records
        .into_iter()
        .filter(|r| mm(r, 0) >= 1 && mm(r, 1) <= mm1_ceiling && mm(r, 2) <= mm2_ceiling)
        .collect()
}

///
/// Per gene, keep rows whose MM0 lies within `tolerance` of the gene's
/// smallest MM0.
///
/// With `{2, 2, 3, 5}` and a tolerance of 1 the gene minimum is 2, so the rows
/// with 2, 2 and 3 are kept.
///
pub fn mm0_tolerance_filter(records: Vec<GuideRecord>, tolerance: u64) -> Vec<GuideRecord> {
    let mut ceilings: FxHashMap<String, u64> = FxHashMap::default();
    for record in &records {
        let mm0 = mm(record, 0);
        ceilings
            .entry(record.candidate.gene_symbol.clone())
            .and_modify(|min0| *min0 = (*min0).min(mm0))
            .or_insert(mm0);
    }
    for min0 in ceilings.values_mut() {
        *min0 = min0.saturating_add(tolerance);
    }

    records
        .into_iter()
        .filter(|r| {
            ceilings
                .get(&r.candidate.gene_symbol)
                .is_some_and(|&ceiling| mm(r, 0) <= ceiling)
        })
        .collect()
}

///
/// Order of preference between two rows sharing a dedup key: higher score,
/// then lower MM0, MM1 and MM2. `Ordering::Less` means `a` is preferred.
///
pub fn preference(a: &GuideRecord, b: &GuideRecord) -> Ordering {
    let a_score = score(a).unwrap_or(f64::NEG_INFINITY);
    let b_score = score(b).unwrap_or(f64::NEG_INFINITY);

    b_score
        .total_cmp(&a_score)
        .then_with(|| mm(a, 0).cmp(&mm(b, 0)))
        .then_with(|| mm(a, 1).cmp(&mm(b, 1)))
        .then_with(|| mm(a, 2).cmp(&mm(b, 2)))
}

///
/// Collapse rows sharing gene and sequence (and target, when `by_target` is
/// set) to the preferred one. Full ties keep the earliest row. The surviving
/// rows appear in the order their keys were first seen.
///
pub fn deduplicate(records: Vec<GuideRecord>, by_target: bool) -> Vec<GuideRecord> {
    let mut slots: FxHashMap<(String, String, Option<String>), usize> = FxHashMap::default();
    let mut kept: Vec<GuideRecord> = Vec::new();

    for record in records {
        let key = (
            record.candidate.gene_symbol.clone(),
            record.candidate.sequence.clone(),
            if by_target {
                record.candidate.target.clone()
            } else {
                None
            },
        );

        match slots.get(&key) {
            Some(&slot) => {
                if preference(&record, &kept[slot]) == Ordering::Less {
                    kept[slot] = record;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(record);
            }
        }
    }

    kept
}

///
/// Per gene, keep the `top_n` best rows under [`preference`]: score first,
/// then lower MM0, MM1 and MM2. Full ties keep their input order. Returns
/// groups ordered by gene name, each already in rank order.
///
pub fn top_n_per_gene(
    records: Vec<GuideRecord>,
    top_n: usize,
) -> Vec<(String, Vec<GuideRecord>)> {
    let mut groups: FxHashMap<String, Vec<GuideRecord>> = FxHashMap::default();
    for record in records {
        groups
            .entry(record.candidate.gene_symbol.clone())
            .or_default()
            .push(record);
    }

    let mut groups: Vec<(String, Vec<GuideRecord>)> = groups.into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    for (_, members) in groups.iter_mut() {
        members.sort_by(preference);
        members.truncate(top_n);
    }

    groups
}
