use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use log::{info, warn};
use serde::Serialize;

use gsift_core::errors::{ConfigurationError, GuideTableError};
use gsift_core::guide_table::{GENE_COLUMN, GuideTable, LOCATIONS_COLUMN, SEQUENCE_COLUMN};
use gsift_core::models::{LocationSplit, MatchLocation, parse_locations};

/// How many DIFFERENT_GENES guides the summary lists.
pub const MOST_CONCERNING_LIMIT: usize = 10;

pub const CATEGORY_COLUMNS: [&str; 11] = [
    "Gene",
    "Sequence",
    "MM0",
    "Total_Matches",
    "Category",
    "Same_Gene_Transcripts",
    "Same_Gene_Transcript_Count",
    "Same_Gene_Occurrences",
    "Other_Gene_Transcripts",
    "Other_Gene_Transcript_Count",
    "Other_Gene_Occurrences",
];

/// Where the perfect matches of a candidate fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Only isoforms of the candidate's own gene.
    SameGeneOnly,
    DifferentGenes,
    NoMatches,
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::SameGeneOnly => "SAME_GENE_ONLY",
            Category::DifferentGenes => "DIFFERENT_GENES",
            Category::NoMatches => "NO_MATCHES",
        };
        write!(f, "{}", name)
    }
}

pub fn categorize(gene_symbol: &str, locations: &[MatchLocation]) -> Category {
    if locations.is_empty() {
        Category::NoMatches
    } else if locations.iter().all(|l| l.is_same_gene(gene_symbol)) {
        Category::SameGeneOnly
    } else {
        Category::DifferentGenes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub gene_symbol: String,
    pub sequence: String,
    /// MM0 as reported by the search, when the table carries it.
    pub mm0: Option<u64>,
    pub category: Category,
    pub split: LocationSplit,
}

impl CategoryReport {
    pub fn new(
        gene_symbol: &str,
        sequence: &str,
        mm0: Option<u64>,
        locations: &[MatchLocation],
    ) -> Self {
        CategoryReport {
            gene_symbol: gene_symbol.to_string(),
            sequence: sequence.to_string(),
            mm0,
            category: categorize(gene_symbol, locations),
            split: LocationSplit::new(gene_symbol, locations),
        }
    }

    pub fn total_matches(&self) -> u64 {
        self.split.same_gene_occurrences + self.split.other_gene_occurrences
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.gene_symbol.clone(),
            self.sequence.clone(),
            self.mm0.map(|m| m.to_string()).unwrap_or_default(),
            self.total_matches().to_string(),
            self.category.to_string(),
            self.split.same_gene_labels.join(", "),
            self.split.same_gene_labels.len().to_string(),
            self.split.same_gene_occurrences.to_string(),
            self.split.other_gene_labels.join(", "),
            self.split.other_gene_labels.len().to_string(),
            self.split.other_gene_occurrences.to_string(),
        ]
    }
}

///
/// Categorize every row of an extended search table.
///
pub fn categorize_table(table: &GuideTable) -> Result<Vec<CategoryReport>, ConfigurationError> {
    let gene_col = table.require_column(GENE_COLUMN)?;
    let seq_col = table.require_column(SEQUENCE_COLUMN)?;
    let loc_col = table.require_column(LOCATIONS_COLUMN)?;
    let mm0_col = table.column("MM0");

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let locations = parse_locations(&row[loc_col]).map_err(|_| {
                ConfigurationError::InvalidField {
                    column: LOCATIONS_COLUMN.to_string(),
                    row: i + 1,
                    value: row[loc_col].clone(),
                }
            })?;

            let mm0 = match mm0_col {
                Some(col) => Some(row[col].parse::<u64>().map_err(|_| {
                    ConfigurationError::InvalidField {
                        column: "MM0".to_string(),
                        row: i + 1,
                        value: row[col].clone(),
                    }
                })?),
                None => None,
            };

            Ok(CategoryReport::new(&row[gene_col], &row[seq_col], mm0, &locations))
        })
        .collect()
}

pub fn reports_to_table(reports: &[CategoryReport]) -> Result<GuideTable, GuideTableError> {
    let mut table = GuideTable::new(CATEGORY_COLUMNS.iter().map(|c| c.to_string()).collect());
    for report in reports {
        table.push_row(report.to_row())?;
    }
    Ok(table)
}

/// A guide with perfect matches outside its own gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcerningGuide {
    pub gene_symbol: String,
    pub sequence: String,
    pub mm0: Option<u64>,
    pub other_gene_transcripts: Vec<String>,
    pub other_gene_occurrences: u64,
}

impl From<&CategoryReport> for ConcerningGuide {
    fn from(report: &CategoryReport) -> Self {
        ConcerningGuide {
            gene_symbol: report.gene_symbol.clone(),
            sequence: report.sequence.clone(),
            mm0: report.mm0,
            other_gene_transcripts: report.split.other_gene_labels.clone(),
            other_gene_occurrences: report.split.other_gene_occurrences,
        }
    }
}

///
/// Totals per category, plus for each gene the union of transcripts its
/// candidates hit within the gene and the highest MM0 among its candidates.
/// `most_concerning` holds up to [`MOST_CONCERNING_LIMIT`] DIFFERENT_GENES
/// guides, most other-gene occurrences first.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub total: usize,
    pub per_category: BTreeMap<Category, usize>,
    pub same_gene_transcripts: BTreeMap<String, BTreeSet<String>>,
    pub max_mm0: BTreeMap<String, u64>,
    pub most_concerning: Vec<ConcerningGuide>,
}

impl CategorySummary {
    pub fn new(reports: &[CategoryReport]) -> Self {
        let mut summary = CategorySummary {
            total: reports.len(),
            ..Default::default()
        };

        for report in reports {
            *summary.per_category.entry(report.category).or_default() += 1;
            summary
                .same_gene_transcripts
                .entry(report.gene_symbol.clone())
                .or_default()
                .extend(report.split.same_gene_labels.iter().cloned());

            if let Some(mm0) = report.mm0 {
                let max = summary
                    .max_mm0
                    .entry(report.gene_symbol.clone())
                    .or_default();
                *max = (*max).max(mm0);
            }
        }

        let mut concerning: Vec<ConcerningGuide> = reports
            .iter()
            .filter(|r| r.category == Category::DifferentGenes)
            .map(ConcerningGuide::from)
            .collect();
        concerning.sort_by(|a, b| b.other_gene_occurrences.cmp(&a.other_gene_occurrences));
        concerning.truncate(MOST_CONCERNING_LIMIT);
        summary.most_concerning = concerning;

        summary
    }

    pub fn count(&self, category: Category) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }

    pub fn log(&self) {
        info!("Guides analysed: {}", self.total);
        for category in [Category::SameGeneOnly, Category::DifferentGenes, Category::NoMatches] {
            let n = self.count(category);
            let pct = if self.total == 0 {
                0.0
            } else {
                n as f64 * 100.0 / self.total as f64
            };
            info!("{}: {} ({:.1}%)", category, n, pct);
        }
        for (gene, transcripts) in &self.same_gene_transcripts {
            let names: Vec<&str> = transcripts.iter().map(String::as_str).collect();
            match self.max_mm0.get(gene) {
                Some(max) => info!("{}: max MM0 {}, {}", gene, max, names.join(", ")),
                None => info!("{}: {}", gene, names.join(", ")),
            }
        }

        if self.most_concerning.is_empty() {
            info!("No guides match other genes");
        }
        for guide in &self.most_concerning {
            warn!(
                "{} {}: {} other-gene hits in {}",
                guide.gene_symbol,
                guide.sequence,
                guide.other_gene_occurrences,
                guide.other_gene_transcripts.join(", ")
            );
        }
    }
}
