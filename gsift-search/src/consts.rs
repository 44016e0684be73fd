pub const DEFAULT_MAX_MISMATCHES: usize = 5;
pub const MAX_SUPPORTED_MISMATCHES: usize = 8;
pub const DEFAULT_CHUNK_SIZE: usize = 1200;

/// Environment variable read by the `gsift search` binary for its worker count.
pub const THREADS_ENV_VAR: &str = "GSIFT_THREADS";

/// Extended output columns, written after the histogram.
pub const SAME_GENE_TRANSCRIPTS_COLUMN: &str = "MM0_Same_Gene_Transcripts";
pub const SAME_GENE_OCCURRENCES_COLUMN: &str = "MM0_Same_Gene_Occurrences";
pub const OTHER_GENE_TRANSCRIPTS_COLUMN: &str = "MM0_Other_Gene_Transcripts";
pub const OTHER_GENE_OCCURRENCES_COLUMN: &str = "MM0_Other_Gene_Occurrences";
