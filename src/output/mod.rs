pub mod formatter;
pub mod run;

pub use formatter::{format_raw_document, format_weighted_sum, ProgressMark, OUTPUT_HEADERS};
pub use run::{run, RunSummary};
