pub mod cache;
pub mod document;
pub mod processor;
pub mod weights;

pub use cache::FeatureCache;
pub use document::ScoreDocument;
pub use processor::{batches, Batch, RevIds, ScoreProcessor, ScoreStream, ScoredRevision};
pub use weights::{class_weight, weighted_sum, ScoringError, CLASS_WEIGHTS};
