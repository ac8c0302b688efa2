pub mod client;
pub mod model;
pub mod processor;

pub use client::{create_client, ServiceConfig, ServiceError, DEFAULT_USER_AGENT};
pub use model::ModelInfo;
pub use processor::{extract_scores, RemoteScoreProcessor};
