use thiserror::Error;

/// Ordinal rank of each article quality class, lowest to highest.
pub static CLASS_WEIGHTS: [(&str, u32); 6] = [
    ("Stub", 0),
    ("Start", 1),
    ("C", 2),
    ("B", 3),
    ("GA", 4),
    ("FA", 5),
];

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("unknown quality class '{0}'")]
    UnknownClass(String),
}

pub fn class_weight(class: &str) -> Result<u32, ScoringError> {
    CLASS_WEIGHTS
        .iter()
        .find(|(label, _)| *label == class)
        .map(|(_, weight)| *weight)
        .ok_or_else(|| ScoringError::UnknownClass(class.to_string()))
}

/// Expected class rank under `probability`: the dot product of class weights
/// with class probabilities, summed in the order given. Probabilities are
/// trusted as given.
pub fn weighted_sum(probability: &[(String, f64)]) -> Result<f64, ScoringError> {
    probability.iter().try_fold(0.0, |sum, (class, p)| {
        Ok(sum + class_weight(class)? as f64 * p)
    })
}
