use serde_json::Value;

/// A score returned for one revision, decoded once from its JSON shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreDocument {
    /// The scorer could not score the revision (deleted, missing text, ...).
    Error {
        kind: String,
        message: Option<String>,
    },
    /// A class prediction with the full probability distribution, in the
    /// order the document lists the classes.
    Probability {
        prediction: String,
        probability: Vec<(String, f64)>,
    },
    /// Anything else. Kept raw so it can be reported verbatim.
    Unrecognized(Value),
}

impl ScoreDocument {
    /// Decode a score document.
    ///
    /// A `type` key marks an error document. Otherwise a `probability` key
    /// holding an object of numbers marks a probability document. Every other
    /// shape, including a malformed `probability` payload, is unrecognized.
    pub fn from_value(value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return ScoreDocument::Unrecognized(value);
        };

        if let Some(kind) = obj.get("type") {
            return ScoreDocument::Error {
                kind: scalar_text(kind),
                message: obj.get("message").map(scalar_text),
            };
        }

        if let Some(probability) = obj.get("probability") {
            if let Some(document) = decode_probability(obj.get("prediction"), probability) {
                return document;
            }
        }

        ScoreDocument::Unrecognized(value)
    }

    /// Build an error document for a revision the scorer returned nothing for.
    pub fn error(kind: &str, message: impl Into<String>) -> Self {
        ScoreDocument::Error {
            kind: kind.to_string(),
            message: Some(message.into()),
        }
    }
}

fn decode_probability(prediction: Option<&Value>, probability: &Value) -> Option<ScoreDocument> {
    let prediction = match prediction? {
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
        scalar => scalar_text(scalar),
    };

    let probability = probability
        .as_object()?
        .iter()
        .map(|(class, p)| p.as_f64().map(|p| (class.clone(), p)))
        .collect::<Option<Vec<_>>>()?;

    Some(ScoreDocument::Probability {
        prediction,
        probability,
    })
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
