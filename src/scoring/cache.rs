use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Precomputed feature and datasource values handed to the scorer as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCache(Map<String, Value>);

impl FeatureCache {
    /// Parse the `--cache` argument. Absent or blank means an empty cache.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(raw) => raw,
        };

        let value: Value =
            serde_json::from_str(raw).context("Failed to parse --cache: invalid JSON")?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => bail!(
                "Failed to parse --cache: expected a JSON object, got {}",
                json_kind(&other)
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cache_is_empty() {
        assert!(FeatureCache::parse(None).unwrap().is_empty());
    }

    #[test]
    fn test_blank_cache_is_empty() {
        assert!(FeatureCache::parse(Some("")).unwrap().is_empty());
        assert!(FeatureCache::parse(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn test_absent_equals_empty_object() {
        assert_eq!(
            FeatureCache::parse(None).unwrap(),
            FeatureCache::parse(Some("{}")).unwrap()
        );
    }

    #[test]
    fn test_parses_object() {
        let cache = FeatureCache::parse(Some(
            r#"{"feature.wikitext.revision.chars": 1200, "datasource.revision.text": "foo"}"#,
        ))
        .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalid_json_fails() {
        let err = FeatureCache::parse(Some("{not json")).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_non_object_fails() {
        let err = FeatureCache::parse(Some("[1, 2]")).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
