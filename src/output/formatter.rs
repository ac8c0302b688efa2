use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io;

/// Columns of the result table, in order.
pub const OUTPUT_HEADERS: [&str; 3] = ["rev_id", "prediction", "weighted_sum"];

/// One-character progress marker written per processed revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMark {
    Scored,
    Error,
}

impl ProgressMark {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressMark::Scored => ".",
            ProgressMark::Error => "e",
        }
    }
}

/// Format a weighted sum as the shortest text that reads back to the same
/// value, always keeping a fractional part ("0.0", "3.8", "5.0").
pub fn format_weighted_sum(value: f64) -> String {
    format!("{:?}", value)
}

/// Render an unrecognized score document the way the scoring service's own
/// tooling prints JSON: `", "` and `": "` separators, keys in document order
/// and non-ASCII text escaped as `\uXXXX`.
pub fn format_raw_document(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    // The formatter only ever writes ASCII
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_document_uses_spaced_separators() {
        let value = json!({"foo": "bar", "n": [1, 2.5, null]});
        assert_eq!(
            format_raw_document(&value).unwrap(),
            r#"{"foo": "bar", "n": [1, 2.5, null]}"#
        );
    }

    #[test]
    fn test_raw_document_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": {"y": true, "b": false}}"#).unwrap();
        assert_eq!(
            format_raw_document(&value).unwrap(),
            r#"{"z": 1, "a": {"y": true, "b": false}}"#
        );
    }

    #[test]
    fn test_raw_document_escapes_non_ascii() {
        let value = json!({"title": "Café \u{1F600}", "quote": "a\"b"});
        assert_eq!(
            format_raw_document(&value).unwrap(),
            r#"{"title": "Caf\u00e9 \ud83d\ude00", "quote": "a\"b"}"#
        );
    }

    #[test]
    fn test_raw_scalar_and_empty_containers() {
        assert_eq!(format_raw_document(&Value::Null).unwrap(), "null");
        assert_eq!(format_raw_document(&json!([])).unwrap(), "[]");
        assert_eq!(format_raw_document(&json!({})).unwrap(), "{}");
    }

    #[test]
    fn test_progress_marks() {
        assert_eq!(ProgressMark::Scored.as_str(), ".");
        assert_eq!(ProgressMark::Error.as_str(), "e");
    }

    #[test]
    fn test_format_whole_numbers_keep_decimal() {
        assert_eq!(format_weighted_sum(0.0), "0.0");
        assert_eq!(format_weighted_sum(5.0), "5.0");
    }

    #[test]
    fn test_format_fractional() {
        assert_eq!(format_weighted_sum(3.8), "3.8");
        assert_eq!(format_weighted_sum(2.25), "2.25");
    }

    #[test]
    fn test_format_keeps_full_precision() {
        // No rounding: float noise is written out as-is
        assert_eq!(format_weighted_sum(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_output_headers() {
        assert_eq!(OUTPUT_HEADERS.join("\t"), "rev_id\tprediction\tweighted_sum");
    }
}
