use std::io::BufRead;
use thiserror::Error;

use super::types::RevId;
use crate::tsv::{TsvError, TsvReader};

/// Column holding the latest revision id in page dumps.
pub const DEFAULT_REV_ID_COLUMN: &str = "page_latest";

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Tsv(#[from] TsvError),

    #[error("line {line}: invalid revision id '{value}'")]
    InvalidRevId { line: usize, value: String },
}

/// Resolve `column` in the header of `input` and lazily parse one revision id
/// per record, in input order.
///
/// A missing column fails here, before anything is read past the header. A
/// record whose field is not a positive integer (including `NULL`) yields an
/// `InvalidRevId` error at its position in the sequence.
pub fn rev_ids<R: BufRead>(
    input: R,
    column: &str,
) -> Result<impl Iterator<Item = anyhow::Result<RevId>>, InputError> {
    let reader = TsvReader::new(input)?;

    // Headerless input has no records to look the column up in.
    let index = if reader.headers().is_empty() {
        0
    } else {
        reader.column_index(column)?
    };

    Ok(reader.map(move |row| -> anyhow::Result<RevId> {
        let row = row.map_err(InputError::from)?;
        let value = row.get(index);
        let rev_id = value
            .and_then(|v| v.parse::<RevId>().ok())
            .ok_or_else(|| InputError::InvalidRevId {
                line: row.line,
                value: value.unwrap_or("NULL").to_string(),
            })?;
        Ok(rev_id)
    }))
}
