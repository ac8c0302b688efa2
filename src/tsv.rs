//! MySQL-style tab-separated values.
//!
//! The first line is a header row. Fields are separated by a single tab and
//! escape tab, newline, carriage return, NUL and backslash with a backslash.
//! The literal field `NULL` stands for a missing value.

use std::io::{BufRead, Lines, Write};
use thiserror::Error;

const NULL: &str = "NULL";

#[derive(Debug, Error)]
pub enum TsvError {
    #[error("I/O error reading TSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{column}' not found in TSV header (have: {})", .headers.join(", "))]
    MissingColumn { column: String, headers: Vec<String> },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// One data row, with its 1-based line number in the source stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvRow {
    pub line: usize,
    pub fields: Vec<Option<String>>,
}

impl TsvRow {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }
}

/// Lazy reader over a header-prefixed TSV stream.
pub struct TsvReader<R> {
    lines: Lines<R>,
    headers: Vec<String>,
    line_number: usize,
}

impl<R: BufRead> TsvReader<R> {
    /// Read the header row. An empty stream gives a reader with no headers
    /// and no rows.
    pub fn new(reader: R) -> Result<Self, TsvError> {
        let mut lines = reader.lines();
        let headers = match lines.next() {
            Some(line) => split_fields(&line?)
                .into_iter()
                .map(|f| f.unwrap_or_else(|| NULL.to_string()))
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            lines,
            headers,
            line_number: 1,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of `name` in the header row.
    pub fn column_index(&self, name: &str) -> Result<usize, TsvError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TsvError::MissingColumn {
                column: name.to_string(),
                headers: self.headers.clone(),
            })
    }
}

impl<R: BufRead> Iterator for TsvReader<R> {
    type Item = Result<TsvRow, TsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            if line.is_empty() {
                continue;
            }

            let fields = split_fields(&line);
            if fields.len() != self.headers.len() {
                return Some(Err(TsvError::FieldCount {
                    line: self.line_number,
                    expected: self.headers.len(),
                    found: fields.len(),
                }));
            }

            return Some(Ok(TsvRow {
                line: self.line_number,
                fields,
            }));
        }
    }
}

/// Writer that emits the header row up front and escapes every field.
pub struct TsvWriter<W: Write> {
    inner: W,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(mut inner: W, headers: &[&str]) -> std::io::Result<Self> {
        let header_row: Vec<Option<&str>> = headers.iter().map(|h| Some(*h)).collect();
        write_fields(&mut inner, &header_row)?;
        Ok(Self { inner })
    }

    pub fn write_row(&mut self, fields: &[Option<&str>]) -> std::io::Result<()> {
        write_fields(&mut self.inner, fields)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn write_fields<W: Write>(out: &mut W, fields: &[Option<&str>]) -> std::io::Result<()> {
    let encoded: Vec<String> = fields
        .iter()
        .map(|f| match f {
            Some(value) => escape(value),
            None => NULL.to_string(),
        })
        .collect();
    writeln!(out, "{}", encoded.join("\t"))
}

fn split_fields(line: &str) -> Vec<Option<String>> {
    line.split('\t')
        .map(|raw| if raw == NULL { None } else { Some(unescape(raw)) })
        .collect()
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            // Unknown escapes are kept as written
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
