//! Decoder implementations

use super::types::{ColumnMap, RecordDecoder, REPORT_CSV_DELIMITER};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Byte order mark some report bodies start with
const BOM: char = '\u{feff}';

// ============================================================================
// Report CSV Decoder
// ============================================================================

/// Decoder for statistics report CSV bodies.
///
/// The header row carries provider labels ("Advertiser ID", "Impressions");
/// each is renamed to its schema field through the `ColumnMap`. Values are
/// kept as strings for the record transformer to coerce.
#[derive(Debug, Clone)]
pub struct ReportCsvDecoder {
    /// Field delimiter
    delimiter: char,
    /// Header label mapping
    columns: ColumnMap,
}

impl ReportCsvDecoder {
    /// Create a decoder with the report delimiter
    pub fn new(columns: ColumnMap) -> Self {
        Self {
            delimiter: REPORT_CSV_DELIMITER,
            columns,
        }
    }

    /// Use a different delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Map header labels to field names
    fn resolve_headers(&self, header_line: &str) -> Result<Vec<String>> {
        let labels = parse_csv_line(header_line, self.delimiter);

        for required in self.columns.required_labels() {
            if !labels.iter().any(|l| l == required) {
                return Err(Error::csv(format!(
                    "report header is missing column '{required}'"
                )));
            }
        }

        labels
            .iter()
            .map(|label| {
                self.columns
                    .field_for(label)
                    .map(str::to_string)
                    .ok_or_else(|| Error::csv(format!("unknown report column '{label}'")))
            })
            .collect()
    }
}

impl RecordDecoder for ReportCsvDecoder {
    fn decode(&self, body: &str) -> Result<Vec<JsonObject>> {
        let body = body.trim_start_matches(BOM);
        let mut lines = split_records(body)
            .into_iter()
            .filter(|l| !l.trim().is_empty());

        let Some(header_line) = lines.next() else {
            return Ok(Vec::new());
        };
        let headers = self.resolve_headers(header_line)?;

        let mut rows = Vec::new();
        for line in lines {
            let fields = parse_csv_line(line, self.delimiter);
            if fields.len() > headers.len() {
                return Err(Error::csv(format!(
                    "row has {} values but the header has {} columns",
                    fields.len(),
                    headers.len()
                )));
            }

            let mut row = JsonObject::new();
            for (i, field) in headers.iter().enumerate() {
                let value = fields.get(i).cloned().unwrap_or_default();
                row.insert(field.clone(), JsonValue::String(value));
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Split a CSV body into records; newlines inside quoted fields do not end a record
fn split_records(body: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                records.push(body[start..i].trim_end_matches('\r'));
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < body.len() {
        records.push(body[start..].trim_end_matches('\r'));
    }
    records
}

/// Parse a CSV line into fields
fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                // Escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current = String::new();
        } else {
            current.push(c);
        }
    }

    fields.push(current.trim().to_string());
    fields
}
