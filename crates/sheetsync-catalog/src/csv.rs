//! Minimal CSV reader for spreadsheet exports.
//!
//! Splits on newlines, treats the first non-blank line as the header, and
//! scans each data line with a quote-toggle state so commas inside quoted
//! fields stay in the field. Rows whose field count differs from the header
//! count are dropped silently; exports routinely end with ragged or blank
//! lines and none of them are worth surfacing.

use std::collections::HashMap;

/// One data line of the document keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Returns the raw cell for `header`, or `None` when the document has no
    /// such column.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parses delimited text into rows keyed by the header line.
///
/// A blank or whitespace-only document yields no rows. Output order matches
/// line order and is deterministic for identical input.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_fields(header_line);

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let values = split_fields(line);
        if values.len() != headers.len() {
            tracing::debug!(
                line = idx + 2,
                expected = headers.len(),
                found = values.len(),
                "dropping row with mismatched field count"
            );
            continue;
        }
        rows.push(headers.iter().cloned().zip(values).collect());
    }
    rows
}

/// Splits one line into trimmed fields.
///
/// Outside quotes a `"` opens a quoted section; inside one, `""` is a literal
/// quote and a lone `"` closes it. Quote characters never end up in a field.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quote && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quote = !in_quote,
            ',' if !in_quote => fields.push(finish_field(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(finish_field(&mut current));
    fields
}

fn finish_field(current: &mut String) -> String {
    let field = current.trim().to_string();
    current.clear();
    field
}
