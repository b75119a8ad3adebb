//! CSV sheet parsing and serialization
//!
//! Data interface behind the spreadsheet import/export UI. Import follows
//! the simple comma-split format the tool has always accepted: headers on
//! the first line, cells trimmed, blank lines skipped, missing trailing
//! cells treated as empty. Quoted cells are not interpreted on import;
//! export adds quoting for cells containing commas or quotes.

use std::collections::HashMap;

use chrono::Utc;

use crate::types::SheetRow;

/// A parsed spreadsheet: ordered headers plus one row per data line
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// Mint a batch-unique row identifier.
///
/// Combines the row's import index with the current time in milliseconds,
/// so identities stay unique across re-imports within a session.
pub fn mint_row_id(index: usize) -> String {
    format!("row-{index}-{}", Utc::now().timestamp_millis())
}

/// Parse CSV text into a [`Sheet`].
///
/// Empty or whitespace-only input yields an empty sheet rather than an
/// error, matching the import form's behavior.
pub fn parse_sheet(csv_text: &str) -> Sheet {
    let mut lines = csv_text.trim().lines();
    let Some(header_line) = lines.next() else {
        return Sheet::default();
    };

    let headers: Vec<String> = header_line.split(',').map(|h| h.trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Sheet::default();
    }

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        let mut values = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let cell = cells.get(index).map_or("", |c| c.trim());
            values.insert(header.clone(), cell.to_string());
        }
        rows.push(SheetRow::new(mint_row_id(rows.len()), values));
    }

    Sheet { headers, rows }
}

/// Serialize rows back into CSV text using the given header order.
///
/// Missing cells serialize as empty strings; cells containing commas or
/// quotes are quoted with doubled inner quotes.
pub fn serialize_sheet(headers: &[String], rows: &[HashMap<String, String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.iter().map(|h| escape_cell(h)).collect::<Vec<_>>().join(","));

    for row in rows {
        let line = headers
            .iter()
            .map(|header| escape_cell(row.get(header).map_or("", String::as_str)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

fn escape_cell(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
