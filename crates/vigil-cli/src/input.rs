// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::CliError;
use std::fs;
use std::path::Path;
use vigil_core::Record;

/// Reads records from a `.json`, `.jsonl`/`.ndjson` or `.csv` file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, CliError> {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(|| {
            CliError::not_supported(format!(
                "unable to infer input format for '{}'; expected .json, .jsonl, .ndjson or .csv",
                path.display()
            ))
        })?;

    let raw = fs::read_to_string(path)
        .map_err(|source| CliError::io(format!("failed to read '{}'", path.display()), source))?;

    let records = match extension.as_str() {
        "json" => parse_json_records(&raw)?,
        "jsonl" | "ndjson" => parse_json_lines(&raw)?,
        "csv" => parse_csv_records(&raw)?,
        _ => {
            return Err(CliError::not_supported(format!(
                "unsupported input format '{extension}'; expected .json, .jsonl, .ndjson or .csv"
            )));
        }
    };
    tracing::info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

pub fn parse_json_records(raw: &str) -> Result<Vec<Record>, CliError> {
    serde_json::from_str(raw)
        .map_err(|source| CliError::json("failed to parse JSON record array", source))
}

pub fn parse_json_lines(raw: &str) -> Result<Vec<Record>, CliError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| {
                CliError::json(format!("failed to parse JSON record on line {}", idx + 1), source)
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Timestamp,
    Region,
    SubRegion,
    Label,
    Source,
    SentimentScore,
    SentimentLabel,
}

impl Column {
    fn from_header(raw: &str) -> Option<Self> {
        match raw.trim() {
            "timestamp" | "date" => Some(Self::Timestamp),
            "region" | "adm1_name_final" => Some(Self::Region),
            "sub_region" | "adm2_name_final" => Some(Self::SubRegion),
            "label" | "Label" => Some(Self::Label),
            "source" | "retrieve_source" => Some(Self::Source),
            "sentiment_score" => Some(Self::SentimentScore),
            "sentiment_label" | "sentiment" => Some(Self::SentimentLabel),
            _ => None,
        }
    }
}

/// Parses CSV with a mandatory header row.
///
/// Unknown columns are ignored; empty cells are missing values. A sentiment
/// score that is not a number is treated as missing.
pub fn parse_csv_records(raw: &str) -> Result<Vec<Record>, CliError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let rows = split_csv(raw)?;
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| CliError::invalid_input("CSV input is empty; a header row is required"))?;

    let columns: Vec<Option<Column>> = header.iter().map(|name| Column::from_header(name)).collect();
    if !columns.contains(&Some(Column::Timestamp)) {
        return Err(CliError::invalid_input(
            "CSV header must include a 'timestamp' (or 'date') column",
        ));
    }

    let mut records = Vec::new();
    for fields in rows {
        if fields.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let mut record = Record::default();
        for (column, field) in columns.iter().zip(fields) {
            let Some(column) = column else {
                continue;
            };
            if field.trim().is_empty() {
                continue;
            }
            match column {
                Column::Timestamp => record.timestamp = Some(field),
                Column::Region => record.region = Some(field),
                Column::SubRegion => record.sub_region = Some(field),
                Column::Label => record.label = Some(field),
                Column::Source => record.source = Some(field),
                Column::SentimentScore => record.sentiment_score = field.trim().parse().ok(),
                Column::SentimentLabel => record.sentiment_label = Some(field),
            }
        }
        records.push(record);
    }
    Ok(records)
}

/// RFC 4180 tokenizer: quoted fields may contain commas, newlines and
/// doubled quotes. Accepts `\n` and `\r\n` line endings.
fn split_csv(raw: &str) -> Result<Vec<Vec<String>>, CliError> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            '"' => {
                return Err(CliError::invalid_input(format!(
                    "CSV line {line}: unexpected quote inside unquoted field"
                )));
            }
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                line += 1;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(CliError::invalid_input(format!(
            "CSV line {line}: unterminated quoted field"
        )));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}
