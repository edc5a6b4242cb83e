//! Tabular reports with Markdown, TSV and JSON output.

use std::fmt::Write as _;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A titled table of string cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new<I, S>(title: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Append a row. Short rows are padded with empty cells, long rows cut
    /// to the number of columns.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).take(self.columns.len()).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a Markdown table, cutting cells longer than `width` characters.
    pub fn to_markdown(&self, width: Option<usize>) -> String {
        let header: Vec<String> = self.columns.iter().map(|c| markdown_cell(c, width)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| markdown_cell(c, width)).collect())
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                body.iter()
                    .map(|row| row.get(i).map_or(0, |c| c.chars().count()))
                    .chain(std::iter::once(header[i].chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut out = String::new();
        write_markdown_row(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_markdown_row(&mut out, &rule, &widths);
        for row in &body {
            write_markdown_row(&mut out, row, &widths);
        }
        out
    }

    /// Write the header and rows as tab-separated values.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut tsv = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        tsv.write_record(&self.columns)?;
        for row in &self.rows {
            tsv.write_record(row)?;
        }
        tsv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_tsv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_tsv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn markdown_cell(value: &str, width: Option<usize>) -> String {
    let value = value.replace('|', "\\|").replace('\n', " ");
    match width {
        Some(width) if value.chars().count() > width => {
            let keep = width.saturating_sub(3);
            let mut cut: String = value.chars().take(keep).collect();
            cut.push_str("...");
            cut
        }
        _ => value,
    }
}

fn write_markdown_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        let _ = write!(out, " {:<width$} |", cell, width = *width);
    }
    out.push('\n');
}
