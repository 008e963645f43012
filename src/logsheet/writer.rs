// Logsheet - Summarize Apache-style access logs into spreadsheet reports
//
// Copyright 2018 TSH Labs
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Persist reports as CSV tables or a single JSON document.

use crate::report::Report;
use crate::types::{LogsheetError, LogsheetResult};
use csv::Writer;
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

const RECORD_COLUMNS: &[&str] = &["address", "timestamp", "method", "resource", "status", "size", "user_agent"];
const CLIENT_COLUMNS: &[&str] = &["address", "count", "earliest", "latest"];
const STATUS_COLUMNS: &[&str] = &["label", "count"];
const RESOURCE_COLUMNS: &[&str] = &["resource", "address", "count"];

/// Destination for the tables of a `Report`.
pub trait ReportWriter {
    /// Write `report` into the directory `dir`, naming output after `stem`,
    /// and return the paths of every file written. The directory is
    /// created if it doesn't exist.
    fn write(&self, report: &Report, dir: &Path, stem: &str) -> LogsheetResult<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn writer(&self) -> Box<dyn ReportWriter> {
        match *self {
            OutputFormat::Csv => Box::new(CsvReportWriter),
            OutputFormat::Json => Box::new(JsonReportWriter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LogsheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(LogsheetError::ParseError(s.to_string())),
        }
    }
}

/// Write each table of a report to its own CSV file.
///
/// For a stem of `access` the files are `access.records.csv`,
/// `access.top_clients.csv`, `access.status_codes.csv`, and
/// `access.top_resources.csv`. Either all four are written or none are.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportWriter;

impl CsvReportWriter {
    fn write_records<W: Write>(report: &Report, writer: &mut Writer<W>) -> LogsheetResult<()> {
        writer.write_record(RECORD_COLUMNS)?;

        for r in &report.records {
            writer.write_record(&[
                r.client_address.clone(),
                r.timestamp.to_string(),
                r.method.to_string(),
                r.resource.clone(),
                r.status.to_string(),
                r.size.to_string(),
                r.user_agent.clone(),
            ])?;
        }

        Ok(())
    }

    fn write_top_clients<W: Write>(report: &Report, writer: &mut Writer<W>) -> LogsheetResult<()> {
        let months = (1..=12).map(|m| m.to_string());
        let header: Vec<String> = CLIENT_COLUMNS.iter().map(|c| c.to_string()).chain(months).collect();
        writer.write_record(&header)?;

        for c in &report.top_clients {
            let mut row = vec![
                c.address.clone(),
                c.count.to_string(),
                c.earliest.to_string(),
                c.latest.to_string(),
            ];
            row.extend(c.monthly.iter().map(|n| n.to_string()));
            writer.write_record(&row)?;
        }

        Ok(())
    }

    fn write_status_codes<W: Write>(report: &Report, writer: &mut Writer<W>) -> LogsheetResult<()> {
        writer.write_record(STATUS_COLUMNS)?;

        for s in &report.status_codes {
            writer.write_record(&[s.key.to_string(), s.count.to_string()])?;
        }

        Ok(())
    }

    fn write_top_resources<W: Write>(report: &Report, writer: &mut Writer<W>) -> LogsheetResult<()> {
        writer.write_record(RESOURCE_COLUMNS)?;

        for r in &report.top_resources {
            writer.write_record(&[r.resource.clone(), r.address.clone(), r.count.to_string()])?;
        }

        Ok(())
    }

    /// Write one table to a temporary file in `dir`.
    fn stage<F>(dir: &Path, fill: F) -> LogsheetResult<NamedTempFile>
    where
        F: FnOnce(&mut Writer<&mut NamedTempFile>) -> LogsheetResult<()>,
    {
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = Writer::from_writer(&mut tmp);
            fill(&mut writer)?;
            writer.flush()?;
        }

        Ok(tmp)
    }
}

impl ReportWriter for CsvReportWriter {
    fn write(&self, report: &Report, dir: &Path, stem: &str) -> LogsheetResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let staged = vec![
            (
                Self::stage(dir, |w| Self::write_records(report, w))?,
                dir.join(format!("{}.records.csv", stem)),
            ),
            (
                Self::stage(dir, |w| Self::write_top_clients(report, w))?,
                dir.join(format!("{}.top_clients.csv", stem)),
            ),
            (
                Self::stage(dir, |w| Self::write_status_codes(report, w))?,
                dir.join(format!("{}.status_codes.csv", stem)),
            ),
            (
                Self::stage(dir, |w| Self::write_top_resources(report, w))?,
                dir.join(format!("{}.top_resources.csv", stem)),
            ),
        ];

        commit(staged)
    }
}

/// Write all tables of a report to a single `<stem>.json` document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportWriter;

impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &Report, dir: &Path, stem: &str) -> LogsheetResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.flush()?;
        }

        commit(vec![(tmp, dir.join(format!("{}.json", stem)))])
    }
}

/// Move fully written temporary files to their final paths.
///
/// If any move fails the files already moved are removed again and
/// the remaining temporary files are deleted when dropped.
fn commit(staged: Vec<(NamedTempFile, PathBuf)>) -> LogsheetResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());

    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(&path) {
            for done in &written {
                let _ = fs::remove_file(done);
            }

            return Err(io::Error::from(e).into());
        }

        written.push(path);
    }

    Ok(written)
}
