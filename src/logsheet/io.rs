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

//! Finding log files on disk and running each one through a report.

use crate::parser::LogLineParser;
use crate::report::Report;
use crate::types::LogsheetResult;
use crate::writer::ReportWriter;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DEFAULT_EXTENSION: &str = "log";

/// Which files in a directory are treated as access logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    dir: PathBuf,
    extension: String,
    recursive: bool,
}

impl Discovery {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Discovery {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            recursive: false,
        }
    }

    pub fn extension<S>(mut self, extension: S) -> Self
    where
        S: Into<String>,
    {
        self.extension = extension.into();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Return every regular file with the configured extension, sorted by
    /// path. Subdirectories are only searched when recursive.
    pub fn discover(&self) -> LogsheetResult<Vec<PathBuf>> {
        let mut walker = WalkDir::new(&self.dir).min_depth(1).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new(&self.extension)) {
                paths.push(entry.into_path());
            }
        }

        paths.sort();
        Ok(paths)
    }
}

pub fn read_log<P>(path: P) -> LogsheetResult<String>
where
    P: AsRef<Path>,
{
    Ok(fs::read_to_string(path)?)
}

/// Name used for report output of the log at `path`: the file name
/// without its extension.
pub fn report_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Directory that the report for the log at `path` is written to.
///
/// Without an explicit output directory reports are written next to the
/// log. Otherwise the log's location relative to `root` is kept under
/// `output` so that logs with the same name in different directories
/// don't overwrite each other.
pub fn output_dir(path: &Path, root: &Path, output: Option<&Path>) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    match output {
        Some(out) => out.join(parent.strip_prefix(root).unwrap_or_else(|_| Path::new(""))),
        None => parent.to_path_buf(),
    }
}

/// Read, parse, and analyze the log at `path` and write its report.
///
/// Return the paths written or `Ok(None)` if the log had no lines in the
/// expected format, in which case nothing is written.
pub fn process_file<P>(
    parser: &P,
    writer: &dyn ReportWriter,
    path: &Path,
    dir: &Path,
) -> LogsheetResult<Option<Vec<PathBuf>>>
where
    P: LogLineParser,
{
    debug!("Processing {}", path.display());
    let text = read_log(path)?;

    let report = match Report::from_text(parser, &text)? {
        Some(r) => r,
        None => {
            warn!("No access log lines in {}, no report written", path.display());
            return Ok(None);
        }
    };

    let written = writer.write(&report, dir, &report_stem(path))?;
    info!(
        "Wrote report for {} ({} records, {} skipped lines) to {}",
        path.display(),
        report.records.len(),
        report.skipped,
        dir.display()
    );

    Ok(Some(written))
}
