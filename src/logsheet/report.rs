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

//! Turn the contents of one log file into the tables of its report.

use crate::clients::{top_clients, ClientRow};
use crate::parser::LogLineParser;
use crate::resources::{top_resources, ResourceRow};
use crate::status::{status_codes, StatusRow};
use crate::types::{LogsheetError, LogsheetResult, RecordStore};

/// Parsed records of one log file and the analyses computed from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub records: RecordStore,
    pub top_clients: Vec<ClientRow>,
    pub status_codes: Vec<StatusRow>,
    pub top_resources: Vec<ResourceRow>,
    /// Lines that did not match the log format.
    #[serde(skip)]
    pub skipped: usize,
}

impl Report {
    /// Parse every line of `text` and build a report from the lines that
    /// matched, in the order they appear.
    ///
    /// Lines that don't match are skipped. Return `Ok(None)` if no line
    /// matched at all. Return an error, and no report, if a matching line
    /// has a timestamp that isn't a real date and time.
    pub fn from_text<P>(parser: &P, text: &str) -> LogsheetResult<Option<Report>>
    where
        P: LogLineParser,
    {
        let mut store = RecordStore::new();
        let mut skipped = 0;

        for (num, line) in text.lines().enumerate() {
            match parser.parse(line) {
                Ok(record) => store.push(record),
                Err(LogsheetError::ParseError(_)) => {
                    trace!("Skipping line {}: no match", num + 1);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self::from_store(store).map(|mut report| {
            report.skipped = skipped;
            report
        }))
    }

    /// Run every analysis over `store`. Return `None` if the store is empty.
    pub fn from_store(store: RecordStore) -> Option<Report> {
        if store.is_empty() {
            return None;
        }

        let top_clients = top_clients(&store);
        let status_codes = status_codes(&store);
        let top_resources = top_resources(&store);

        Some(Report {
            records: store,
            top_clients,
            status_codes,
            top_resources,
            skipped: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Report;
    use crate::parser::AccessLogLineParser;
    use crate::status::StatusKey;
    use crate::types::{LogsheetError, RecordStore};

    const LOG: &str = concat!(
        "10.0.0.1 - - [10/Jan/2023:10:00:00 +0000] \"GET /index.html HTTP/1.1\" 200 512 \"-\" \"curl/8.0\"\n",
        "not a log line\n",
        "10.0.0.1 - - [11/Feb/2023:10:00:00 +0000] \"GET /missing HTTP/1.1\" 404 0 \"-\" \"curl/8.0\"\n",
        "10.0.0.2 - - [12/Feb/2023:10:00:00 +0000] \"POST /index.html HTTP/1.1\" 200 64 \"-\" \"Mozilla/5.0\"\n",
        "10.0.0.3 - - [12/Feb/2023:10:00:00 +0000] \"DELETE /index.html HTTP/1.1\" 200 64 \"-\" \"Mozilla/5.0\"\n",
    );

    #[test]
    fn test_from_text() {
        let parser = AccessLogLineParser::new();
        let report = Report::from_text(&parser, LOG).unwrap().unwrap();

        assert_eq!(3, report.records.len());
        assert_eq!(2, report.skipped);
        assert_eq!("10.0.0.1", report.top_clients[0].address);
        assert_eq!(2, report.top_clients[0].count);
        assert_eq!(3, report.status_codes.len());
        assert_eq!(StatusKey::Other, report.status_codes[2].key);
        assert_eq!(3, report.top_resources.len());
    }

    #[test]
    fn test_from_text_windows_line_endings() {
        let parser = AccessLogLineParser::new();
        let text = LOG.replace('\n', "\r\n");
        let report = Report::from_text(&parser, &text).unwrap().unwrap();
        assert_eq!(3, report.records.len());
    }

    #[test]
    fn test_from_text_no_matches() {
        let parser = AccessLogLineParser::new();
        assert!(Report::from_text(&parser, "garbage\nmore garbage\n").unwrap().is_none());
        assert!(Report::from_text(&parser, "").unwrap().is_none());
    }

    #[test]
    fn test_from_text_bad_timestamp_aborts() {
        let parser = AccessLogLineParser::new();
        let text = format!(
            "{}10.0.0.9 - - [30/Feb/2023:10:00:00 +0000] \"GET / HTTP/1.1\" 200 1 \"-\" \"ua\"\n",
            LOG
        );

        match Report::from_text(&parser, &text) {
            Err(LogsheetError::TimestampParseError(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_store_empty() {
        assert!(Report::from_store(RecordStore::new()).is_none());
    }
}
