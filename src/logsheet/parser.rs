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

//! Parsing of individual access log lines into `Record`s.

use crate::timestamp::Timestamp;
use crate::types::{Digits, LogsheetError, LogsheetResult, Method, Record};
use regex::{Captures, Regex};

/// Parse a single log line of a pre-determined format into a `Record`.
///
/// Implementations ignore trailing whitespace (including line endings)
/// and remove it before attempting to parse a line. Leading whitespace
/// is significant.
pub trait LogLineParser {
    /// Parse the given log line into a `Record`.
    ///
    /// Return `LogsheetError::ParseError` if the line does not match the
    /// expected format and `LogsheetError::TimestampParseError` if the
    /// line matched but its timestamp is not a valid date and time.
    fn parse(&self, line: &str) -> LogsheetResult<Record>;
}

/// Raw text of each field captured from a matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub ip: &'a str,
    pub datetime: &'a str,
    pub method: &'a str,
    pub request: &'a str,
    pub status: &'a str,
    pub size: &'a str,
    pub user_agent: &'a str,
}

impl<'a> RawFields<'a> {
    /// Convert captured text into typed values, normalizing the timestamp.
    pub fn into_record(self) -> LogsheetResult<Record> {
        Ok(Record {
            client_address: self.ip.to_string(),
            timestamp: Timestamp::from_access_log(self.datetime)?,
            method: self.method.parse::<Method>()?,
            resource: self.request.to_string(),
            status: Digits::from(self.status),
            size: Digits::from(self.size),
            user_agent: self.user_agent.to_string(),
        })
    }
}

/// Parser for access logs where the ident and user fields are always `-`,
/// only `GET` and `POST` requests are logged, and the referer is always `-`.
///
/// ```text
/// 10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 2326 "-" "curl/8.0"
/// ```
#[derive(Debug, Clone)]
pub struct AccessLogLineParser {
    inner: ParserImpl,
}

impl AccessLogLineParser {
    pub fn new() -> Self {
        Self {
            inner: ParserImpl::new(
                Regex::new(concat!(
                    r"^([\d.]+) ",      // host
                    r"- - ",            // ident and username, never set
                    r"\[([^\]]+)\] ",   // timestamp
                    "\"(GET|POST) ",    // open " and method
                    "([^\"]+)\" ",      // request and close "
                    r"(\d+) ",          // status
                    r"(\d+) ",          // bytes
                    "\"-\" ",           // referer, never set
                    "\"([^\"]+)\"",     // "user agent"
                ))
                .unwrap(),
            ),
        }
    }

    /// Extract the text of each field without converting any of them.
    ///
    /// Return `LogsheetError::ParseError` if the line does not match.
    pub fn fields<'a>(&'a self, line: &'a str) -> LogsheetResult<RawFields<'a>> {
        let line = line.trim_end();
        let fields = self.inner.apply(line)?;

        Ok(RawFields {
            ip: fields.text(1)?,
            datetime: fields.text(2)?,
            method: fields.text(3)?,
            request: fields.text(4)?,
            status: fields.text(5)?,
            size: fields.text(6)?,
            user_agent: fields.text(7)?,
        })
    }
}

impl Default for AccessLogLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogLineParser for AccessLogLineParser {
    fn parse(&self, line: &str) -> LogsheetResult<Record> {
        self.fields(line)?.into_record()
    }
}

/// Regex-based matcher for access log lines.
///
/// The provided regular expression is applied to a log line and a
/// `FieldReader` is returned that is used to fetch captured values.
#[derive(Debug, Clone)]
struct ParserImpl {
    regex: Regex,
}

impl ParserImpl {
    fn new(regex: Regex) -> Self {
        Self { regex }
    }

    fn apply<'a>(&self, line: &'a str) -> LogsheetResult<FieldReader<'a>> {
        self.regex
            .captures(line)
            .ok_or_else(|| LogsheetError::ParseError(line.to_string()))
            .map(|captures| FieldReader { line, captures })
    }
}

/// Access to the captured values of a single matching line.
#[derive(Debug)]
struct FieldReader<'a> {
    line: &'a str,
    captures: Captures<'a>,
}

impl<'a> FieldReader<'a> {
    /// Get the text value in position `index`. Return an error if the
    /// capture was missing.
    fn text(&self, index: usize) -> LogsheetResult<&'a str> {
        self.captures
            .get(index)
            .map(|m| m.as_str())
            .ok_or_else(|| LogsheetError::ParseError(self.line.to_string()))
    }
}
