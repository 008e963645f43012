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

//! Errors and the record types shared by the parser and the analyses.

use crate::timestamp::Timestamp;
use chrono::format;
use csv::Error as CsvError;
use serde::{Serialize, Serializer};
use serde_json::error::Error as SerdeError;
use std::fmt;
use std::io;
use std::slice;
use std::str::FromStr;
use walkdir::Error as WalkError;

pub type LogsheetResult<T> = Result<T, LogsheetError>;

#[derive(Fail, Debug)]
pub enum LogsheetError {
    #[fail(display = "{}", _0)]
    IoError(#[cause] io::Error),

    #[fail(display = "{}", _0)]
    SerializationError(#[cause] SerdeError),

    #[fail(display = "{}", _0)]
    CsvError(#[cause] CsvError),

    #[fail(display = "{}", _0)]
    WalkError(#[cause] WalkError),

    #[fail(display = "{}", _0)]
    TimestampParseError(#[cause] format::ParseError),

    #[fail(display = "Could not parse: {}", _0)]
    ParseError(String),
}

impl From<io::Error> for LogsheetError {
    fn from(e: io::Error) -> Self {
        LogsheetError::IoError(e)
    }
}

impl From<SerdeError> for LogsheetError {
    fn from(e: SerdeError) -> Self {
        LogsheetError::SerializationError(e)
    }
}

impl From<CsvError> for LogsheetError {
    fn from(e: CsvError) -> Self {
        LogsheetError::CsvError(e)
    }
}

impl From<WalkError> for LogsheetError {
    fn from(e: WalkError) -> Self {
        LogsheetError::WalkError(e)
    }
}

impl From<format::ParseError> for LogsheetError {
    fn from(e: format::ParseError) -> Self {
        LogsheetError::TimestampParseError(e)
    }
}

/// HTTP methods accepted by the access log grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = LogsheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(LogsheetError::ParseError(s.to_string())),
        }
    }
}

impl Serialize for Method {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Run of digits exactly as it appeared in a log line.
///
/// The text is kept as is, so values of any length and with leading
/// zeros are reported unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digits(String);

impl Digits {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digits without leading zeros, `"0"` when every digit is zero.
    pub fn value(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() && !self.0.is_empty() {
            &self.0[self.0.len() - 1..]
        } else {
            trimmed
        }
    }

    /// Key that orders ASCII digit runs by numeric value: fewer significant
    /// digits first, then digit by digit.
    pub fn order_key(&self) -> (usize, &str) {
        let value = self.value();
        (value.chars().count(), value)
    }
}

impl<'a> From<&'a str> for Digits {
    fn from(val: &'a str) -> Self {
        Digits(val.to_string())
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Digits {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// One access log line that matched the grammar in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "address")]
    pub client_address: String,
    pub timestamp: Timestamp,
    pub method: Method,
    pub resource: String,
    pub status: Digits,
    pub size: Digits,
    pub user_agent: String,
}

/// Records of a single log file in the order they appeared in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for RecordStore {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        self.records.serialize(serializer)
    }
}
