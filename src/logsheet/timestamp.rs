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

//! Conversion of access log timestamps into the canonical display form.

use crate::types::LogsheetResult;
use chrono::{DateTime, Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const COMMON_LOG_TIMESTAMP: &str = "%d/%b/%Y:%T %z";

/// Zero padded and year first, so string order matches chronological order.
pub const CANONICAL_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Wall-clock time of a request as it was logged.
///
/// The UTC offset present in the log is required to parse the timestamp
/// but is then discarded: the time is *not* converted to UTC. Ordering of
/// `Timestamp` values is the same as ordering of their canonical strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse a timestamp in the `10/Oct/2000:13:55:36 -0700` access log format.
    pub fn from_access_log(val: &str) -> LogsheetResult<Self> {
        let parsed = DateTime::parse_from_str(val, COMMON_LOG_TIMESTAMP)?;
        Ok(Timestamp(parsed.naive_local()))
    }

    /// Calendar month, 1 through 12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_TIMESTAMP))
    }
}

/// Parses the canonical form produced by `Display`.
impl FromStr for Timestamp {
    type Err = crate::types::LogsheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Timestamp(NaiveDateTime::parse_from_str(s, CANONICAL_TIMESTAMP)?))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Convert an access log timestamp to its canonical `YYYY-MM-DD HH:MM:SS` string.
pub fn normalize(val: &str) -> LogsheetResult<String> {
    Timestamp::from_access_log(val).map(|ts| ts.to_string())
}
