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

//! Number of requests per HTTP status code.

use crate::types::RecordStore;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

const OTHER_STATUS_LABEL: &str = "other status codes";

/// Bucket that a row of the status code table counts requests for.
///
/// Codes are held as their digits without leading zeros so that `0200`
/// and `200` share a bucket and codes of any length can be counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKey {
    Code(String),
    Other,
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StatusKey::Code(ref code) => write!(f, "status-code-{}", code),
            StatusKey::Other => f.write_str(OTHER_STATUS_LABEL),
        }
    }
}

impl Serialize for StatusKey {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    #[serde(rename = "label")]
    pub key: StatusKey,
    pub count: usize,
}

/// Count requests for each status code seen, lowest code first, followed
/// by an "other" row.
///
/// The "other" row is the total number of requests minus the requests
/// already counted against a listed code. Every code seen is listed, so
/// it is always zero.
pub fn status_codes(store: &RecordStore) -> Vec<StatusRow> {
    let mut counts: BTreeMap<(usize, &str), usize> = BTreeMap::new();
    for record in store {
        *counts.entry(record.status.order_key()).or_insert(0) += 1;
    }

    let mut rows: Vec<StatusRow> = counts
        .into_iter()
        .map(|((_, code), count)| StatusRow {
            key: StatusKey::Code(code.to_string()),
            count,
        })
        .collect();

    let listed: usize = rows.iter().map(|r| r.count).sum();
    rows.push(StatusRow {
        key: StatusKey::Other,
        count: store.len().saturating_sub(listed),
    });

    rows
}
