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

//! Busiest client addresses and when they were active.

use crate::tally::Tally;
use crate::timestamp::Timestamp;
use crate::types::{Record, RecordStore};

pub const TOP_CLIENTS: usize = 10;

/// Activity of a single client address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRow {
    pub address: String,
    pub count: usize,
    pub earliest: Timestamp,
    pub latest: Timestamp,
    /// Requests per calendar month, January first.
    pub monthly: [usize; 12],
}

impl ClientRow {
    fn new(address: &str, count: usize, first: Timestamp) -> Self {
        ClientRow {
            address: address.to_string(),
            count,
            earliest: first,
            latest: first,
            monthly: [0; 12],
        }
    }

    fn observe(&mut self, record: &Record) {
        let ts = record.timestamp;
        if ts < self.earliest {
            self.earliest = ts;
        }

        if ts > self.latest {
            self.latest = ts;
        }

        self.monthly[ts.month() as usize - 1] += 1;
    }
}

/// Rank client addresses by number of requests and return at most
/// `TOP_CLIENTS` of them, busiest first.
pub fn top_clients(store: &RecordStore) -> Vec<ClientRow> {
    let counts: Tally<&str> = store.iter().map(|r| r.client_address.as_str()).collect();

    counts
        .top(TOP_CLIENTS)
        .into_iter()
        .filter_map(|(address, count)| client_row(store, address, count))
        .collect()
}

fn client_row(store: &RecordStore, address: &str, count: usize) -> Option<ClientRow> {
    let mut records = store.iter().filter(|r| r.client_address == address).peekable();
    let mut row = ClientRow::new(address, count, records.peek()?.timestamp);

    for record in records {
        row.observe(record);
    }

    Some(row)
}

#[cfg(test)]
mod tests {
    use super::{top_clients, TOP_CLIENTS};
    use crate::parser::{AccessLogLineParser, LogLineParser};
    use crate::types::RecordStore;

    fn store(lines: &[String]) -> RecordStore {
        let parser = AccessLogLineParser::new();
        RecordStore::from(lines.iter().map(|l| parser.parse(l).unwrap()).collect::<Vec<_>>())
    }

    fn line(ip: &str, datetime: &str) -> String {
        format!(r#"{} - - [{}] "GET /" 200 10 "-" "ua""#, ip, datetime)
    }

    #[test]
    fn test_counts_and_range() {
        let store = store(&[
            line("10.0.0.1", "15/Mar/2023:10:00:00 +0000"),
            line("10.0.0.2", "01/Jan/2023:00:00:00 +0000"),
            line("10.0.0.1", "02/Jan/2023:08:30:00 +0000"),
            line("10.0.0.1", "20/Mar/2023:23:59:59 +0000"),
        ]);

        let rows = top_clients(&store);
        assert_eq!(2, rows.len());

        assert_eq!("10.0.0.1", rows[0].address);
        assert_eq!(3, rows[0].count);
        assert_eq!("2023-01-02 08:30:00", rows[0].earliest.to_string());
        assert_eq!("2023-03-20 23:59:59", rows[0].latest.to_string());
        assert_eq!([1, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0], rows[0].monthly);

        assert_eq!("10.0.0.2", rows[1].address);
        assert_eq!(1, rows[1].count);
        assert_eq!(rows[1].earliest, rows[1].latest);
        assert_eq!([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], rows[1].monthly);
    }

    #[test]
    fn test_monthly_sums_to_count() {
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
        let mut lines = Vec::new();
        for (i, month) in months.iter().enumerate() {
            for d in 0..=i {
                let ip = format!("10.0.{}.1", d % 3);
                let datetime = format!("0{}/{}/2022:12:00:00 +0000", d % 9 + 1, month);
                lines.push(line(&ip, &datetime));
            }
        }
        let store = store(&lines);

        for row in top_clients(&store) {
            assert_eq!(row.count, row.monthly.iter().sum::<usize>());
        }
    }

    #[test]
    fn test_limited_to_top_ten_with_stable_ties() {
        let mut lines: Vec<String> = (0..15)
            .map(|i| line(&format!("10.0.0.{}", i), "10/Oct/2023:13:55:36 +0000"))
            .collect();
        lines.push(line("10.0.0.14", "11/Oct/2023:13:55:36 +0000"));
        let store = store(&lines);

        let rows = top_clients(&store);
        let addresses: Vec<&str> = rows.iter().map(|r| r.address.as_str()).collect();

        assert_eq!(TOP_CLIENTS, rows.len());
        assert_eq!(
            vec![
                "10.0.0.14", "10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5", "10.0.0.6",
                "10.0.0.7", "10.0.0.8",
            ],
            addresses
        );
    }

    #[test]
    fn test_empty_store() {
        assert!(top_clients(&RecordStore::new()).is_empty());
    }
}
