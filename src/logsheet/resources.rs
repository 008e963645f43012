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

//! Most requested resources and the addresses requesting them.

use crate::tally::Tally;
use crate::types::RecordStore;

pub const TOP_RESOURCES: usize = 10;
pub const TOP_VISITORS: usize = 10;

/// Number of requests one address made for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRow {
    pub resource: String,
    pub address: String,
    pub count: usize,
}

/// Rank resources by number of requests and, for each of the top
/// `TOP_RESOURCES`, list up to `TOP_VISITORS` addresses that requested it
/// most. Rows for the same resource are adjacent and resources appear
/// most requested first.
pub fn top_resources(store: &RecordStore) -> Vec<ResourceRow> {
    let resources: Tally<&str> = store.iter().map(|r| r.resource.as_str()).collect();
    let mut rows = Vec::new();

    for (resource, _) in resources.top(TOP_RESOURCES) {
        let visitors: Tally<&str> = store
            .iter()
            .filter(|r| r.resource == resource)
            .map(|r| r.client_address.as_str())
            .collect();

        rows.extend(
            visitors
                .top(TOP_VISITORS)
                .into_iter()
                .map(|(address, count)| ResourceRow {
                    resource: resource.to_string(),
                    address: address.to_string(),
                    count,
                }),
        );
    }

    rows
}
