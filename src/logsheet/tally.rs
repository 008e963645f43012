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

//! Counting that remembers the order in which keys were first seen.

use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FromIterator;

/// Count of occurrences per key, iterated in first-appearance order.
///
/// Ranking with `top` sorts by count, descending, and leaves keys with
/// equal counts in the order they were first added so results are the
/// same for the same input.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K> Tally<K>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Tally {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].1 += 1;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, 1));
        }
    }

    /// Return at most `n` keys with the highest counts.
    pub fn top(&self, n: usize) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        // Stable, ties keep first-appearance order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<K> Default for Tally<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FromIterator<K> for Tally<K>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }

        tally
    }
}
