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

//! Parse access logs and summarize each file as a set of report tables:
//! the parsed records, the busiest client addresses, requests per status
//! code, and the most requested resources with the addresses requesting
//! them.

#![forbid(unsafe_code)]

extern crate chrono;
extern crate csv;
extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate tempfile;
extern crate walkdir;

pub mod clients;
pub mod io;
pub mod parser;
pub mod report;
pub mod resources;
pub mod status;
pub mod tally;
pub mod timestamp;
pub mod types;
pub mod writer;
