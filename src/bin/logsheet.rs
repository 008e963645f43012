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

//! Write a report for every access log in a directory.

#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate logsheet;

use clap::{App, Arg, ArgMatches};
use logsheet::io::{output_dir, process_file, Discovery};
use logsheet::parser::AccessLogLineParser;
use logsheet::writer::OutputFormat;
use std::path::Path;
use std::process;

fn parse_cli_opts<'a>() -> ArgMatches<'a> {
    App::new("Logsheet")
        .version(crate_version!())
        .set_term_width(72)
        .about(
            "\nLogsheet reads every access log in a directory and writes a report \
             for each one: the parsed requests, the ten busiest client addresses \
             with requests per month, requests per status code, and the ten most \
             requested resources with the addresses requesting them most.\n\n\
             Lines are expected in the format\n\n\
             10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] \"GET /index.html HTTP/1.1\" 200 2326 \"-\" \"curl/8.0\"\n\n\
             Other lines are skipped. A log without any such lines gets no report.",
        )
        .arg(
            Arg::with_name("dir")
                .help("Directory to search for access logs")
                .index(1)
                .default_value("."),
        )
        .arg(
            Arg::with_name("extension")
                .short("e")
                .long("extension")
                .takes_value(true)
                .default_value("log")
                .help("File extension of access logs"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Directory to write reports to (default: next to each log)"),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .takes_value(true)
                .possible_values(&["csv", "json"])
                .default_value("csv")
                .help("Report format, one CSV file per table or one JSON document"),
        )
        .arg(
            Arg::with_name("recursive")
                .short("r")
                .long("recursive")
                .help("Search subdirectories for access logs too"),
        )
        .get_matches()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = parse_cli_opts();
    let format = value_t!(matches, "format", OutputFormat).unwrap_or_else(|e| e.exit());
    let root = Path::new(matches.value_of("dir").unwrap_or("."));
    let output = matches.value_of("output").map(Path::new);

    let discovery = Discovery::new(root)
        .extension(matches.value_of("extension").unwrap_or("log"))
        .recursive(matches.is_present("recursive"));

    let paths = discovery.discover().unwrap_or_else(|e| {
        error!("Could not search {}: {}", root.display(), e);
        process::exit(1);
    });

    if paths.is_empty() {
        warn!("No access logs found in {}", root.display());
    }

    let parser = AccessLogLineParser::new();
    let writer = format.writer();
    let mut failures = 0;

    for path in &paths {
        let dir = output_dir(path, root, output);
        if let Err(e) = process_file(&parser, writer.as_ref(), path, &dir) {
            error!("Could not write report for {}: {}", path.display(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        error!("{} of {} access logs failed", failures, paths.len());
        process::exit(1);
    }
}
