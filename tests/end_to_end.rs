extern crate logsheet;
extern crate serde_json;
extern crate tempfile;

use logsheet::io::{output_dir, process_file, Discovery};
use logsheet::parser::AccessLogLineParser;
use logsheet::report::Report;
use logsheet::status::StatusKey;
use logsheet::types::LogsheetError;
use logsheet::writer::{CsvReportWriter, JsonReportWriter};
use std::fs;

const SCENARIO: &str = concat!(
    "10.0.0.1 - - [03/Jan/2023:09:00:00 +0000] \"GET /home HTTP/1.1\" 200 100 \"-\" \"Mozilla/5.0\"\n",
    "10.0.0.1 - - [04/Mar/2023:10:00:00 +0000] \"GET /gone HTTP/1.1\" 404 0 \"-\" \"Mozilla/5.0\"\n",
    "10.0.0.2 - - [05/Mar/2023:11:00:00 +0000] \"POST /home HTTP/1.1\" 200 20 \"-\" \"curl/8.0\"\n",
);

const MALFORMED: &str = concat!(
    "10.0.0.1 - - [03/Jan/2023:09:00:00 +0000] \"PUT /home HTTP/1.1\" 200 100 \"-\" \"Mozilla/5.0\"\n",
    "10.0.0.1 - - [03/Jan/2023:09:00:00 +0000] \"GET /home HTTP/1.1 200 100 \"-\" \"Mozilla/5.0\"\n",
    "10.0.0.1 - - [03/Jan/2023:09:00:00 +0000] \"GET /home HTTP/1.1\" 200\n",
    "just some text\n",
);

#[test]
fn test_scenario_tables() {
    let parser = AccessLogLineParser::new();
    let report = Report::from_text(&parser, SCENARIO).unwrap().unwrap();

    assert_eq!(3, report.records.len());

    let clients = &report.top_clients;
    assert_eq!(2, clients.len());
    assert_eq!("10.0.0.1", clients[0].address);
    assert_eq!(2, clients[0].count);
    assert_eq!([1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], clients[0].monthly);
    assert_eq!("2023-01-03 09:00:00", clients[0].earliest.to_string());
    assert_eq!("2023-03-04 10:00:00", clients[0].latest.to_string());
    assert_eq!("10.0.0.2", clients[1].address);
    assert_eq!(1, clients[1].count);
    assert_eq!([0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0], clients[1].monthly);

    let status: Vec<(String, usize)> = report
        .status_codes
        .iter()
        .map(|s| (s.key.to_string(), s.count))
        .collect();
    assert_eq!(
        vec![
            ("status-code-200".to_string(), 2),
            ("status-code-404".to_string(), 1),
            ("other status codes".to_string(), 0),
        ],
        status
    );

    let resources: Vec<(&str, &str, usize)> = report
        .top_resources
        .iter()
        .map(|r| (r.resource.as_str(), r.address.as_str(), r.count))
        .collect();
    assert_eq!(
        vec![
            ("/home HTTP/1.1", "10.0.0.1", 1),
            ("/home HTTP/1.1", "10.0.0.2", 1),
            ("/gone HTTP/1.1", "10.0.0.1", 1),
        ],
        resources
    );
}

#[test]
fn test_malformed_lines_absent_everywhere() {
    let parser = AccessLogLineParser::new();
    let text = format!("{}{}", MALFORMED, SCENARIO);
    let report = Report::from_text(&parser, &text).unwrap().unwrap();

    assert_eq!(3, report.records.len());
    assert_eq!(4, report.skipped);
    assert_eq!(3, report.top_clients.iter().map(|c| c.count).sum::<usize>());
    assert!(report.status_codes.iter().all(|s| s.key != StatusKey::Other || s.count == 0));
    assert_eq!(3, report.top_resources.iter().map(|r| r.count).sum::<usize>());
}

#[test]
fn test_zero_match_file_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("junk.log");
    fs::write(&log, MALFORMED).unwrap();

    let parser = AccessLogLineParser::new();
    let written = process_file(&parser, &CsvReportWriter, &log, dir.path()).unwrap();

    assert!(written.is_none());
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(1, entries.len());
}

#[test]
fn test_bad_timestamp_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("bad.log");
    let text = format!(
        "{}10.0.0.3 - - [99/Mar/2023:11:00:00 +0000] \"GET / HTTP/1.1\" 200 1 \"-\" \"ua\"\n",
        SCENARIO
    );
    fs::write(&log, text).unwrap();

    let parser = AccessLogLineParser::new();
    match process_file(&parser, &JsonReportWriter, &log, dir.path()) {
        Err(LogsheetError::TimestampParseError(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(!dir.path().join("bad.json").exists());
}

#[test]
fn test_unreadable_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let parser = AccessLogLineParser::new();
    let missing = dir.path().join("missing.log");

    match process_file(&parser, &CsvReportWriter, &missing, dir.path()) {
        Err(LogsheetError::IoError(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_directory_of_logs() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("web")).unwrap();
    fs::write(dir.path().join("web").join("access.log"), SCENARIO).unwrap();
    fs::write(dir.path().join("empty.log"), "").unwrap();
    fs::write(dir.path().join("readme.txt"), SCENARIO).unwrap();

    let paths = Discovery::new(dir.path()).recursive(true).discover().unwrap();
    assert_eq!(2, paths.len());

    let parser = AccessLogLineParser::new();
    let mut reports = 0;
    for path in &paths {
        let target = output_dir(path, dir.path(), Some(out.path()));
        if process_file(&parser, &JsonReportWriter, path, &target).unwrap().is_some() {
            reports += 1;
        }
    }

    assert_eq!(1, reports);
    let json = out.path().join("web").join("access.json");
    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
    assert_eq!(3, doc["records"].as_array().unwrap().len());
    assert_eq!("10.0.0.1", doc["top_clients"][0]["address"]);
    assert!(!out.path().join("empty.json").exists());
}
