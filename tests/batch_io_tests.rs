//! Batch file contract tests: input CSV in, output CSV with the union of
//! input and computed columns out, partial output staying valid.

use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use trialscout::batch;
use trialscout::research::qualify;
use trialscout::sink::CsvSink;

fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("trials.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(|h| h.to_string()).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
        .collect();
    (headers, rows)
}

#[test]
fn qualify_output_carries_union_of_columns() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "company_name,email,website,declared_locations,notes\n\
         Harbor Grill,owner@harborgrill.com,harborgrill.com,2-5,\"full service, 32 staff per location\"\n\
         Acme Software,ceo@acme.io,acme.io,,\n",
    );

    let trials = batch::read_trials(&input).unwrap();
    let headers = batch::merged_headers(&trials.headers, batch::QUALIFY_OUTPUT_COLUMNS);

    let output = dir.path().join("scored.csv");
    let mut sink = CsvSink::create(&output, &headers, 10).unwrap();
    for record in &trials.records {
        let qualified = qualify(record);
        let values = batch::qualify_values(&qualified);
        sink.append(&batch::merged_row(
            &trials.headers,
            record,
            batch::QUALIFY_OUTPUT_COLUMNS,
            &values,
        ))
        .unwrap();
    }
    sink.finish().unwrap();

    let (out_headers, rows) = read_output(&output);

    // Input columns survive untouched, computed columns append after them
    assert_eq!(
        out_headers,
        vec![
            "company_name",
            "email",
            "website",
            "declared_locations",
            "notes",
            "is_restaurant",
            "restaurant_type",
            "num_locations",
            "employees_per_location",
            "tier",
            "tier_reason",
            "research_notes",
        ]
    );

    assert_eq!(rows.len(), 2);
    let grill = &rows[0];
    assert_eq!(grill[0], "Harbor Grill");
    assert_eq!(grill[1], "owner@harborgrill.com");
    assert_eq!(grill[5], "Yes");
    assert_eq!(grill[6], "FSR");
    assert_eq!(grill[9], "Tier 1");

    let acme = &rows[1];
    assert_eq!(acme[5], "No");
    assert_eq!(acme[9], "Not a fit");
    assert_eq!(acme[10], "Non-restaurant business");
}

#[test]
fn requalifying_scored_output_replaces_stale_columns() {
    let dir = TempDir::new().unwrap();
    // A previously scored file whose tier column is out of date
    let input = write_input(
        &dir,
        "company_name,num_locations,tier,notes\n\
         Harbor Grill,2-5,Tier 4,\"full service, 32 staff per location\"\n",
    );

    let trials = batch::read_trials(&input).unwrap();
    let headers = batch::merged_headers(&trials.headers, batch::QUALIFY_OUTPUT_COLUMNS);

    // num_locations and tier already exist, so the union adds only the rest
    assert_eq!(
        headers,
        vec![
            "company_name",
            "num_locations",
            "tier",
            "notes",
            "is_restaurant",
            "restaurant_type",
            "employees_per_location",
            "tier_reason",
            "research_notes",
        ]
    );

    let record = &trials.records[0];
    let qualified = qualify(record);
    let values = batch::qualify_values(&qualified);
    let row = batch::merged_row(&trials.headers, record, batch::QUALIFY_OUTPUT_COLUMNS, &values);

    // The stale Tier 4 is overwritten in place, not duplicated
    assert_eq!(row[2], "Tier 1");
    assert_eq!(row.len(), headers.len());
}

#[test]
fn zero_rows_processed_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "company_name,website\n");

    let trials = batch::read_trials(&input).unwrap();
    assert!(trials.records.is_empty());

    let headers = batch::merged_headers(&trials.headers, batch::QUALIFY_OUTPUT_COLUMNS);
    let output = dir.path().join("scored.csv");
    let sink = CsvSink::create(&output, &headers, 10).unwrap();
    assert_eq!(sink.finish().unwrap(), 0);
    assert!(output.exists());
}
