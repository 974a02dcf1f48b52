//! Tests for decoder module

use super::*;
use crate::catalog::{Breadcrumb, Metadata};
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;

fn columns() -> ColumnMap {
    let fields: BTreeMap<String, String> = [
        ("Day", "Day"),
        ("Campaign ID", "CampaignId"),
        ("Impressions", "Displays"),
        ("Clicks", "Clicks"),
    ]
    .into_iter()
    .map(|(label, field)| (label.to_string(), field.to_string()))
    .collect();
    ColumnMap::new(fields)
}

// ============================================================================
// ColumnMap Tests
// ============================================================================

#[test]
fn test_column_map_for_stream() {
    let mut metadata = Metadata::new();
    metadata.set(&Breadcrumb::property("Displays"), "tap-criteo.col-name", json!("Impressions"));
    metadata.set(&Breadcrumb::property("Clicks"), "tap-criteo.col-name", json!("Clicks"));

    let map = ColumnMap::for_stream(&metadata, &["Displays", "_report_datetime"]);
    assert_eq!(map.field_for("Impressions"), Some("Displays"));
    assert_eq!(map.field_for("Clicks"), Some("Clicks"));
    assert_eq!(map.required_labels(), &["Impressions".to_string()]);
}

// ============================================================================
// ReportCsvDecoder Tests
// ============================================================================

#[test]
fn test_decode_renames_headers() {
    let decoder = ReportCsvDecoder::new(columns());
    let body = "Day;Campaign ID;Impressions\n2024-01-01;42;1000\n2024-01-01;43;\n";

    let rows = decoder.decode(body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        serde_json::Value::Object(rows[0].clone()),
        json!({"Day": "2024-01-01", "CampaignId": "42", "Displays": "1000"})
    );
    assert_eq!(rows[1]["Displays"], json!(""));
}

#[test]
fn test_decode_strips_bom_and_crlf() {
    let decoder = ReportCsvDecoder::new(columns());
    let body = "\u{feff}Clicks;Day\r\n7;2024-01-02\r\n";

    let rows = decoder.decode(body).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Clicks"], json!("7"));
    assert_eq!(rows[0]["Day"], json!("2024-01-02"));
}

#[test]
fn test_decode_quoted_values() {
    let decoder = ReportCsvDecoder::new(columns());
    let body = "Campaign ID;Clicks\n\"4;2\";\"say \"\"hi\"\"\"\n";

    let rows = decoder.decode(body).unwrap();
    assert_eq!(rows[0]["CampaignId"], json!("4;2"));
    assert_eq!(rows[0]["Clicks"], json!("say \"hi\""));
}

#[test]
fn test_decode_newline_inside_quotes_stays_in_row() {
    let decoder = ReportCsvDecoder::new(columns());
    let body = "Campaign ID;Clicks\r\n\"spring\r\nsale\";3\r\nplain;4\r\n";

    let rows = decoder.decode(body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["CampaignId"], json!("spring\r\nsale"));
    assert_eq!(rows[0]["Clicks"], json!("3"));
    assert_eq!(rows[1]["CampaignId"], json!("plain"));
}

#[test]
fn test_decode_empty_body() {
    let decoder = ReportCsvDecoder::new(columns());
    assert!(decoder.decode("").unwrap().is_empty());
    assert!(decoder.decode("\u{feff}\n").unwrap().is_empty());
}

#[test]
fn test_decode_header_only() {
    let decoder = ReportCsvDecoder::new(columns());
    assert!(decoder.decode("Day;Clicks\n").unwrap().is_empty());
}

#[test]
fn test_decode_unknown_header_fails() {
    let decoder = ReportCsvDecoder::new(columns());
    let err = decoder.decode("Day;Mystery\n2024-01-01;1\n").unwrap_err();
    assert!(matches!(err, Error::CsvParse { .. }));
    assert!(err.to_string().contains("Mystery"));
}

#[test]
fn test_decode_missing_required_column_fails() {
    let decoder = ReportCsvDecoder::new(columns().require("Impressions"));
    let err = decoder.decode("Day;Clicks\n2024-01-01;1\n").unwrap_err();
    assert!(matches!(err, Error::CsvParse { .. }));
    assert!(err.to_string().contains("Impressions"));
}

#[test]
fn test_decode_too_many_values_fails() {
    let decoder = ReportCsvDecoder::new(columns());
    let err = decoder.decode("Day\n2024-01-01;1\n").unwrap_err();
    assert!(matches!(err, Error::CsvParse { .. }));
}

#[test]
fn test_decode_custom_delimiter() {
    let decoder = ReportCsvDecoder::new(columns()).with_delimiter(',');
    let rows = decoder.decode("Day,Clicks\n2024-01-01,3\n").unwrap();
    assert_eq!(rows[0]["Clicks"], json!("3"));
    assert_eq!(REPORT_CSV_DELIMITER, ';');
}
