//! Argument parsing and snapshot processing.

use clap::Parser;

use heart_cli::{load_config, process_snapshot, Args};
use heart_core::config::HeartConfig;
use heart_core::models::EntityId;
use test_fixtures::{admission_note, snapshot_json};

#[test]
fn arguments_parse() {
    let args = Args::try_parse_from(["heart", "doc.json", "--dct", "2014-05-01", "--no-recover"]).unwrap();
    assert_eq!(args.snapshot.to_str(), Some("doc.json"));
    assert_eq!(args.dct.as_deref(), Some("2014-05-01"));
    assert!(args.no_recover);
    assert!(args.config.is_none());

    assert!(Args::try_parse_from(["heart"]).is_err());
}

#[test]
fn snapshot_is_recovered_and_embedded() {
    let json = snapshot_json(&admission_note());

    let recovered = process_snapshot(&json, HeartConfig::default(), Some("2014-05-01"), true).unwrap();
    let plain = process_snapshot(&json, HeartConfig::default(), Some("2014-05-01"), false).unwrap();

    assert!(recovered.entities.len() > plain.entities.len());
    assert_eq!(recovered.times[0].id, EntityId(1));
}

#[test]
fn malformed_snapshot_reports_context() {
    let err = process_snapshot("{", HeartConfig::default(), None, true).unwrap_err();
    assert!(format!("{err:#}").contains("decoding document snapshot"));
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(load_config(None).is_ok());
    let err = load_config(Some(std::path::Path::new("/nonexistent/heart.toml"))).unwrap_err();
    assert!(err.to_string().contains("reading config"));
}
