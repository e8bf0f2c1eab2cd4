use skiload_common::{LiftRide, Parameters, SkiLoadError};
use std::io::Write;
use tempfile::NamedTempFile;

fn valid() -> Parameters {
    Parameters {
        max_concurrency: 20,
        population_size: 400,
        lift_count: 40,
        resort_id: "SilverMt".to_string(),
        server_address: "http://127.0.0.1:8080/api".to_string(),
        day_number: 1,
    }
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_from_file_reads_all_fields() {
    let file = write_config(
        r#"{
            "max_concurrency": 20,
            "population_size": 400,
            "lift_count": 40,
            "resort_id": "SilverMt",
            "server_address": "http://127.0.0.1:8080/api",
            "day_number": 1
        }"#,
    );
    let params = Parameters::from_file(file.path()).unwrap();
    assert_eq!(params, valid());
}

#[test]
fn test_from_file_missing_file_is_config_error() {
    let result = Parameters::from_file(std::path::Path::new("/nonexistent/skiload.json"));
    assert!(matches!(result, Err(SkiLoadError::Config(msg)) if msg.contains("cannot read")));
}

#[test]
fn test_from_file_malformed_json_is_config_error() {
    let file = write_config(r#"{"max_concurrency": 20"#);
    let result = Parameters::from_file(file.path());
    assert!(matches!(result, Err(SkiLoadError::Config(msg)) if msg.contains("cannot parse")));
}

#[test]
fn test_from_file_runs_validation() {
    let file = write_config(
        r#"{
            "max_concurrency": 0,
            "population_size": 400,
            "lift_count": 40,
            "resort_id": "SilverMt",
            "server_address": "http://127.0.0.1:8080/api",
            "day_number": 1
        }"#,
    );
    assert!(matches!(Parameters::from_file(file.path()), Err(SkiLoadError::Config(_))));
}

#[test]
fn test_validate_rejects_zero_counts_and_empty_strings() {
    assert!(valid().validate().is_ok());

    let mut p = valid();
    p.population_size = 0;
    assert!(p.validate().is_err());

    let mut p = valid();
    p.lift_count = 0;
    assert!(p.validate().is_err());

    let mut p = valid();
    p.resort_id = "  ".to_string();
    assert!(p.validate().is_err());

    let mut p = valid();
    p.server_address = String::new();
    assert!(p.validate().is_err());
}

#[test]
fn test_lift_ride_serializes_with_api_field_names() {
    let ride = LiftRide::new("SilverMt", 1, 17, 3, 215);
    let json = serde_json::to_value(&ride).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "resortID": "SilverMt",
            "dayID": "1",
            "skierID": "17",
            "time": "215",
            "liftID": "3"
        })
    );
}
