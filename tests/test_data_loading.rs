//! Integration test: training tables from CSV and the synthetic fixture

use agriverse::dataset::{Feature, Sample, SyntheticGenerator, TrainingSet};
use agriverse::error::AgriError;

const REFERENCE_CSV: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/crop_reference.csv");

#[test]
fn test_reference_fixture_loads() {
    let set = TrainingSet::from_csv(REFERENCE_CSV).unwrap();
    assert_eq!(set.len(), 200);
    assert_eq!(set.n_classes(), 8);
    assert!(set.vocabulary().windows(2).all(|w| w[0] < w[1]));
    assert!(set.label_counts().iter().all(|(_, n)| *n == 25));

    let first = set.sample(0).unwrap();
    assert_eq!(first.label.as_deref(), Some("rice"));
    assert!(first.validate().is_ok());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TrainingSet::from_csv(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, AgriError::DataNotFound(_)));
}

#[test]
fn test_missing_column_is_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crops.csv");
    std::fs::write(
        &path,
        "N,P,K,temperature,humidity,rainfall,label\n90,42,43,20.9,82.0,202.9,rice\n",
    )
    .unwrap();

    let err = TrainingSet::from_csv(&path).unwrap_err();
    assert!(matches!(err, AgriError::DataError(ref msg) if msg.contains("ph")));
}

fn write_csv_with_nan_ph(path: &std::path::Path, rows: usize) {
    let mut csv = String::from("N,P,K,temperature,humidity,ph,rainfall,label\n");
    for i in 0..rows {
        let ph = if i % 3 == 0 { "NaN".to_string() } else { format!("{:.1}", 5.5 + (i % 7) as f64 * 0.3) };
        let label = if i % 2 == 0 { "rice" } else { "maize" };
        csv.push_str(&format!("{},{},{},21.5,80.0,{},{},{}\n", 60 + i, 40, 40, ph, 150 + i, label));
    }
    std::fs::write(path, csv).unwrap();
}

#[test]
fn test_nan_in_csv_is_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nan.csv");
    write_csv_with_nan_ph(&path, 60);

    let err = TrainingSet::from_csv(&path).unwrap_err();
    assert!(matches!(err, AgriError::DataError(_)), "unexpected error: {:?}", err);
}

#[test]
fn test_columns_matched_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shuffled.csv");
    std::fs::write(
        &path,
        "label,rainfall,ph,humidity,temperature,K,P,N\nrice,202.9,6.5,82.0,20.9,43,42,90\n",
    )
    .unwrap();

    let set = TrainingSet::from_csv(&path).unwrap();
    let sample = set.sample(0).unwrap();
    assert_eq!(sample.get(Feature::Nitrogen), 90.0);
    assert_eq!(sample.get(Feature::Rainfall), 202.9);
    assert_eq!(sample.to_features(), Sample::new(90.0, 42.0, 43.0, 20.9, 82.0, 6.5, 202.9).to_features());
}

#[test]
fn test_synthetic_fixture_survives_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");

    let set = SyntheticGenerator::new(42).with_samples_per_crop(3).generate().unwrap();
    set.save_csv(&path).unwrap();

    let reloaded = TrainingSet::from_csv(&path).unwrap();
    assert_eq!(reloaded.len(), set.len());
    assert_eq!(reloaded.vocabulary(), set.vocabulary());
    assert_eq!(reloaded.labels(), set.labels());
}
