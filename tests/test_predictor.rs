//! Integration test: train-or-load and predict end-to-end

use agriverse::prelude::*;
use std::sync::Arc;

const REFERENCE_CSV: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/crop_reference.csv");

fn reference_config() -> PredictorConfig {
    PredictorConfig::from_csv(REFERENCE_CSV)
        .with_n_estimators(50)
        .without_persistence()
}

fn rice_sample() -> Sample {
    Sample::new(90.0, 42.0, 43.0, 20.9, 82.0, 6.5, 202.9)
}

#[test]
fn test_rice_on_reference_data() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let prediction = predictor.predict(&rice_sample()).unwrap();
    assert_eq!(prediction.label, "rice");
    assert!(prediction.confidence > 0.5);
}

#[test]
fn test_reference_accuracy() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let accuracy = predictor.evaluate().unwrap().value();
    assert!(accuracy > 0.9, "accuracy on separable reference data was {}", accuracy);
}

#[test]
fn test_closed_set_for_valid_samples() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let model = predictor.train_or_load_model().unwrap();

    let samples = [
        rice_sample(),
        Sample::new(40.0, 70.0, 80.0, 19.0, 17.0, 7.5, 80.0),
        Sample::new(20.0, 130.0, 200.0, 22.5, 92.0, 6.0, 110.0),
        Sample::new(140.0, 5.0, 5.0, 43.0, 14.0, 9.9, 20.0),
    ];
    for sample in &samples {
        assert!(sample.validate().is_ok());
        let label = predictor.predict(sample).unwrap().label;
        assert!(model.vocabulary().contains(&label), "{} not in vocabulary", label);
    }
}

#[test]
fn test_extreme_inputs_still_yield_a_label() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let model = predictor.train_or_load_model().unwrap();

    let acidic = Sample::new(90.0, 42.0, 43.0, 20.9, 82.0, 3.0, 202.9);
    let zeros = Sample::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for sample in [acidic, zeros] {
        let prediction = predictor.predict(&sample).unwrap();
        assert!(model.vocabulary().contains(&prediction.label));
    }
}

#[test]
fn test_memoized_within_predictor() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let first = predictor.train_or_load_model().unwrap();
    let second = predictor.train_or_load_model().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        predictor.predict(&rice_sample()).unwrap(),
        predictor.predict(&rice_sample()).unwrap()
    );
}

#[test]
fn test_same_seed_same_predictions() {
    let a = CropPredictor::new(reference_config()).unwrap();
    let b = CropPredictor::new(reference_config()).unwrap();

    assert_eq!(a.evaluate().unwrap(), b.evaluate().unwrap());
    let samples = [
        rice_sample(),
        Sample::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        Sample::new(110.0, 80.0, 50.0, 27.0, 80.0, 6.0, 105.0),
    ];
    for sample in &samples {
        assert_eq!(a.predict(sample).unwrap(), b.predict(sample).unwrap());
    }
}

#[test]
fn test_concurrent_first_use_trains_once() {
    let predictor = Arc::new(CropPredictor::new(reference_config()).unwrap());

    let models: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let predictor = Arc::clone(&predictor);
                scope.spawn(move || predictor.train_or_load_model().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_missing_data_is_data_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = PredictorConfig::from_csv(dir.path().join("Crop_recommendation.csv"))
        .with_model_path(dir.path().join("crop_model.bin"));
    let predictor = CropPredictor::new(config).unwrap();

    assert!(matches!(predictor.load_training_set(), Err(AgriError::DataNotFound(_))));
    assert!(matches!(predictor.train_or_load_model(), Err(AgriError::DataNotFound(_))));
    assert!(!predictor.is_trained());
    assert!(!dir.path().join("crop_model.bin").exists());
}

#[test]
fn test_failed_start_is_retried_on_next_call() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("crops.csv");
    let predictor = CropPredictor::new(
        PredictorConfig::from_csv(&csv)
            .with_n_estimators(20)
            .without_persistence(),
    )
    .unwrap();

    assert!(matches!(
        predictor.predict(&rice_sample()),
        Err(AgriError::PredictionFailed(_))
    ));

    std::fs::copy(REFERENCE_CSV, &csv).unwrap();
    assert_eq!(predictor.predict(&rice_sample()).unwrap().label, "rice");
    assert!(predictor.is_trained());
}

#[test]
fn test_non_finite_input_is_prediction_failed() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let sample = Sample::new(90.0, 42.0, f64::NAN, 20.9, 82.0, 6.5, f64::INFINITY);
    assert!(matches!(
        predictor.predict(&sample),
        Err(AgriError::PredictionFailed(_))
    ));
    assert!(predictor.is_trained());
}

#[test]
fn test_synthetic_source_is_explicit() {
    let predictor = CropPredictor::new(
        PredictorConfig::synthetic(42)
            .with_n_estimators(10)
            .without_persistence(),
    )
    .unwrap();
    let set = predictor.load_training_set().unwrap();
    assert_eq!(set.n_classes(), 24);
    assert_eq!(set.len(), 24 * 40);

    let model = predictor.train_or_load_model().unwrap();
    assert_eq!(model.n_test(), 192);
    let accuracy = predictor.evaluate().unwrap().value();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn test_catalog_for_prediction() {
    let predictor = CropPredictor::new(reference_config()).unwrap();
    let label = predictor.predict(&rice_sample()).unwrap().label;

    let profile = agriverse::catalog::profile(&label);
    assert_eq!(profile.season, "Kharif");
    assert_eq!(profile.water, "High");

    assert_eq!(agriverse::catalog::profile("kidneybeans"), agriverse::catalog::DEFAULT_PROFILE);
    assert_eq!(SoilStatus::from_ph(rice_sample().ph), SoilStatus::Neutral);
}

#[test]
fn test_nan_training_data_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("nan.csv");
    let mut rows = String::from("N,P,K,temperature,humidity,ph,rainfall,label\n");
    for i in 0..60 {
        let ph = if i % 3 == 0 { "NaN".to_string() } else { "6.5".to_string() };
        let label = if i % 2 == 0 { "rice" } else { "maize" };
        rows.push_str(&format!("{},42,43,20.9,82.0,{},{},{}\n", 60 + i, ph, 150 + i, label));
    }
    std::fs::write(&csv, rows).unwrap();

    let predictor = CropPredictor::new(
        PredictorConfig::from_csv(&csv)
            .with_n_estimators(10)
            .without_persistence(),
    )
    .unwrap();

    assert!(matches!(
        predictor.predict(&rice_sample()),
        Err(AgriError::PredictionFailed(_))
    ));
    assert!(!predictor.is_trained());
}
