use heart_risk::input::{CHEST_PAIN_LABELS, SEX_LABELS};
use heart_risk::{
    HeartDiseasePredictor, PatientForm, PipelineConfig, PredictError, RiskLevel, UnknownCategory,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/heart_sample.csv")
}

fn predictor() -> &'static HeartDiseasePredictor {
    static PREDICTOR: OnceLock<HeartDiseasePredictor> = OnceLock::new();
    PREDICTOR.get_or_init(|| {
        HeartDiseasePredictor::train(&fixture(), &PipelineConfig::default()).unwrap()
    })
}

fn form(age: &str, sex: &str, cp: &str, bp: &str, chol: &str) -> PatientForm {
    PatientForm::new(age, sex, cp, bp, chol)
}

#[test]
fn example_patient_gets_consistent_verdict() {
    let verdict = predictor()
        .predict(&form("63", "Erkek", "ATA", "145", "233"))
        .unwrap();
    assert!((0.0..=1.0).contains(&verdict.probability));
    let expected = if verdict.probability > 0.5 {
        RiskLevel::High
    } else {
        RiskLevel::Low
    };
    assert_eq!(verdict.risk, expected);
}

#[test]
fn every_offered_label_is_known() {
    let p = predictor();
    for sex in SEX_LABELS {
        for cp in CHEST_PAIN_LABELS {
            let verdict = p.predict(&form("55", sex, cp, "130", "240")).unwrap();
            assert!((0.0..=1.0).contains(&verdict.probability), "{sex} {cp}");
        }
    }
}

#[test]
fn probabilities_stay_in_unit_interval_for_extreme_values() {
    let p = predictor();
    for (age, bp, chol) in [("0", "0", "0"), ("120", "300", "900"), ("-50", "1e6", "-1e6")] {
        let verdict = p.predict(&form(age, "Kadın", "ASY", bp, chol)).unwrap();
        assert!((0.0..=1.0).contains(&verdict.probability));
    }
}

#[test]
fn repeated_predictions_are_bit_identical() {
    let p = predictor();
    let f = form("63", "Erkek", "ATA", "145", "233");
    let a = p.predict(&f).unwrap();
    let b = p.predict(&f).unwrap();
    assert_eq!(a.probability.to_bits(), b.probability.to_bits());
}

#[test]
fn independently_trained_predictors_agree() {
    let other = HeartDiseasePredictor::train(&fixture(), &PipelineConfig::default()).unwrap();
    let f = form("48", "Kadın", "NAP", "128", "205");
    let a = predictor().predict(&f).unwrap();
    let b = other.predict(&f).unwrap();
    assert_eq!(a.probability.to_bits(), b.probability.to_bits());
    assert_eq!(predictor().report(), other.report());
}

#[test]
fn non_numeric_age_is_an_input_format_error() {
    let p = predictor();
    let f = form("63", "Erkek", "ATA", "145", "233");
    let before = p.predict(&f).unwrap();

    let err = p.predict(&form("abc", "Erkek", "ATA", "145", "233")).unwrap_err();
    assert!(matches!(err, PredictError::InputFormat { field: "age", .. }));

    let after = p.predict(&f).unwrap();
    assert_eq!(before, after);
}

#[test]
fn non_numeric_pressure_or_cholesterol_is_rejected() {
    let p = predictor();
    assert!(matches!(
        p.predict(&form("63", "Erkek", "ATA", "high", "233")),
        Err(PredictError::InputFormat { field: "resting_bp", .. })
    ));
    assert!(matches!(
        p.predict(&form("63", "Erkek", "ATA", "145", "")),
        Err(PredictError::InputFormat { field: "cholesterol", .. })
    ));
}

#[test]
fn unknown_categories_are_reported() {
    let p = predictor();
    let err = p.predict(&form("63", "Erkek", "XYZ", "145", "233")).unwrap_err();
    assert_eq!(
        err,
        PredictError::UnknownCategory(UnknownCategory {
            column: "ChestPainType",
            label: "XYZ".into()
        })
    );
    let err = p.predict(&form("63", "Other", "ATA", "145", "233")).unwrap_err();
    assert!(matches!(err, PredictError::UnknownCategory(UnknownCategory { column: "Sex", .. })));
}

#[test]
fn retained_encoders_use_sorted_codes() {
    let p = predictor();
    assert_eq!(p.sex_encoder().classes(), ["F", "M"]);
    assert_eq!(p.chest_pain_encoder().classes(), ["ASY", "ATA", "NAP", "TA"]);
}

#[test]
fn report_describes_the_split() {
    let report = predictor().report();
    assert_eq!(report.rows, 96);
    assert_eq!(report.test_rows, 29);
    assert_eq!(report.train_rows, 67);
    assert!(report.resampled_rows >= report.train_rows);
    assert_eq!(report.resampled_rows % 2, 0);
    assert_eq!(report.history.len(), 100);
    let acc = report.test_accuracy.unwrap();
    assert!((0.0..=1.0).contains(&acc));
}
