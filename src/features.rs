use crate::encoding::{LabelEncoder, UnknownCategory};
use crate::record::HeartRecord;
use ndarray::{Array1, Array2};

/// Column names in the order the classifier sees them.
pub const FEATURE_NAMES: [&str; FeatureVector::LEN] = [
    "Age",
    "Sex",
    "ChestPainType",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "RestingECG",
    "MaxHR",
    "ExerciseAngina",
    "Oldpeak",
    "ST_Slope",
];

/// One example after categorical encoding, in training column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub age: f64,
    pub sex: usize,
    pub chest_pain_type: usize,
    pub resting_bp: f64,
    pub cholesterol: f64,
    pub fasting_bs: u8,
    pub resting_ecg: usize,
    pub max_hr: f64,
    pub exercise_angina: usize,
    pub oldpeak: f64,
    pub st_slope: usize,
}

impl FeatureVector {
    pub const LEN: usize = 11;

    /// Builds a query vector from the five collected fields. The remaining six
    /// features are fixed placeholders, not measurements.
    pub fn from_collected(
        age: f64,
        sex: usize,
        chest_pain_type: usize,
        resting_bp: f64,
        cholesterol: f64,
    ) -> Self {
        FeatureVector {
            age,
            sex,
            chest_pain_type,
            resting_bp,
            cholesterol,
            fasting_bs: 0,
            resting_ecg: 0,
            max_hr: 150.0,
            exercise_angina: 0,
            oldpeak: 0.0,
            st_slope: 1,
        }
    }

    /// Flattens the vector into model input order.
    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.age,
            self.sex as f64,
            self.chest_pain_type as f64,
            self.resting_bp,
            self.cholesterol,
            self.fasting_bs as f64,
            self.resting_ecg as f64,
            self.max_hr,
            self.exercise_angina as f64,
            self.oldpeak,
            self.st_slope as f64,
        ]
    }
}

/// The five fitted encoders, one per text column.
#[derive(Debug, Clone)]
pub struct CategoricalEncoders {
    pub sex: LabelEncoder,
    pub chest_pain_type: LabelEncoder,
    pub resting_ecg: LabelEncoder,
    pub exercise_angina: LabelEncoder,
    pub st_slope: LabelEncoder,
}

impl CategoricalEncoders {
    /// Fits each encoder on the full column.
    pub fn fit(records: &[HeartRecord]) -> Self {
        CategoricalEncoders {
            sex: LabelEncoder::fit("Sex", records.iter().map(|r| r.sex.as_str())),
            chest_pain_type: LabelEncoder::fit(
                "ChestPainType",
                records.iter().map(|r| r.chest_pain_type.as_str()),
            ),
            resting_ecg: LabelEncoder::fit(
                "RestingECG",
                records.iter().map(|r| r.resting_ecg.as_str()),
            ),
            exercise_angina: LabelEncoder::fit(
                "ExerciseAngina",
                records.iter().map(|r| r.exercise_angina.as_str()),
            ),
            st_slope: LabelEncoder::fit("ST_Slope", records.iter().map(|r| r.st_slope.as_str())),
        }
    }

    /// Encodes one record into its feature vector.
    pub fn encode(&self, record: &HeartRecord) -> Result<FeatureVector, UnknownCategory> {
        Ok(FeatureVector {
            age: record.age,
            sex: self.sex.transform(&record.sex)?,
            chest_pain_type: self.chest_pain_type.transform(&record.chest_pain_type)?,
            resting_bp: record.resting_bp,
            cholesterol: record.cholesterol,
            fasting_bs: record.fasting_bs,
            resting_ecg: self.resting_ecg.transform(&record.resting_ecg)?,
            max_hr: record.max_hr,
            exercise_angina: self.exercise_angina.transform(&record.exercise_angina)?,
            oldpeak: record.oldpeak,
            st_slope: self.st_slope.transform(&record.st_slope)?,
        })
    }
}

/// Stacks feature vectors into a row-major design matrix.
pub fn to_matrix(rows: &[FeatureVector]) -> Array2<f64> {
    let mut x = Array2::zeros((rows.len(), FeatureVector::LEN));
    for (mut row, features) in x.rows_mut().into_iter().zip(rows) {
        row.assign(&Array1::from(features.to_array().to_vec()));
    }
    x
}
