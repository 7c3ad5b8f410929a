use crate::encoding::UnknownCategory;
use thiserror::Error;

/// Sex labels offered to the user.
pub const SEX_LABELS: [&str; 2] = ["Erkek", "Kadın"];

/// Chest pain labels offered to the user.
pub const CHEST_PAIN_LABELS: [&str; 4] = ["ATA", "NAP", "ASY", "TA"];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictError {
    #[error("field `{field}` is not a number: {value:?}")]
    InputFormat { field: &'static str, value: String },
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
}

/// The five raw values entered for one risk query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub age: String,
    pub sex: String,
    pub chest_pain: String,
    pub resting_bp: String,
    pub cholesterol: String,
}

/// A form whose numeric fields parsed successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientInput<'a> {
    pub age: f64,
    /// Dataset code for the sex label (`M` or `F` for the offered labels).
    pub sex_code: &'a str,
    pub chest_pain: &'a str,
    pub resting_bp: f64,
    pub cholesterol: f64,
}

impl PatientForm {
    /// Builds a form from the five raw field values.
    pub fn new(
        age: impl Into<String>,
        sex: impl Into<String>,
        chest_pain: impl Into<String>,
        resting_bp: impl Into<String>,
        cholesterol: impl Into<String>,
    ) -> Self {
        PatientForm {
            age: age.into(),
            sex: sex.into(),
            chest_pain: chest_pain.into(),
            resting_bp: resting_bp.into(),
            cholesterol: cholesterol.into(),
        }
    }

    /// Parses the numeric fields and maps the sex label to its dataset code.
    pub fn parse(&self) -> Result<PatientInput<'_>, PredictError> {
        Ok(PatientInput {
            age: parse_number("age", &self.age)?,
            sex_code: sex_code(self.sex.trim()),
            chest_pain: self.chest_pain.trim(),
            resting_bp: parse_number("resting_bp", &self.resting_bp)?,
            cholesterol: parse_number("cholesterol", &self.cholesterol)?,
        })
    }
}

/// Maps the displayed sex label to the dataset code. Anything else is passed
/// through so the encoder can reject it.
pub fn sex_code(label: &str) -> &str {
    match label {
        "Erkek" => "M",
        "Kadın" => "F",
        other => other,
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, PredictError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PredictError::InputFormat {
            field,
            value: value.to_owned(),
        }),
    }
}
