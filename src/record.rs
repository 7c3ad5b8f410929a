use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One labelled row of the heart-disease dataset, as stored in the CSV.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct HeartRecord {
    pub age: f64,
    pub sex: String,
    pub chest_pain_type: String,
    #[serde(rename = "RestingBP")]
    pub resting_bp: f64,
    pub cholesterol: f64,
    #[serde(rename = "FastingBS")]
    pub fasting_bs: u8,
    #[serde(rename = "RestingECG")]
    pub resting_ecg: String,
    #[serde(rename = "MaxHR")]
    pub max_hr: f64,
    pub exercise_angina: String,
    pub oldpeak: f64,
    #[serde(rename = "ST_Slope")]
    pub st_slope: String,
    pub heart_disease: u8,
}

/// Reads every record from a heart-disease CSV file.
///
/// Fails on the first unreadable or malformed row, or when the file holds no
/// rows at all.
pub fn load_records(path: &Path) -> Result<Vec<HeartRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let record: HeartRecord =
            result.with_context(|| format!("invalid row {} in {}", row + 1, path.display()))?;
        if record.heart_disease > 1 {
            bail!(
                "invalid row {} in {}: HeartDisease must be 0 or 1, got {}",
                row + 1,
                path.display(),
                record.heart_disease
            );
        }
        records.push(record);
    }

    if records.is_empty() {
        bail!("dataset {} contains no rows", path.display());
    }

    tracing::info!(rows = records.len(), path = %path.display(), "loaded dataset");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Age,Sex,ChestPainType,RestingBP,Cholesterol,FastingBS,RestingECG,MaxHR,ExerciseAngina,Oldpeak,ST_Slope,HeartDisease";

    fn read(body: &str) -> Result<Vec<HeartRecord>> {
        let data = format!("{HEADER}\n{body}");
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        rdr.deserialize::<HeartRecord>()
            .map(|r| r.map_err(Into::into))
            .collect()
    }

    #[test]
    fn deserializes_column_names() {
        let records = read("40,M,ATA,140,289,0,Normal,172,N,0,Up,0").unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.age, 40.0);
        assert_eq!(r.chest_pain_type, "ATA");
        assert_eq!(r.resting_bp, 140.0);
        assert_eq!(r.max_hr, 172.0);
        assert_eq!(r.st_slope, "Up");
        assert_eq!(r.heart_disease, 0);
    }

    #[test]
    fn rejects_non_numeric_field() {
        assert!(read("forty,M,ATA,140,289,0,Normal,172,N,0,Up,0").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_records(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("failed to open dataset"));
    }
}
