use crate::config::PipelineConfig;
use crate::encoding::LabelEncoder;
use crate::features::{CategoricalEncoders, FEATURE_NAMES, FeatureVector, to_matrix};
use crate::input::{PatientForm, PredictError};
use crate::network::{EpochMetrics, Mlp};
use crate::record::{HeartRecord, load_records};
use crate::split::train_test_split;
use crate::verdict::Prediction;
use anyhow::{Context, Result, bail};
use linfa::prelude::*;
use linfa_preprocessing::linear_scaling::LinearScaler;
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

/// Summary of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub rows: usize,
    pub train_rows: usize,
    pub resampled_rows: usize,
    pub test_rows: usize,
    pub history: Vec<EpochMetrics>,
    /// Held-out accuracy after the last epoch, `None` with an empty test split.
    pub test_accuracy: Option<f64>,
}

/// Trained encoders, scaler and classifier.
///
/// Built once by [`HeartDiseasePredictor::train`] and only read afterwards.
pub struct HeartDiseasePredictor {
    sex_encoder: LabelEncoder,
    chest_pain_encoder: LabelEncoder,
    scaler: LinearScaler<f64>,
    model: Mlp,
    report: TrainingReport,
}

impl HeartDiseasePredictor {
    /// Loads the CSV at `csv_path` and trains a predictor on it.
    pub fn train(csv_path: &Path, config: &PipelineConfig) -> Result<Self> {
        let records = load_records(csv_path)?;
        Self::train_from_records(&records, config)
    }

    /// Trains the classifier from given heart records.
    pub fn train_from_records(records: &[HeartRecord], config: &PipelineConfig) -> Result<Self> {
        if records.is_empty() {
            bail!("cannot train on an empty dataset");
        }

        let encoders = CategoricalEncoders::fit(records);
        let rows = records
            .iter()
            .map(|r| Ok((encoders.encode(r)?, usize::from(r.heart_disease))))
            .collect::<Result<Vec<(FeatureVector, usize)>>>()
            .context("failed to encode categorical columns")?;

        tracing::debug!(columns = ?FEATURE_NAMES, "encoded feature columns");

        let split = train_test_split(&rows, config.test_ratio, config.seed);
        if split.train.is_empty() {
            bail!(
                "training partition is empty ({} rows, test ratio {})",
                rows.len(),
                config.test_ratio
            );
        }
        let (x_train, y_train) = unzip_rows(&split.train);
        let (x_test, y_test) = unzip_rows(&split.test);

        let (x_res, y_res) = config
            .smote()
            .fit_resample(&x_train, &y_train)
            .context("failed to rebalance training partition")?;

        let scaler: LinearScaler<f64> = LinearScaler::standard()
            .fit(&Dataset::new(x_res.clone(), y_res.clone()))
            .context("failed to fit feature scaler")?;
        let x_res = scaler.transform(x_res);
        let x_test = scaler.transform(x_test);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut model = Mlp::new(FeatureVector::LEN, config.hidden_units, &mut rng);
        let validation = (!y_test.is_empty()).then_some((&x_test, &y_test));
        let history = model.fit(&x_res, &y_res, validation, &config.fit_params(), &mut rng);

        let report = TrainingReport {
            rows: records.len(),
            train_rows: split.train.len(),
            resampled_rows: y_res.len(),
            test_rows: split.test.len(),
            test_accuracy: history.last().and_then(|m| m.val_accuracy),
            history,
        };
        tracing::info!(
            rows = report.rows,
            train_rows = report.train_rows,
            resampled_rows = report.resampled_rows,
            test_rows = report.test_rows,
            test_accuracy = ?report.test_accuracy,
            "model trained"
        );

        Ok(HeartDiseasePredictor {
            sex_encoder: encoders.sex,
            chest_pain_encoder: encoders.chest_pain_type,
            scaler,
            model,
            report,
        })
    }

    /// Parses the form, fills the placeholder features and returns the verdict.
    pub fn predict(&self, form: &PatientForm) -> Result<Prediction, PredictError> {
        let input = form.parse()?;
        let features = FeatureVector::from_collected(
            input.age,
            self.sex_encoder.transform(input.sex_code)?,
            self.chest_pain_encoder.transform(input.chest_pain)?,
            input.resting_bp,
            input.cholesterol,
        );
        Ok(Prediction::new(self.predict_proba(&features)))
    }

    /// Positive-class probability for an already encoded feature vector.
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        let x = Array1::from(features.to_array().to_vec()).insert_axis(Axis(0));
        let x = self.scaler.transform(x);
        self.model.predict_proba(x.view())[0]
    }

    /// Encoder fitted on the `Sex` column.
    pub fn sex_encoder(&self) -> &LabelEncoder {
        &self.sex_encoder
    }

    /// Encoder fitted on the `ChestPainType` column.
    pub fn chest_pain_encoder(&self) -> &LabelEncoder {
        &self.chest_pain_encoder
    }

    /// Split sizes and per-epoch metrics of the training run.
    pub fn report(&self) -> &TrainingReport {
        &self.report
    }
}

fn unzip_rows(rows: &[(FeatureVector, usize)]) -> (Array2<f64>, Array1<usize>) {
    let (features, labels): (Vec<FeatureVector>, Vec<usize>) = rows.iter().copied().unzip();
    (to_matrix(&features), Array1::from(labels))
}
