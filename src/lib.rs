//! # heart-risk 🫀
//!
//! Estimate heart-disease risk from five patient measurements using a small
//! feed-forward neural network.
//!
//! The model is trained from scratch on every launch from a heart-disease CSV
//! (`Age,Sex,ChestPainType,RestingBP,Cholesterol,FastingBS,RestingECG,MaxHR,ExerciseAngina,Oldpeak,ST_Slope,HeartDisease`):
//! text columns are label-encoded, the rows are split 70/30, the minority class
//! of the training split is oversampled with SMOTE, features are standardised
//! with [`linfa-preprocessing`](https://crates.io/crates/linfa-preprocessing)
//! and a 16-unit ReLU + sigmoid network is fitted with Adam.
//!
//! ## Features
//! - Label encoding with sorted, deterministic codes
//! - Seeded train/test split and SMOTE oversampling (k-d tree neighbours via `linfa-nn`)
//! - Two-layer MLP trained on binary cross-entropy
//! - Probability + risk level prediction
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use heart_risk::{HeartDiseasePredictor, PatientForm, PipelineConfig};
//! let predictor = HeartDiseasePredictor::train(Path::new("heart.csv"), &PipelineConfig::default())?;
//! let verdict = predictor.predict(&PatientForm::new("63", "Erkek", "ATA", "145", "233"))?;
//! println!("{verdict}");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod encoding;
pub mod features;
pub mod input;
pub mod network;
pub mod predictor;
pub mod record;
pub mod smote;
pub mod split;
pub mod verdict;

pub use config::PipelineConfig;
pub use encoding::{LabelEncoder, UnknownCategory};
pub use features::FeatureVector;
pub use input::{PatientForm, PredictError};
pub use predictor::{HeartDiseasePredictor, TrainingReport};
pub use record::HeartRecord;
pub use verdict::{Prediction, RiskLevel};
