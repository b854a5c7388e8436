//! # health-risk
//!
//! Assigns one of four health-risk [`Category`] values to a person from
//! `(age, visit_frequency, activity_level)`.
//!
//! Two stages:
//!
//! - [`policy`]: a fixed, ordered rule table that labels synthetic feature
//!   vectors, and the seeded generator that samples them.
//! - [`training`]: splits the labeled data, grid-searches a standardized
//!   multinomial logistic regression with cross-validation, refits the best
//!   configuration, evaluates it on held-out data and persists it.
//!
//! The numeric core follows a backend-generic design: tensors are wrapped in
//! [`Tensor1D`]/[`Tensor2D`] over a [`Backend`], models carry their training
//! state in the type ([`model::Unfitted`] / [`model::Fitted`]), and the
//! [`Trainer`] composes a loss, an optimizer and a regularizer.
//!
//! ```no_run
//! use health_risk::{training, RiskConfig};
//!
//! let predictor = training::load_or_train(&RiskConfig::default(), false)?;
//! let category = predictor.predict(75.0, 1.0, 1.0)?;
//! println!("{} ({})", category, category.description());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod model_selection;
pub mod optimizer;
pub mod pipeline;
pub mod policy;
pub mod predictor;
pub mod preprocessing;
pub mod regularizers;
pub mod trainer;
pub mod training;

pub use backend::{Backend, CpuBackend, Scalar, ScalarOps, Tensor1D, Tensor2D};
pub use config::RiskConfig;
pub use dataset::{Dataset, InMemoryDataset, LabeledDataset, LabeledSample};
pub use error::{InvalidInputError, Result, RiskError};
pub use model::{Fitted, InferenceModel, SoftmaxRegression, TrainableModel, Unfitted};
pub use pipeline::RiskPipeline;
pub use policy::{Category, FeatureVector, RuleTable, SyntheticGenerator};
pub use predictor::Predictor;
pub use trainer::Trainer;
pub use training::{load_or_train, train, train_from_csv, TrainingReport};

#[cfg(feature = "ndarray")]
pub use backend::NdarrayBackend;
