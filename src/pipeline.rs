//! Fitted risk pipeline: standardizer followed by a softmax classifier.
//!
//! The pipeline is the persisted artifact. It is written as a self-describing
//! JSON document:
//!
//! ```text
//! {
//!   "format": "health-risk-pipeline",
//!   "version": 1,
//!   "feature_names": ["age", "medical_visits_frequency", "physical_activity_level"],
//!   "categories": ["NOT_SICK", "MILD", "ACUTE", "CHRONIC"],
//!   "hyperparams": { "c": .., "max_iter": .. },
//!   "scaler": { "config": {..}, "mean": [..], "std": [..], "n_features": 3 },
//!   "classifier": { "n_features": 3, "n_classes": 4, "weights": [..], "bias": [..] }
//! }
//! ```
//!
//! Loading rejects anything that does not describe exactly this shape with
//! [`RiskError::ArtifactCorrupt`].

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::{InMemoryDataset, LabeledDataset};
use crate::error::{Result, RiskError};
use crate::loss::CrossEntropyLoss;
use crate::metrics::{accuracy, ConfusionMatrix};
use crate::model::{
    Fitted, InferenceModel, SerializableSoftmaxParams, SoftmaxModel, SoftmaxRegression,
};
use crate::model_selection::Hyperparams;
use crate::optimizer::SGD;
use crate::policy::{Category, FeatureVector};
use crate::preprocessing::{
    FittedStandardScaler, FittedTransformer, StandardScaler, StandardScalerParams, Transformer,
};
use crate::regularizers::L2;
use crate::trainer::Trainer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ARTIFACT_FORMAT: &str = "health-risk-pipeline";
pub const ARTIFACT_VERSION: u32 = 1;

/// Gradient-descent settings shared by every fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub learning_rate: f64,
    /// Training stops once the gradient norm falls below this value.
    pub tol: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            tol: 1e-4,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RiskError::InvalidParameter(format!(
                "learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(RiskError::InvalidParameter(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Held-out performance of a fitted pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// On-disk form of a [`RiskPipeline`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format: String,
    pub version: u32,
    pub feature_names: Vec<String>,
    pub categories: Vec<Category>,
    pub hyperparams: Hyperparams,
    pub scaler: StandardScalerParams,
    pub classifier: SerializableSoftmaxParams,
}

/// Standardizer plus classifier, fitted together on one training set.
///
/// Immutable once built; `predict` takes `&self` only.
#[derive(Clone)]
pub struct RiskPipeline<B: Backend> {
    scaler: FittedStandardScaler<B>,
    classifier: SoftmaxModel<B, Fitted>,
    hyperparams: Hyperparams,
}

impl<B: Backend> RiskPipeline<B> {
    /// Fits the standardizer on `train`, then trains the classifier on the
    /// standardized features with full-batch gradient descent.
    pub fn fit(
        train: &LabeledDataset,
        hyperparams: Hyperparams,
        solver: &SolverSettings,
    ) -> Result<Self> {
        if train.is_empty() {
            return Err(RiskError::InsufficientData {
                samples: 0,
                required: 1,
            });
        }

        let x = train.features_matrix::<B>();
        let scaler = StandardScaler::<B>::new().fit(&x)?;
        let x_scaled = scaler.transform(&x)?;
        let dataset = InMemoryDataset::from_tensor(&x_scaled, train.labels(), Category::COUNT)?;

        let trainer = Trainer::builder(
            CrossEntropyLoss,
            SGD::<B>::new(solver.learning_rate),
            L2::from_inverse_strength(hyperparams.c, train.len()),
        )
        .full_batch()
        .max_epochs(hyperparams.max_iter)
        .tol(solver.tol)
        .build();

        let outcome = trainer.fit_with_outcome(
            SoftmaxRegression::<B>::new(FeatureVector::LEN, Category::COUNT),
            &dataset,
        )?;
        debug!(
            %hyperparams,
            samples = train.len(),
            epochs = outcome.epochs,
            loss = outcome.final_loss,
            converged = outcome.converged,
            "fitted pipeline"
        );

        Self::from_parts(scaler, outcome.model, hyperparams)
    }

    /// Assembles a pipeline, checking that both stages agree on the feature
    /// and class counts the risk model uses.
    pub fn from_parts(
        scaler: FittedStandardScaler<B>,
        classifier: SoftmaxModel<B, Fitted>,
        hyperparams: Hyperparams,
    ) -> Result<Self> {
        if scaler.n_features_in() != FeatureVector::LEN
            || classifier.n_features() != FeatureVector::LEN
        {
            return Err(RiskError::InvalidParameter(format!(
                "pipeline expects {} features, scaler has {} and classifier {}",
                FeatureVector::LEN,
                scaler.n_features_in(),
                classifier.n_features()
            )));
        }
        if classifier.n_classes() != Category::COUNT {
            return Err(RiskError::InvalidParameter(format!(
                "pipeline expects {} classes, classifier has {}",
                Category::COUNT,
                classifier.n_classes()
            )));
        }
        Ok(Self {
            scaler,
            classifier,
            hyperparams,
        })
    }

    pub fn hyperparams(&self) -> Hyperparams {
        self.hyperparams
    }

    pub fn scaler(&self) -> &FittedStandardScaler<B> {
        &self.scaler
    }

    pub fn classifier(&self) -> &SoftmaxModel<B, Fitted> {
        &self.classifier
    }

    /// Standardizes with the stored statistics and returns the arg-max
    /// category.
    pub fn predict(&self, features: &FeatureVector) -> Category {
        let x = Tensor1D::<B>::new(features.to_array().to_vec());
        let z = self.scaler.standardize_1d(&x);
        Category::from_class_index(self.classifier.predict(&z))
    }

    /// Predicts every row of an `n × 3` feature matrix.
    pub fn predict_batch(&self, x: &Tensor2D<B>) -> Result<Vec<Category>> {
        let z = self.scaler.transform(x)?;
        Ok(self
            .classifier
            .predict_batch(&z)
            .into_iter()
            .map(Category::from_class_index)
            .collect())
    }

    /// Class probabilities per row, columns in [`Category::ALL`] order.
    pub fn predict_proba(&self, x: &Tensor2D<B>) -> Result<Tensor2D<B>> {
        Ok(self.classifier.predict_proba(&self.scaler.transform(x)?))
    }

    pub fn evaluate(&self, data: &LabeledDataset) -> Result<Evaluation> {
        let y_true = data.labels();
        let y_pred: Vec<usize> = self
            .predict_batch(&data.features_matrix::<B>())?
            .into_iter()
            .map(Category::index)
            .collect();
        Ok(Evaluation {
            accuracy: accuracy(&y_true, &y_pred),
            confusion: ConfusionMatrix::from_labels(&y_true, &y_pred, Category::COUNT),
        })
    }

    pub fn to_artifact(&self) -> PipelineArtifact {
        PipelineArtifact {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            feature_names: FeatureVector::FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
            categories: Category::ALL.to_vec(),
            hyperparams: self.hyperparams,
            scaler: self.scaler.extract_params(),
            classifier: self.classifier.extract_params(),
        }
    }

    /// Rebuilds a pipeline from its artifact; `path` is only used in errors.
    pub fn from_artifact(artifact: PipelineArtifact, path: &Path) -> Result<Self> {
        let corrupt = |reason: String| RiskError::corrupt(path, reason);

        if artifact.format != ARTIFACT_FORMAT {
            return Err(corrupt(format!("unknown format tag {:?}", artifact.format)));
        }
        if artifact.version != ARTIFACT_VERSION {
            return Err(corrupt(format!("unsupported version {}", artifact.version)));
        }
        if artifact.feature_names != FeatureVector::FIELD_NAMES {
            return Err(corrupt(format!(
                "unexpected feature names {:?}",
                artifact.feature_names
            )));
        }
        if artifact.categories != Category::ALL {
            return Err(corrupt(format!(
                "unexpected categories {:?}",
                artifact.categories
            )));
        }
        let hp = artifact.hyperparams;
        if !(hp.c.is_finite() && hp.c > 0.0) || hp.max_iter == 0 {
            return Err(corrupt(format!("invalid hyperparameters {}", hp)));
        }
        if artifact.scaler.n_features != FeatureVector::LEN {
            return Err(corrupt(format!(
                "scaler expects {} features",
                artifact.scaler.n_features
            )));
        }
        if artifact.classifier.n_features != FeatureVector::LEN
            || artifact.classifier.n_classes != Category::COUNT
        {
            return Err(corrupt(format!(
                "classifier shape is {}x{}",
                artifact.classifier.n_features, artifact.classifier.n_classes
            )));
        }

        let scaler = FittedStandardScaler::from_params(artifact.scaler)
            .map_err(|e| corrupt(e.to_string()))?;
        let classifier = SoftmaxModel::<B, Fitted>::from_params(artifact.classifier)
            .map_err(|e| corrupt(e.to_string()))?;
        Self::from_parts(scaler, classifier, hp).map_err(|e| corrupt(e.to_string()))
    }

    /// Writes the artifact to a temporary sibling file, then renames it into
    /// place so readers never observe a partial file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(&self.to_artifact())?;
        let tmp = temp_path(path);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;

        info!(path = %path.display(), hyperparams = %self.hyperparams, "saved model artifact");
        Ok(())
    }

    /// Reads and validates an artifact.
    ///
    /// # Errors
    /// - [`RiskError::Io`] if the file cannot be read (including when it is
    ///   absent).
    /// - [`RiskError::ArtifactCorrupt`] for anything else that is wrong with it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let artifact: PipelineArtifact =
            serde_json::from_slice(&bytes).map_err(|e| RiskError::corrupt(path, e))?;
        let pipeline = Self::from_artifact(artifact, path)?;

        info!(path = %path.display(), hyperparams = %pipeline.hyperparams, "loaded model artifact");
        Ok(pipeline)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::policy::SyntheticGenerator;

    const HP: Hyperparams = Hyperparams {
        c: 1.0,
        max_iter: 200,
    };

    fn trained() -> (RiskPipeline<CpuBackend>, LabeledDataset) {
        let data = SyntheticGenerator::default().generate(120, 3).unwrap();
        let pipeline =
            RiskPipeline::<CpuBackend>::fit(&data, HP, &SolverSettings::default()).unwrap();
        (pipeline, data)
    }

    #[test]
    fn test_fit_learns_something() {
        let (pipeline, data) = trained();
        let eval = pipeline.evaluate(&data).unwrap();
        assert!(eval.accuracy > 0.55, "accuracy = {}", eval.accuracy);
        assert_eq!(eval.confusion.total(), data.len());
        assert_eq!(pipeline.hyperparams(), HP);
    }

    #[test]
    fn test_single_and_batch_predictions_agree() {
        let (pipeline, data) = trained();
        let batch = pipeline
            .predict_batch(&data.features_matrix::<CpuBackend>())
            .unwrap();
        for (sample, expected) in data.iter().zip(batch) {
            assert_eq!(pipeline.predict(&sample.features), expected);
        }
    }

    #[test]
    fn test_predict_is_total() {
        let (pipeline, _) = trained();
        for fv in [
            FeatureVector::new(0.0, 0.0, 0.0),
            FeatureVector::new(-1e6, 1e6, -3.0),
            FeatureVector::new(1e300, 1e300, 1e300),
        ] {
            assert!(Category::ALL.contains(&pipeline.predict(&fv)));
        }
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let (pipeline, data) = trained();
        let proba = pipeline
            .predict_proba(&data.features_matrix::<CpuBackend>())
            .unwrap();
        assert_eq!(proba.cols(), Category::COUNT);
        for row in proba.to_rows() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_training_set() {
        let result = RiskPipeline::<CpuBackend>::fit(
            &LabeledDataset::default(),
            HP,
            &SolverSettings::default(),
        );
        assert!(matches!(result, Err(RiskError::InsufficientData { samples: 0, .. })));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (pipeline, data) = trained();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");

        pipeline.save(&path).unwrap();
        assert!(!temp_path(&path).exists());
        let loaded = RiskPipeline::<CpuBackend>::load(&path).unwrap();

        assert_eq!(loaded.to_artifact(), pipeline.to_artifact());
        for sample in &data {
            assert_eq!(loaded.predict(&sample.features), pipeline.predict(&sample.features));
        }
    }

    fn assert_corrupt(edit: impl FnOnce(&mut serde_json::Value)) {
        let (pipeline, _) = trained();
        let mut doc = serde_json::to_value(pipeline.to_artifact()).unwrap();
        edit(&mut doc);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let err = RiskPipeline::<CpuBackend>::load(&path).err().unwrap();
        assert!(err.is_artifact_corrupt(), "unexpected error: {}", err);
    }

    #[test]
    fn test_load_rejects_wrong_format_and_version() {
        assert_corrupt(|doc| doc["format"] = "something-else".into());
        assert_corrupt(|doc| doc["version"] = 2.into());
    }

    #[test]
    fn test_load_rejects_bad_shapes() {
        assert_corrupt(|doc| {
            doc["classifier"]["weights"].as_array_mut().unwrap().pop();
        });
        assert_corrupt(|doc| doc["classifier"]["n_classes"] = 3.into());
        assert_corrupt(|doc| {
            doc["scaler"]["mean"].as_array_mut().unwrap().pop();
        });
        assert_corrupt(|doc| doc["feature_names"][0] = "height".into());
    }

    #[test]
    fn test_load_rejects_bad_values() {
        assert_corrupt(|doc| doc["scaler"]["std"][1] = 0.0.into());
        assert_corrupt(|doc| doc["hyperparams"]["c"] = (-1.0).into());
        assert_corrupt(|doc| {
            doc.as_object_mut().unwrap().remove("classifier");
        });
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"\x00\x01 not json").unwrap();
        assert!(RiskPipeline::<CpuBackend>::load(&path)
            .err()
            .unwrap()
            .is_artifact_corrupt());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RiskPipeline::<CpuBackend>::load(dir.path().join("absent.json"))
            .err()
            .unwrap();
        assert!(matches!(err, RiskError::Io(_)));
    }
}
