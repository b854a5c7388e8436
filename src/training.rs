//! Training orchestration: generate, split, search, refit, evaluate, persist.

use crate::backend::{Backend, CpuBackend};
use crate::config::RiskConfig;
use crate::dataset::{csv_io, LabeledDataset};
use crate::error::{Result, RiskError};
use crate::metrics::{accuracy, ConfusionMatrix};
use crate::model_selection::{grid_search, train_test_split, CandidateScore, Hyperparams};
use crate::pipeline::RiskPipeline;
use crate::policy::{RuleTable, SyntheticGenerator};
use crate::predictor::Predictor;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Summary of one training run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingReport {
    pub best: Hyperparams,
    /// Mean cross-validated accuracy of `best`.
    pub best_score: f64,
    #[serde(skip)]
    pub candidates: Vec<CandidateScore>,
    pub test_accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub train_size: usize,
    pub test_size: usize,
}

/// Generates the synthetic dataset described by `config` and trains on it.
pub fn train(config: &RiskConfig) -> Result<(RiskPipeline<CpuBackend>, TrainingReport)> {
    config.validate()?;
    let generator =
        SyntheticGenerator::new(config.generator.ranges.clone(), RuleTable::standard())?;
    let data = generator.generate(config.generator.n_samples, config.generator.seed)?;
    train_on_dataset(&data, config)
}

/// Splits `data`, grid-searches the classifier on the training part with
/// cross-validation, refits the winner on the whole training part and scores
/// it on the held-out part.
///
/// # Errors
/// [`RiskError::InsufficientData`] if `data` is empty or has fewer samples
/// than folds, or if the training part cannot fill every fold.
pub fn train_on_dataset<B: Backend>(
    data: &LabeledDataset,
    config: &RiskConfig,
) -> Result<(RiskPipeline<B>, TrainingReport)> {
    let k = config.search.folds;
    if data.len() < k.max(1) {
        return Err(RiskError::InsufficientData {
            samples: data.len(),
            required: k.max(1),
        });
    }

    let split = train_test_split(data.len(), config.split.test_fraction, config.split.seed)?;
    let train_set = data.subset(&split.train);
    let test_set = data.subset(&split.test);
    info!(
        train = train_set.len(),
        test = test_set.len(),
        "split dataset"
    );

    let folds = config.search.strategy.folds(&train_set.labels(), k)?;
    let solver = &config.solver;
    let search = grid_search(&config.search.grid, &folds, |hp, fold| {
        let fit_part = train_set.subset(&fold.train);
        let validation = train_set.subset(&fold.validation);
        let pipeline = RiskPipeline::<B>::fit(&fit_part, *hp, solver)?;
        let predicted: Vec<usize> = validation
            .iter()
            .map(|s| pipeline.predict(&s.features).index())
            .collect();
        Ok(accuracy(&validation.labels(), &predicted))
    })?;
    info!(best = %search.best, cv_accuracy = search.best_score, "grid search finished");

    let pipeline = RiskPipeline::<B>::fit(&train_set, search.best, solver)?;
    let evaluation = pipeline.evaluate(&test_set)?;
    info!(accuracy = evaluation.accuracy, "held-out evaluation");

    let report = TrainingReport {
        best: search.best,
        best_score: search.best_score,
        candidates: search.candidates,
        test_accuracy: evaluation.accuracy,
        confusion: evaluation.confusion,
        train_size: train_set.len(),
        test_size: test_set.len(),
    };
    Ok((pipeline, report))
}

/// Loads the persisted pipeline, or trains and persists a new one.
///
/// Training happens when the artifact is absent, when `force` is set, or
/// when the artifact is corrupt (it is then overwritten). Any other load
/// error is returned.
pub fn load_or_train(config: &RiskConfig, force: bool) -> Result<Predictor> {
    let path = &config.artifact_path;

    if !force && path.exists() {
        match RiskPipeline::<CpuBackend>::load(path) {
            Ok(pipeline) => return Ok(Predictor::new(pipeline)),
            Err(err) if err.is_artifact_corrupt() => {
                warn!(error = %err, "discarding corrupt artifact, retraining");
            }
            Err(err) => return Err(err),
        }
    } else if !force {
        info!(path = %path.display(), "no persisted model, training");
    }

    let (pipeline, report) = train(config)?;
    persist(pipeline, &report, path)
}

/// Trains on a labeled CSV dataset instead of generated data and overwrites
/// the artifact at `config.artifact_path`.
pub fn train_from_csv<P: AsRef<Path>>(config: &RiskConfig, data_path: P) -> Result<Predictor> {
    config.validate()?;
    let data = csv_io::read_csv_file(&data_path)?;
    info!(
        samples = data.len(),
        path = %data_path.as_ref().display(),
        "loaded dataset"
    );
    let (pipeline, report) = train_on_dataset::<CpuBackend>(&data, config)?;
    persist(pipeline, &report, &config.artifact_path)
}

fn persist(
    pipeline: RiskPipeline<CpuBackend>,
    report: &TrainingReport,
    path: &Path,
) -> Result<Predictor> {
    pipeline.save(path)?;
    info!(
        best = %report.best,
        test_accuracy = report.test_accuracy,
        "model ready"
    );
    Ok(Predictor::new(pipeline))
}
