//! Run configuration.
//!
//! Every section is optional in the JSON file; missing keys take the defaults
//! below.
//!
//! ```json
//! {
//!   "generator": { "n_samples": 200, "seed": 42 },
//!   "split": { "test_fraction": 0.2, "seed": 42 },
//!   "search": { "folds": 5, "strategy": "stratified",
//!               "grid": { "c": [0.01, 0.1, 1, 10, 100], "max_iter": [100, 200, 300] } },
//!   "solver": { "learning_rate": 0.5, "tol": 0.0001 },
//!   "artifact_path": "model.json"
//! }
//! ```

use crate::error::{Result, RiskError};
use crate::model_selection::{CvStrategy, ParamGrid};
use crate::pipeline::SolverSettings;
use crate::policy::FeatureRanges;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub n_samples: usize,
    pub seed: u64,
    pub ranges: FeatureRanges,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_samples: 200,
            seed: 42,
            ranges: FeatureRanges::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of samples held out; the test set has `ceil(fraction · n)` samples.
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub folds: usize,
    pub strategy: CvStrategy,
    pub grid: ParamGrid,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            folds: 5,
            strategy: CvStrategy::default(),
            grid: ParamGrid::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub generator: GeneratorConfig,
    pub split: SplitConfig,
    pub search: SearchConfig,
    pub solver: SolverSettings,
    pub artifact_path: PathBuf,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            split: SplitConfig::default(),
            search: SearchConfig::default(),
            solver: SolverSettings::default(),
            artifact_path: PathBuf::from("model.json"),
        }
    }
}

impl RiskConfig {
    /// Reads a JSON config file and validates it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.generator.n_samples == 0 {
            return Err(RiskError::InvalidParameter(
                "generator.n_samples must be positive".to_string(),
            ));
        }
        self.generator.ranges.validate()?;

        let f = self.split.test_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(RiskError::InvalidParameter(format!(
                "split.test_fraction must be in (0, 1), got {}",
                f
            )));
        }

        if self.search.folds < 2 {
            return Err(RiskError::InvalidParameter(format!(
                "search.folds must be at least 2, got {}",
                self.search.folds
            )));
        }
        self.search.grid.validate()?;
        self.solver.validate()?;

        if self.artifact_path.as_os_str().is_empty() {
            return Err(RiskError::InvalidParameter(
                "artifact_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RiskConfig::default();
        config.validate().unwrap();
        assert_eq!(config.generator.n_samples, 200);
        assert_eq!(config.search.folds, 5);
        assert_eq!(config.search.grid.len(), 15);
        assert_eq!(config.artifact_path, PathBuf::from("model.json"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "generator": { "n_samples": 50 }, "search": { "strategy": "k_fold" } }"#,
        )
        .unwrap();

        let config = RiskConfig::load(&path).unwrap();
        assert_eq!(config.generator.n_samples, 50);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.search.strategy, CvStrategy::KFold);
        assert_eq!(config.search.folds, 5);
        assert_eq!(config.solver, SolverSettings::default());
    }

    #[test]
    fn test_validation_failures() {
        let cases: Vec<fn(&mut RiskConfig)> = vec![
            |c| c.generator.n_samples = 0,
            |c| c.generator.ranges.age = 5.0..5.0,
            |c| c.split.test_fraction = 1.0,
            |c| c.search.folds = 1,
            |c| c.search.grid.c.clear(),
            |c| c.solver.learning_rate = 0.0,
        ];
        for edit in cases {
            let mut config = RiskConfig::default();
            edit(&mut config);
            assert!(matches!(
                config.validate(),
                Err(RiskError::InvalidParameter(_))
            ));
        }
    }
}
