use crate::dataset::{LabeledDataset, LabeledSample};
use crate::error::{Result, RiskError};
use crate::policy::{FeatureVector, RuleTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::info;

/// Half-open uniform sampling range per feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRanges {
    pub age: Range<f64>,
    pub visit_frequency: Range<f64>,
    pub activity_level: Range<f64>,
}

impl Default for FeatureRanges {
    fn default() -> Self {
        Self {
            age: 0.0..10.0,
            visit_frequency: 0.0..10.0,
            activity_level: 0.0..10.0,
        }
    }
}

impl FeatureRanges {
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("age", &self.age),
            ("visit_frequency", &self.visit_frequency),
            ("activity_level", &self.activity_level),
        ];
        for (name, range) in named {
            if !(range.start.is_finite() && range.end.is_finite() && range.start < range.end) {
                return Err(RiskError::InvalidParameter(format!(
                    "{} range must be finite and non-empty, got {:?}",
                    name, range
                )));
            }
        }
        Ok(())
    }
}

/// Samples feature vectors uniformly and labels them with a [`RuleTable`].
#[derive(Clone, Debug, Default)]
pub struct SyntheticGenerator {
    ranges: FeatureRanges,
    rules: RuleTable,
}

impl SyntheticGenerator {
    pub fn new(ranges: FeatureRanges, rules: RuleTable) -> Result<Self> {
        ranges.validate()?;
        Ok(Self { ranges, rules })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Draws `n_samples` labeled samples. The same seed always yields the
    /// same dataset.
    pub fn generate(&self, n_samples: usize, seed: u64) -> Result<LabeledDataset> {
        if n_samples == 0 {
            return Err(RiskError::InvalidParameter(
                "sample count must be positive".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let dataset: LabeledDataset = (0..n_samples)
            .map(|_| {
                let features = FeatureVector::new(
                    rng.gen_range(self.ranges.age.clone()),
                    rng.gen_range(self.ranges.visit_frequency.clone()),
                    rng.gen_range(self.ranges.activity_level.clone()),
                );
                LabeledSample::new(features, self.rules.classify(&features))
            })
            .collect();

        info!(
            samples = n_samples,
            seed,
            class_counts = ?dataset.class_counts(),
            "generated synthetic dataset"
        );
        Ok(dataset)
    }
}
