//! Shared prediction handle.

use crate::backend::CpuBackend;
use crate::error::InvalidInputError;
use crate::pipeline::RiskPipeline;
use crate::policy::{Category, FeatureVector};
use serde_json::Value;
use std::sync::Arc;

/// Immutable, cheaply clonable handle to a trained pipeline.
///
/// Clones share the same model; every method takes `&self`, so a `Predictor`
/// can be handed to any number of threads.
#[derive(Clone)]
pub struct Predictor {
    pipeline: Arc<RiskPipeline<CpuBackend>>,
}

impl Predictor {
    pub fn new(pipeline: RiskPipeline<CpuBackend>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &RiskPipeline<CpuBackend> {
        &self.pipeline
    }

    /// Categorizes one person.
    ///
    /// # Errors
    /// [`InvalidInputError`] if any value is NaN or infinite.
    pub fn predict(
        &self,
        age: f64,
        visit_frequency: f64,
        activity_level: f64,
    ) -> Result<Category, InvalidInputError> {
        let features = FeatureVector::checked(age, visit_frequency, activity_level)?;
        Ok(self.pipeline.predict(&features))
    }

    pub fn predict_features(
        &self,
        features: &FeatureVector,
    ) -> Result<Category, InvalidInputError> {
        self.predict(features.age, features.visit_frequency, features.activity_level)
    }

    /// Parses raw text fields (as a form would submit them) and predicts.
    pub fn predict_fields(
        &self,
        age: Option<&str>,
        visit_frequency: Option<&str>,
        activity_level: Option<&str>,
    ) -> Result<Category, InvalidInputError> {
        let features = FeatureVector::from_fields(age, visit_frequency, activity_level)?;
        Ok(self.pipeline.predict(&features))
    }

    /// Predicts from a JSON object keyed by the three feature names.
    pub fn predict_json(&self, body: &Value) -> Result<Category, InvalidInputError> {
        let features = FeatureVector::from_json(body)?;
        Ok(self.pipeline.predict(&features))
    }
}

impl From<RiskPipeline<CpuBackend>> for Predictor {
    fn from(pipeline: RiskPipeline<CpuBackend>) -> Self {
        Self::new(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputProblem;
    use crate::model_selection::Hyperparams;
    use crate::pipeline::SolverSettings;
    use crate::policy::SyntheticGenerator;
    use serde_json::json;

    fn predictor() -> Predictor {
        let data = SyntheticGenerator::default().generate(80, 11).unwrap();
        let hp = Hyperparams {
            c: 10.0,
            max_iter: 100,
        };
        RiskPipeline::fit(&data, hp, &SolverSettings::default())
            .unwrap()
            .into()
    }

    #[test]
    fn test_all_entry_points_agree() {
        let p = predictor();
        let direct = p.predict(4.0, 6.5, 7.0).unwrap();
        assert_eq!(p.predict_features(&FeatureVector::new(4.0, 6.5, 7.0)).unwrap(), direct);
        assert_eq!(p.predict_fields(Some("4"), Some(" 6.5"), Some("7.0")).unwrap(), direct);
        assert_eq!(
            p.predict_json(&json!({
                "age": 4,
                "medical_visits_frequency": "6.5",
                "physical_activity_level": 7.0
            }))
            .unwrap(),
            direct
        );
    }

    #[test]
    fn test_missing_and_non_numeric_rejected() {
        let p = predictor();

        let err = p.predict_fields(Some("0"), None, Some("1")).unwrap_err();
        assert_eq!(err.field, "medical_visits_frequency");
        assert_eq!(err.problem, InputProblem::Missing);

        let err = p
            .predict_json(&json!({
                "age": 0,
                "medical_visits_frequency": true,
                "physical_activity_level": 1
            }))
            .unwrap_err();
        assert!(matches!(err.problem, InputProblem::NotNumeric(_)));

        assert!(p.predict(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_clones_share_model() {
        let p = predictor();
        let q = p.clone();
        assert!(Arc::ptr_eq(&p.pipeline, &q.pipeline));
    }
}
