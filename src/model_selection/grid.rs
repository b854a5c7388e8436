use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of the search space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    /// Inverse regularization strength; larger means weaker L2.
    pub c: f64,
    /// Maximum number of gradient-descent epochs.
    pub max_iter: usize,
}

impl fmt::Display for Hyperparams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C={} max_iter={}", self.c, self.max_iter)
    }
}

/// Cartesian grid over `c` and `max_iter`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamGrid {
    pub c: Vec<f64>,
    pub max_iter: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            c: vec![0.01, 0.1, 1.0, 10.0, 100.0],
            max_iter: vec![100, 200, 300],
        }
    }
}

impl ParamGrid {
    pub fn validate(&self) -> Result<()> {
        if self.c.is_empty() || self.max_iter.is_empty() {
            return Err(RiskError::InvalidParameter(
                "parameter grid must not be empty".to_string(),
            ));
        }
        if let Some(c) = self.c.iter().find(|c| !(c.is_finite() && **c > 0.0)) {
            return Err(RiskError::InvalidParameter(format!(
                "C must be finite and positive, got {}",
                c
            )));
        }
        if self.max_iter.contains(&0) {
            return Err(RiskError::InvalidParameter(
                "max_iter must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.c.len() * self.max_iter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All combinations; `c` varies slowest.
    pub fn candidates(&self) -> Vec<Hyperparams> {
        self.c
            .iter()
            .flat_map(|&c| self.max_iter.iter().map(move |&max_iter| Hyperparams { c, max_iter }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = ParamGrid::default();
        assert_eq!(grid.len(), 15);
        let candidates = grid.candidates();
        assert_eq!(candidates[0], Hyperparams { c: 0.01, max_iter: 100 });
        assert_eq!(candidates[1], Hyperparams { c: 0.01, max_iter: 200 });
        assert_eq!(candidates[3], Hyperparams { c: 0.1, max_iter: 100 });
        assert_eq!(candidates[14], Hyperparams { c: 100.0, max_iter: 300 });
    }

    #[test]
    fn test_validate() {
        assert!(ParamGrid::default().validate().is_ok());
        let bad = ParamGrid {
            c: vec![1.0, -1.0],
            ..ParamGrid::default()
        };
        assert!(bad.validate().is_err());
        let bad = ParamGrid {
            max_iter: vec![],
            ..ParamGrid::default()
        };
        assert!(bad.validate().is_err());
        let bad = ParamGrid {
            max_iter: vec![0],
            ..ParamGrid::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_display() {
        let hp = Hyperparams { c: 0.1, max_iter: 200 };
        assert_eq!(hp.to_string(), "C=0.1 max_iter=200");
    }
}
