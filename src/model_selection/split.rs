use crate::error::{Result, RiskError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Disjoint train/test index sets covering `0..n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n_samples` with `seed` and holds out
/// `ceil(test_fraction · n_samples)` indices for testing.
///
/// # Errors
/// - [`RiskError::InvalidParameter`] if `test_fraction` is outside `(0, 1)`.
/// - [`RiskError::InsufficientData`] if either side would be empty.
pub fn train_test_split(n_samples: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(RiskError::InvalidParameter(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (test_fraction * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(RiskError::InsufficientData {
            samples: n_samples,
            required: 2,
        });
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    permutation.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = permutation.split_off(n_test);

    debug!(train = train.len(), test = permutation.len(), seed, "split dataset");
    Ok(TrainTestSplit {
        train,
        test: permutation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let split = train_test_split(200, 0.2, 42).unwrap();
        assert_eq!(split.train.len(), 160);
        assert_eq!(split.test.len(), 40);

        // ceil(0.2 * 11) = 3
        let split = train_test_split(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
    }

    #[test]
    fn test_disjoint_and_complete() {
        let split = train_test_split(57, 0.3, 9).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..57).collect::<Vec<_>>());
    }

    #[test]
    fn test_reproducible_under_seed() {
        assert_eq!(
            train_test_split(100, 0.2, 42).unwrap(),
            train_test_split(100, 0.2, 42).unwrap()
        );
        assert_ne!(
            train_test_split(100, 0.2, 42).unwrap(),
            train_test_split(100, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(matches!(
            train_test_split(10, 1.0, 0),
            Err(RiskError::InvalidParameter(_))
        ));
        assert!(matches!(
            train_test_split(10, f64::NAN, 0),
            Err(RiskError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_too_few_samples() {
        assert!(matches!(
            train_test_split(1, 0.2, 0),
            Err(RiskError::InsufficientData { samples: 1, .. })
        ));
        assert!(matches!(
            train_test_split(0, 0.2, 0),
            Err(RiskError::InsufficientData { samples: 0, .. })
        ));
    }
}
