use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};

/// Train/validation index sets of one cross-validation fold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// How cross-validation folds are formed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvStrategy {
    /// Contiguous blocks; the first `n % k` folds get one extra sample.
    KFold,
    /// Class-balanced: samples of each class, in class order, are dealt
    /// round-robin across folds.
    #[default]
    Stratified,
}

impl CvStrategy {
    pub fn folds(&self, labels: &[usize], k: usize) -> Result<Vec<Fold>> {
        match self {
            CvStrategy::KFold => k_fold(labels.len(), k),
            CvStrategy::Stratified => stratified_k_fold(labels, k),
        }
    }
}

fn check(n_samples: usize, k: usize) -> Result<()> {
    if k < 2 {
        return Err(RiskError::InvalidParameter(format!(
            "number of folds must be at least 2, got {}",
            k
        )));
    }
    if n_samples < k {
        return Err(RiskError::InsufficientData {
            samples: n_samples,
            required: k,
        });
    }
    Ok(())
}

fn folds_from_assignment(assignment: &[usize], k: usize) -> Vec<Fold> {
    (0..k)
        .map(|fold| {
            let (validation, train): (Vec<usize>, Vec<usize>) =
                (0..assignment.len()).partition(|&i| assignment[i] == fold);
            Fold { train, validation }
        })
        .collect()
}

/// Splits `0..n_samples` into `k` contiguous validation blocks.
pub fn k_fold(n_samples: usize, k: usize) -> Result<Vec<Fold>> {
    check(n_samples, k)?;
    let (base, extra) = (n_samples / k, n_samples % k);
    let mut assignment = Vec::with_capacity(n_samples);
    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        assignment.extend(std::iter::repeat(fold).take(size));
    }
    Ok(folds_from_assignment(&assignment, k))
}

/// Splits samples into `k` folds preserving class proportions as closely as
/// possible. Every fold is non-empty when `labels.len() >= k`.
pub fn stratified_k_fold(labels: &[usize], k: usize) -> Result<Vec<Fold>> {
    check(labels.len(), k)?;
    let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
    let mut assignment = vec![0; labels.len()];
    let mut counter = 0;
    for class in 0..n_classes {
        for (i, _) in labels.iter().enumerate().filter(|(_, &l)| l == class) {
            assignment[i] = counter % k;
            counter += 1;
        }
    }
    Ok(folds_from_assignment(&assignment, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_fold_sizes() {
        let folds = k_fold(12, 5).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.validation.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2, 2]);
        assert_eq!(folds[0].validation, vec![0, 1, 2]);
        assert_eq!(folds[4].validation, vec![10, 11]);
    }

    #[test]
    fn test_each_index_validated_once() {
        for folds in [
            k_fold(23, 5).unwrap(),
            stratified_k_fold(&[0, 1, 1, 2, 3, 3, 3, 0, 1, 2, 2], 5).unwrap(),
        ] {
            let n = folds[0].train.len() + folds[0].validation.len();
            let mut seen = vec![0; n];
            for fold in &folds {
                assert!(!fold.validation.is_empty());
                assert_eq!(fold.train.len() + fold.validation.len(), n);
                for &i in &fold.validation {
                    seen[i] += 1;
                    assert!(!fold.train.contains(&i));
                }
            }
            assert!(seen.iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn test_stratified_balances_classes() {
        let labels = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        for fold in stratified_k_fold(&labels, 5).unwrap() {
            let ones = fold.validation.iter().filter(|&&i| labels[i] == 1).count();
            assert_eq!(fold.validation.len(), 2);
            assert_eq!(ones, 1);
        }
    }

    #[test]
    fn test_strategy_dispatch() {
        let labels = [1, 0, 1, 0];
        assert_eq!(CvStrategy::KFold.folds(&labels, 2).unwrap(), k_fold(4, 2).unwrap());
        assert_eq!(
            CvStrategy::Stratified.folds(&labels, 2).unwrap(),
            stratified_k_fold(&labels, 2).unwrap()
        );
    }

    #[test]
    fn test_fewer_samples_than_folds() {
        assert!(matches!(
            k_fold(4, 5),
            Err(RiskError::InsufficientData {
                samples: 4,
                required: 5
            })
        ));
        assert!(matches!(
            stratified_k_fold(&[], 5),
            Err(RiskError::InsufficientData { samples: 0, .. })
        ));
    }

    #[test]
    fn test_single_fold_rejected() {
        assert!(matches!(k_fold(10, 1), Err(RiskError::InvalidParameter(_))));
    }

    #[test]
    fn test_strategy_serde_names() {
        assert_eq!(serde_json::to_string(&CvStrategy::KFold).unwrap(), "\"k_fold\"");
        let s: CvStrategy = serde_json::from_str("\"stratified\"").unwrap();
        assert_eq!(s, CvStrategy::Stratified);
    }
}
