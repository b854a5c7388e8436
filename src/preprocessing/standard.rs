//! Standard Scaler (z-score normalization).
//!
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the per-feature training mean and `s` the population standard
//! deviation. Constant features get `s = 1` so they map to zero instead of NaN.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Configuration for [`StandardScaler`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// Center the data before scaling.
    pub with_mean: bool,
    /// Scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters of a fitted scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub config: StandardScalerConfig,
    /// Per-feature mean (zeros when `with_mean` is off).
    pub mean: Vec<f64>,
    /// Per-feature standard deviation (ones when `with_std` is off).
    pub std: Vec<f64>,
    pub n_features: usize,
}

/// Unfitted standard scaler.
#[derive(Clone, Debug)]
pub struct StandardScaler<B: Backend> {
    config: StandardScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for StandardScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> StandardScaler<B> {
    pub fn new() -> Self {
        Self::with_config(StandardScalerConfig::default())
    }

    pub fn with_config(config: StandardScalerConfig) -> Self {
        Self {
            config,
            _backend: PhantomData,
        }
    }

    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }
}

impl<B: Backend> Transformer<B> for StandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = if self.config.with_mean {
            data.col_mean()
        } else {
            Tensor1D::zeros(cols)
        };

        let std = if self.config.with_std {
            let adjusted = data
                .col_std(0)
                .to_vec()
                .into_iter()
                .map(|s| if s == 0.0 { 1.0 } else { s })
                .collect();
            Tensor1D::new(adjusted)
        } else {
            Tensor1D::new(vec![1.0; cols])
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted standard scaler.
#[derive(Clone)]
pub struct FittedStandardScaler<B: Backend> {
    config: StandardScalerConfig,
    mean: Tensor1D<B>,
    std: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedStandardScaler<B> {
    pub fn mean(&self) -> &Tensor1D<B> {
        &self.mean
    }

    pub fn std(&self) -> &Tensor1D<B> {
        &self.std
    }

    pub fn config(&self) -> &StandardScalerConfig {
        &self.config
    }

    /// Standardizes a single sample.
    ///
    /// The caller guarantees `x.len() == n_features_in()`.
    pub(crate) fn standardize_1d(&self, x: &Tensor1D<B>) -> Tensor1D<B> {
        let mut out = x.clone();
        if self.config.with_mean {
            out = out.sub(&self.mean);
        }
        if self.config.with_std {
            out = out.div(&self.std);
        }
        out
    }

    fn check_width(&self, cols: usize) -> Result<(), PreprocessingError> {
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }
        Ok(())
    }
}

impl<B: Backend> FittedTransformer<B> for FittedStandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_width(data.cols())?;
        let mut out = data.clone();
        if self.config.with_mean {
            out = out.sub_row_vector(&self.mean);
        }
        if self.config.with_std {
            out = out.div_row_vector(&self.std);
        }
        Ok(out)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.check_width(data.cols())?;
        let mut out = data.clone();
        if self.config.with_std {
            out = out.mul_row_vector(&self.std);
        }
        if self.config.with_mean {
            out = out.add_row_vector(&self.mean);
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(PreprocessingError::InvalidParameter(format!(
                "expected {} mean/std entries, got {}/{}",
                params.n_features,
                params.mean.len(),
                params.std.len()
            )));
        }
        if params.mean.iter().any(|m| !m.is_finite()) {
            return Err(PreprocessingError::InvalidParameter(
                "mean contains non-finite values".to_string(),
            ));
        }
        if params.std.iter().any(|&s| !s.is_finite() || s <= 0.0) {
            return Err(PreprocessingError::InvalidParameter(
                "std must be finite and strictly positive".to_string(),
            ));
        }

        Ok(Self {
            config: params.config,
            mean: Tensor1D::new(params.mean),
            std: Tensor1D::new(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn create_test_data() -> Tensor2D<CpuBackend> {
        // [[0, 1], [0, 1], [1, 3]]
        Tensor2D::new(vec![0.0, 1.0, 0.0, 1.0, 1.0, 3.0], 3, 2)
    }

    #[test]
    fn test_standard_scaler_fit() {
        let fitted = StandardScaler::<CpuBackend>::new()
            .fit(&create_test_data())
            .unwrap();

        let mean = fitted.mean().to_vec();
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((mean[1] - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_transform_moments() {
        let data = create_test_data();
        let z = StandardScaler::<CpuBackend>::new()
            .fit_transform(&data)
            .unwrap();

        for m in z.col_mean().to_vec() {
            assert!(m.abs() < 1e-12, "mean = {}", m);
        }
        for s in z.col_std(0).to_vec() {
            assert!((s - 1.0).abs() < 1e-9, "std = {}", s);
        }
    }

    #[test]
    fn test_standard_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        let recovered = fitted
            .inverse_transform(&fitted.transform(&data).unwrap())
            .unwrap();
        for (o, r) in data.to_vec().iter().zip(recovered.to_vec()) {
            assert!((o - r).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_feature_maps_to_zero() {
        let data = Tensor2D::<CpuBackend>::new(vec![5.0, 1.0, 5.0, 2.0, 5.0, 3.0], 3, 2);
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.std().to_vec()[0], 1.0);
        let z = fitted.transform(&data).unwrap();
        for row in z.to_rows() {
            assert_eq!(row[0], 0.0);
        }
    }

    #[test]
    fn test_standard_scaler_without_mean_and_std() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new()
            .with_mean(false)
            .with_std(false)
            .fit(&data)
            .unwrap();

        assert!(fitted.mean().to_vec().iter().all(|&m| m == 0.0));
        assert!(fitted.std().to_vec().iter().all(|&s| s == 1.0));
        assert_eq!(fitted.transform(&data).unwrap().to_vec(), data.to_vec());
    }

    #[test]
    fn test_standardize_1d_matches_batch() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();
        let batch = fitted.transform(&data).unwrap().to_rows();

        for (row, expected) in data.to_rows().into_iter().zip(batch) {
            let single = fitted.standardize_1d(&Tensor1D::new(row)).to_vec();
            assert_eq!(single, expected);
        }
    }

    #[test]
    fn test_empty_data_rejected() {
        let empty = Tensor2D::<CpuBackend>::new(vec![], 0, 3);
        assert!(matches!(
            StandardScaler::<CpuBackend>::new().fit(&empty),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_feature_mismatch() {
        let fitted = StandardScaler::<CpuBackend>::new()
            .fit(&create_test_data())
            .unwrap();
        let wrong = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 1, 3);

        assert!(matches!(
            fitted.transform(&wrong),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_from_params_validation() {
        let fitted = StandardScaler::<CpuBackend>::new()
            .fit(&create_test_data())
            .unwrap();

        let mut params = fitted.extract_params();
        params.std[1] = 0.0;
        assert!(FittedStandardScaler::<CpuBackend>::from_params(params).is_err());

        let mut params = fitted.extract_params();
        params.mean.pop();
        assert!(FittedStandardScaler::<CpuBackend>::from_params(params).is_err());

        let mut params = fitted.extract_params();
        params.mean[0] = f64::NAN;
        assert!(FittedStandardScaler::<CpuBackend>::from_params(params).is_err());
    }

    #[test]
    fn test_params_roundtrip_preserves_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();
        let rebuilt = FittedStandardScaler::<CpuBackend>::from_params(fitted.extract_params())
            .unwrap();

        assert_eq!(rebuilt.extract_params(), fitted.extract_params());
        assert_eq!(
            rebuilt.transform(&data).unwrap().to_vec(),
            fitted.transform(&data).unwrap().to_vec()
        );
    }
}
