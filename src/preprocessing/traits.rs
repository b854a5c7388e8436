//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: configuration only; learns statistics from training data.
//! - [`FittedTransformer`]: learned statistics; applies and reverses them.

use crate::backend::Backend;
use crate::preprocessing::error::PreprocessingError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Unfitted transformer with hyperparameters.
///
/// # Type Parameters
/// - `B`: backend used for computation.
/// - `Input` / `Output`: data types before and after transformation.
/// - `Params`: serializable form of the learned statistics.
/// - `Fitted`: the fitted transformer produced by [`Transformer::fit`].
pub trait Transformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params: Serialize + DeserializeOwned;
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Learns statistics from `data`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::EmptyData`] when `data` has no rows.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fits on `data` and returns `data` transformed with the learned statistics.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.fit(data)?.transform(data)
    }
}

/// Fitted transformer ready for inference.
///
/// `extract_params()` followed by `from_params()` reproduces an equivalent
/// transformer.
pub trait FittedTransformer<B: Backend>: Clone + Sized {
    type Input;
    type Output;
    type Params: Serialize + DeserializeOwned;

    /// Applies the learned statistics.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::FeatureMismatch`] if the input width
    /// differs from the width seen during fit.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Reverses [`FittedTransformer::transform`].
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError>;

    fn extract_params(&self) -> Self::Params;

    /// Rebuilds a fitted transformer, validating the parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
