//! Models with their training state encoded in the type.
//!
//! A model in the [`Unfitted`] state implements [`TrainableModel`] and is
//! driven by the [`Trainer`](crate::trainer::Trainer). Calling
//! [`TrainableModel::into_fitted`] yields the [`Fitted`] state, which only
//! implements [`InferenceModel`] and carries no training hyperparameters.

pub mod softmax;

pub use softmax::{SerializableSoftmaxParams, SoftmaxModel, SoftmaxParams, SoftmaxRegression};

use crate::backend::{Backend, Scalar};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Marker for a model that is still being trained.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker for a trained, inference-only model.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;

/// Errors raised when rebuilding a fitted model from its parameters.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{what}: expected {expected} values, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} contains non-finite values")]
    NonFinite(&'static str),
}

/// Model that can be trained by gradient descent.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params: ParamOps<B>;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss w.r.t. the parameters, given `∂L/∂prediction`.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic on parameter sets needed by optimizers and regularizers.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;

    fn scale(&self, scalar: Scalar<B>) -> Self;

    /// Squared L2 norm over every parameter.
    fn sq_norm(&self) -> f64;
}

/// Trained model answering predictions.
pub trait InferenceModel<B: Backend>: Sized {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    type ParamsRepr: Serialize + DeserializeOwned;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    fn extract_params(&self) -> Self::ParamsRepr;

    /// Rebuilds a model, validating shapes and values.
    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError>;
}
