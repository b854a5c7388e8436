//! Multinomial logistic regression.
//!
//! - [`SoftmaxRegression`] = `SoftmaxModel<Unfitted>`: trained by the
//!   [`Trainer`](crate::trainer::Trainer) on one-hot targets.
//! - `SoftmaxModel<Fitted>`: predicts class indices and probabilities.
//!
//! Logits are `Z = X·W + b` with `W` of shape `n_features × n_classes`.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::{Fitted, InferenceModel, ModelError, ParamOps, TrainableModel, Unfitted};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and per-class bias.
#[derive(Clone, Debug)]
pub struct SoftmaxParams<B: Backend> {
    pub weights: Tensor2D<B>,
    pub bias: Tensor1D<B>,
}

impl<B: Backend> SoftmaxParams<B> {
    pub fn zeros(n_features: usize, n_classes: usize) -> Self {
        Self {
            weights: Tensor2D::zeros(n_features, n_classes),
            bias: Tensor1D::zeros(n_classes),
        }
    }
}

impl<B: Backend> ParamOps<B> for SoftmaxParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias.add(&other.bias),
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias.scale(&scalar),
        }
    }

    fn sq_norm(&self) -> f64 {
        self.weights.sq_norm().to_f64() + self.bias.dot(&self.bias).to_f64()
    }
}

/// Plain representation of [`SoftmaxParams`]; `weights` is row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableSoftmaxParams {
    pub n_features: usize,
    pub n_classes: usize,
    pub weights: Vec<f64>,
    pub bias: Vec<f64>,
}

impl<B: Backend> From<&SoftmaxParams<B>> for SerializableSoftmaxParams {
    fn from(params: &SoftmaxParams<B>) -> Self {
        let (n_features, n_classes) = params.weights.shape();
        Self {
            n_features,
            n_classes,
            weights: params.weights.to_vec(),
            bias: params.bias.to_vec(),
        }
    }
}

impl<B: Backend> TryFrom<SerializableSoftmaxParams> for SoftmaxParams<B> {
    type Error = ModelError;

    fn try_from(value: SerializableSoftmaxParams) -> Result<Self, Self::Error> {
        let expected = value.n_features * value.n_classes;
        if value.n_classes == 0 {
            return Err(ModelError::ShapeMismatch {
                what: "classes",
                expected: 1,
                got: 0,
            });
        }
        if value.weights.len() != expected {
            return Err(ModelError::ShapeMismatch {
                what: "weights",
                expected,
                got: value.weights.len(),
            });
        }
        if value.bias.len() != value.n_classes {
            return Err(ModelError::ShapeMismatch {
                what: "bias",
                expected: value.n_classes,
                got: value.bias.len(),
            });
        }
        if value.weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NonFinite("weights"));
        }
        if value.bias.iter().any(|b| !b.is_finite()) {
            return Err(ModelError::NonFinite("bias"));
        }

        Ok(Self {
            weights: Tensor2D::new(value.weights, value.n_features, value.n_classes),
            bias: Tensor1D::new(value.bias),
        })
    }
}

/// Softmax classifier with state encoded at the type level.
#[derive(Clone, Debug)]
pub struct SoftmaxModel<B: Backend, S> {
    params: SoftmaxParams<B>,
    _state: PhantomData<S>,
}

pub type SoftmaxRegression<B> = SoftmaxModel<B, Unfitted>;

impl<B: Backend> SoftmaxRegression<B> {
    /// Zero-initialized classifier.
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        Self::with_params(SoftmaxParams::zeros(n_features, n_classes))
    }

    /// Starts training from the given parameters.
    pub fn with_params(params: SoftmaxParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl<B: Backend, S> SoftmaxModel<B, S> {
    pub fn n_features(&self) -> usize {
        self.params.weights.rows()
    }

    pub fn n_classes(&self) -> usize {
        self.params.weights.cols()
    }

    fn logits(&self, x: &Tensor2D<B>) -> Tensor2D<B> {
        x.dot(&self.params.weights).add_row_vector(&self.params.bias)
    }
}

impl<B: Backend> TrainableModel<B> for SoftmaxRegression<B> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor2D<B>;
    type Params = SoftmaxParams<B>;
    type Gradients = SoftmaxParams<B>;
    type Output = SoftmaxModel<B, Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        self.logits(x)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        SoftmaxParams {
            weights: x.tdot(grad_output),
            bias: grad_output.col_sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, new_params: &Self::Params) {
        self.params = new_params.clone();
    }

    fn into_fitted(self) -> Self::Output {
        SoftmaxModel::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> SoftmaxModel<B, Fitted> {
    pub fn new(params: SoftmaxParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &SoftmaxParams<B> {
        &self.params
    }

    /// Class probabilities for a batch; each row sums to one.
    pub fn predict_proba(&self, x: &Tensor2D<B>) -> Tensor2D<B> {
        self.logits(x).softmax_rows()
    }
}

/// Prediction is the arg-max logit; ties go to the lowest class index.
impl<B: Backend> InferenceModel<B> for SoftmaxModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = usize;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Vec<usize>;
    type ParamsRepr = SerializableSoftmaxParams;

    fn predict(&self, x: &Self::InputSingle) -> Self::OutputSingle {
        self.params
            .weights
            .vecmat(x)
            .add(&self.params.bias)
            .argmax()
    }

    fn predict_batch(&self, x: &Self::InputBatch) -> Self::OutputBatch {
        self.logits(x).argmax_rows()
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError> {
        Ok(Self::new(SoftmaxParams::try_from(params)?))
    }
}
