//! Differentiable loss functions.

use crate::backend::{Backend, Scalar, Tensor2D};

/// A differentiable loss used during training.
///
/// `grad_wrt_prediction` is what gets passed to the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Scalar loss value, averaged over the batch.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// `∂L/∂prediction`.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Softmax cross-entropy over raw logits with one-hot targets.
///
/// `L = -(1/n) Σ_i Σ_k t_ik · log softmax(z_i)_k`
///
/// Gradient w.r.t. logits: `(softmax(Z) - T) / n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossEntropyLoss;

impl<B: Backend> Loss<B> for CrossEntropyLoss {
    type Prediction = Tensor2D<B>;
    type Target = Tensor2D<B>;

    fn loss(&self, logits: &Self::Prediction, targets: &Self::Target) -> Scalar<B> {
        let n = Scalar::<B>::new(logits.rows().max(1) as f64);
        -(logits.log_softmax_rows().mul(targets).sum() / n)
    }

    fn grad_wrt_prediction(
        &self,
        logits: &Self::Prediction,
        targets: &Self::Target,
    ) -> Self::Prediction {
        let inv_n = Scalar::<B>::new(1.0 / logits.rows().max(1) as f64);
        logits.softmax_rows().sub(targets).scale(&inv_n)
    }
}
