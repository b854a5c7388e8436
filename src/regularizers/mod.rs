//! Weight penalties added to the data loss during training.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::{SoftmaxParams, SoftmaxRegression, TrainableModel};

/// Returns the penalty value and its gradient w.r.t. the model parameters.
pub trait Regularizer<B: Backend, M: TrainableModel<B>> {
    fn regularizer_penalty_grad(&self, model: &M) -> (Scalar<B>, M::Gradients);
}

/// Ridge penalty `λ/2 · ‖W‖²`; the bias is not penalized.
#[derive(Clone, Copy, Debug)]
pub struct L2 {
    lambda: f64,
}

impl L2 {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// Penalty equivalent to an inverse regularization strength `c` on a
    /// sum-of-losses objective over `n_samples` samples, rescaled to the mean
    /// loss: `λ = 1 / (c · n_samples)`.
    pub fn from_inverse_strength(c: f64, n_samples: usize) -> Self {
        Self::new(1.0 / (c * n_samples.max(1) as f64))
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl<B: Backend> Regularizer<B, SoftmaxRegression<B>> for L2 {
    fn regularizer_penalty_grad(
        &self,
        model: &SoftmaxRegression<B>,
    ) -> (Scalar<B>, SoftmaxParams<B>) {
        let params = model.params();
        let lambda = Scalar::<B>::new(self.lambda);
        let penalty = Scalar::<B>::new(0.5) * lambda * params.weights.sq_norm();
        let grad = SoftmaxParams {
            weights: params.weights.scale(&lambda),
            bias: Tensor1D::zeros(params.bias.len()),
        };
        (penalty, grad)
    }
}

/// No penalty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRegularizer;

impl<B: Backend> Regularizer<B, SoftmaxRegression<B>> for NoRegularizer {
    fn regularizer_penalty_grad(
        &self,
        model: &SoftmaxRegression<B>,
    ) -> (Scalar<B>, SoftmaxParams<B>) {
        let (rows, cols) = model.params().weights.shape();
        (
            Scalar::new(0.0),
            SoftmaxParams {
                weights: Tensor2D::zeros(rows, cols),
                bias: Tensor1D::zeros(cols),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn model() -> SoftmaxRegression<CpuBackend> {
        SoftmaxRegression::with_params(SoftmaxParams {
            weights: Tensor2D::new(vec![1.0, -2.0, 0.0, 3.0], 2, 2),
            bias: Tensor1D::new(vec![10.0, 10.0]),
        })
    }

    #[test]
    fn test_l2_penalty_and_grad() {
        let (penalty, grad) = L2::new(0.1).regularizer_penalty_grad(&model());
        // 0.5 * 0.1 * (1 + 4 + 0 + 9)
        assert!((penalty.to_f64() - 0.7).abs() < 1e-12);
        let expected = [0.1, -0.2, 0.0, 0.3];
        for (g, e) in grad.weights.to_vec().iter().zip(expected) {
            assert!((g - e).abs() < 1e-12);
        }
        assert_eq!(grad.bias.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_l2_from_inverse_strength() {
        let l2 = L2::from_inverse_strength(10.0, 160);
        assert!((l2.lambda() - 1.0 / 1600.0).abs() < 1e-15);
    }

    #[test]
    fn test_no_regularizer_is_zero() {
        let (penalty, grad) = NoRegularizer.regularizer_penalty_grad(&model());
        assert_eq!(penalty.to_f64(), 0.0);
        assert!(grad.weights.to_vec().iter().all(|&g| g == 0.0));
        assert!(grad.bias.to_vec().iter().all(|&g| g == 0.0));
    }
}
