//! Parameter update rules.

use crate::backend::{Backend, Scalar};
use crate::model::ParamOps;

/// Gradient-based optimizer.
///
/// Training logic lives in the [`Trainer`](crate::trainer::Trainer); an
/// optimizer only maps `(params, gradients)` to new parameters.
pub trait Optimizer<B: Backend, P> {
    /// Returns updated parameters without mutating the inputs.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain gradient descent: `θ ← θ - η · ∇L(θ)`.
///
/// When the trainer feeds the whole dataset as one batch this is
/// deterministic full-batch gradient descent.
///
/// ```rust
/// use health_risk::backend::CpuBackend;
/// use health_risk::optimizer::SGD;
///
/// let sgd = SGD::<CpuBackend>::new(0.5);
/// assert_eq!(sgd.learning_rate(), 0.5);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend, P: ParamOps<B>> Optimizer<B, P> for SGD<B> {
    fn step(&self, params: &P, grads: &P) -> P {
        params.add(&grads.scale(-self.lr))
    }
}
