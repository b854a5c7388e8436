//! Training loop orchestration.
//!
//! A [`Trainer`] is immutable once built and combines a loss, an optimizer
//! and a regularizer. It drives any [`TrainableModel`] over a [`Dataset`] for
//! at most `max_epochs` epochs and stops early once the gradient norm of an
//! epoch drops below `tol`.

use crate::backend::{Backend, Scalar, Tensor2D};
use crate::dataset::Dataset;
use crate::loss::Loss;
use crate::model::{ParamOps, TrainableModel};
use crate::optimizer::Optimizer;
use crate::regularizers::Regularizer;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("dataset length is unknown")]
    UnknownLength,

    #[error("batch size must be positive")]
    ZeroBatchSize,

    #[error("failed to load batch: {0}")]
    Batch(String),

    #[error("loss diverged at epoch {epoch}")]
    Diverged { epoch: usize },
}

/// What a training run produced, besides the model.
#[derive(Clone, Debug)]
pub struct FitOutcome<T> {
    pub model: T,
    /// Epochs actually run.
    pub epochs: usize,
    /// Mean regularized loss of the last epoch.
    pub final_loss: f64,
    /// Whether the gradient norm fell below the tolerance.
    pub converged: bool,
}

pub struct Trainer<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) tol: f64,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    pub(crate) regularizer: R,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

pub struct TrainerBuilder<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    batch_size: usize,
    max_epochs: usize,
    tol: f64,
    loss_fn: L,
    optimizer: O,
    regularizer: R,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P, R> TrainerBuilder<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    pub fn new(loss_fn: L, optimizer: O, regularizer: R) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 1000,
            tol: 0.0,
            loss_fn,
            optimizer,
            regularizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Feeds the whole dataset as a single batch every epoch.
    pub fn full_batch(self) -> Self {
        self.batch_size(usize::MAX)
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Gradient-norm tolerance; `0.0` disables early stopping.
    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P, R> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            tol: self.tol,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            regularizer: self.regularizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P, R> Trainer<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B, Target = Tensor2D<B>, Prediction = Tensor2D<B>>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = L::Prediction,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
    P: ParamOps<B>,
{
    pub fn builder(loss_fn: L, optimizer: O, regularizer: R) -> TrainerBuilder<B, L, O, M, P, R> {
        TrainerBuilder::new(loss_fn, optimizer, regularizer)
    }

    pub fn fit<D: Dataset>(&self, model: M, dataset: &D) -> Result<M::Output, TrainError> {
        self.fit_with_outcome(model, dataset).map(|outcome| outcome.model)
    }

    pub fn fit_with_outcome<D: Dataset>(
        &self,
        mut model: M,
        dataset: &D,
    ) -> Result<FitOutcome<M::Output>, TrainError> {
        if self.batch_size == 0 {
            return Err(TrainError::ZeroBatchSize);
        }
        let n_total = dataset.len().ok_or(TrainError::UnknownLength)?;
        if n_total == 0 {
            return Err(TrainError::EmptyDataset);
        }

        let mut epochs = 0;
        let mut final_loss = f64::NAN;
        let mut converged = false;

        for epoch in 0..self.max_epochs {
            let mut total_loss = Scalar::<B>::new(0.);
            let mut grad_sq_norm = 0.0;
            let mut n_batches = 0usize;

            for batch_result in dataset.batches::<B>(self.batch_size) {
                let (batch_x, batch_y) =
                    batch_result.map_err(|e| TrainError::Batch(format!("{:?}", e)))?;

                let preds = model.forward(&batch_x);
                let (reg_penalty, reg_grad) = self.regularizer.regularizer_penalty_grad(&model);
                total_loss = total_loss + self.loss_fn.loss(&preds, &batch_y) + reg_penalty;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let total_grads = model.backward(&batch_x, &grad_preds).add(&reg_grad);
                grad_sq_norm += total_grads.sq_norm();

                let new_params = self.optimizer.step(model.params(), &total_grads);
                model.update_params(&new_params);
                n_batches += 1;
            }

            epochs = epoch + 1;
            final_loss = total_loss.to_f64() / n_batches.max(1) as f64;
            if !final_loss.is_finite() {
                return Err(TrainError::Diverged { epoch });
            }
            let grad_norm = grad_sq_norm.sqrt();
            trace!(epoch, loss = final_loss, grad_norm, "epoch finished");

            if grad_norm < self.tol {
                converged = true;
                break;
            }
        }

        debug!(epochs, loss = final_loss, converged, "training finished");
        Ok(FitOutcome {
            model: model.into_fitted(),
            epochs,
            final_loss,
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor1D};
    use crate::dataset::InMemoryDataset;
    use crate::loss::CrossEntropyLoss;
    use crate::model::{InferenceModel, SoftmaxRegression};
    use crate::optimizer::SGD;
    use crate::regularizers::{NoRegularizer, L2};

    fn separable() -> InMemoryDataset {
        InMemoryDataset::new(
            vec![
                vec![-2.0, 0.0],
                vec![-1.5, 0.5],
                vec![2.0, 0.0],
                vec![1.5, -0.5],
                vec![0.0, 2.0],
                vec![0.5, 1.5],
            ],
            vec![0, 0, 1, 1, 2, 2],
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_fit_separates_classes() {
        let trainer = Trainer::builder(CrossEntropyLoss, SGD::<CpuBackend>::new(0.5), NoRegularizer)
            .full_batch()
            .max_epochs(300)
            .build();

        let fitted = trainer
            .fit(SoftmaxRegression::<CpuBackend>::new(2, 3), &separable())
            .unwrap();

        assert_eq!(fitted.predict(&Tensor1D::new(vec![-3.0, 0.0])), 0);
        assert_eq!(fitted.predict(&Tensor1D::new(vec![3.0, 0.0])), 1);
        assert_eq!(fitted.predict(&Tensor1D::new(vec![0.0, 3.0])), 2);
    }

    #[test]
    fn test_loss_decreases_with_more_epochs() {
        let ds = separable();
        let run = |epochs| {
            Trainer::builder(CrossEntropyLoss, SGD::<CpuBackend>::new(0.1), L2::new(0.01))
                .full_batch()
                .max_epochs(epochs)
                .build()
                .fit_with_outcome(SoftmaxRegression::<CpuBackend>::new(2, 3), &ds)
                .unwrap()
                .final_loss
        };
        assert!(run(50) < run(5));
    }

    #[test]
    fn test_tolerance_stops_early() {
        let outcome = Trainer::builder(CrossEntropyLoss, SGD::<CpuBackend>::new(0.5), L2::new(1.0))
            .full_batch()
            .max_epochs(10_000)
            .tol(1e-3)
            .build()
            .fit_with_outcome(SoftmaxRegression::<CpuBackend>::new(2, 3), &separable())
            .unwrap();

        assert!(outcome.converged);
        assert!(outcome.epochs < 10_000);
    }

    #[test]
    fn test_training_is_deterministic() {
        let ds = separable();
        let fit = || {
            Trainer::builder(CrossEntropyLoss, SGD::<CpuBackend>::new(0.5), L2::new(0.05))
                .full_batch()
                .max_epochs(100)
                .build()
                .fit(SoftmaxRegression::<CpuBackend>::new(2, 3), &ds)
                .unwrap()
                .extract_params()
        };
        assert_eq!(fit(), fit());
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let ds = InMemoryDataset::new(vec![], vec![], 3).unwrap();
        let result = Trainer::builder(CrossEntropyLoss, SGD::<CpuBackend>::new(0.5), NoRegularizer)
            .build()
            .fit(SoftmaxRegression::<CpuBackend>::new(2, 3), &ds);
        assert!(matches!(result, Err(TrainError::EmptyDataset)));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = Trainer::builder(CrossEntropyLoss, SGD::<CpuBackend>::new(0.5), NoRegularizer)
            .batch_size(0)
            .build()
            .fit(SoftmaxRegression::<CpuBackend>::new(2, 3), &separable());
        assert!(matches!(result, Err(TrainError::ZeroBatchSize)));
    }
}
