//! Dataset abstractions.
//!
//! - [`Dataset`]: anything the [`Trainer`](crate::trainer::Trainer) can iterate
//!   in batches of `(features, one-hot targets)`.
//! - [`InMemoryDataset`]: tensor-ready rows and class indices.
//! - [`LabeledDataset`]: the domain-level sequence of labeled samples, with
//!   CSV import/export in [`csv_io`].

use crate::backend::{Backend, Tensor2D};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Range;
use thiserror::Error;

pub mod csv_io;
pub mod labeled;
pub mod memory;

pub use labeled::{LabeledDataset, LabeledSample};
pub use memory::InMemoryDataset;

/// Errors raised while assembling a dataset.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("all rows must have {expected} features, row {row} has {got}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("label {label} out of range for {n_classes} classes")]
    LabelOutOfRange { label: usize, n_classes: usize },
}

pub trait Dataset {
    type Error: Debug;

    /// Total number of samples, if known.
    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Iterates over consecutive batches of at most `batch_size` samples.
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: PhantomData,
        }
    }

    /// Features and one-hot targets for the samples in `range`.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor2D<B>), Self::Error>;
}

pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend, D: Dataset> Iterator for DatasetBatchIter<'_, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor2D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = self.current.saturating_add(self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch::<B>(range))
    }
}
