use crate::backend::{Backend, Tensor2D};
use crate::dataset::{Dataset, DatasetError};
use std::convert::Infallible;
use std::ops::Range;

/// Feature rows with class-index targets, kept in host memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Vec<Vec<f64>>,
    y: Vec<usize>,
    n_classes: usize,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f64>>, y: Vec<usize>, n_classes: usize) -> Result<Self, DatasetError> {
        if x.len() != y.len() {
            return Err(DatasetError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        let n_features = x.first().map_or(0, Vec::len);
        if let Some((row, r)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(DatasetError::RaggedRows {
                row,
                expected: n_features,
                got: r.len(),
            });
        }
        if let Some(&label) = y.iter().find(|&&l| l >= n_classes) {
            return Err(DatasetError::LabelOutOfRange { label, n_classes });
        }
        Ok(Self { x, y, n_classes })
    }

    /// Builds a dataset from the rows of a feature tensor.
    pub fn from_tensor<B: Backend>(
        x: &Tensor2D<B>,
        y: Vec<usize>,
        n_classes: usize,
    ) -> Result<Self, DatasetError> {
        Self::new(x.to_rows(), y, n_classes)
    }

    pub fn n_features(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn labels(&self) -> &[usize] {
        &self.y
    }
}

impl Dataset for InMemoryDataset {
    type Error = Infallible;

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor2D<B>), Self::Error> {
        let batch_x = &self.x[range.clone()];
        let batch_y = &self.y[range];

        let data = batch_x.iter().flat_map(|row| row.iter()).copied().collect();
        let x_tensor = Tensor2D::<B>::new(data, batch_x.len(), self.n_features());
        let y_tensor = Tensor2D::<B>::one_hot(batch_y, self.n_classes);

        Ok((x_tensor, y_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn dataset() -> InMemoryDataset {
        InMemoryDataset::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            vec![0, 2, 1],
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_batches_cover_all_samples() {
        let ds = dataset();
        let batches: Vec<_> = ds
            .batches::<CpuBackend>(2)
            .map(|b| b.unwrap())
            .collect();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].0.shape(), (2, 2));
        assert_eq!(batches[1].0.to_vec(), vec![5.0, 6.0]);
        assert_eq!(batches[1].1.to_vec(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_full_batch() {
        let ds = dataset();
        let (x, y) = ds.get_batch::<CpuBackend>(0..3).unwrap();
        assert_eq!(x.shape(), (3, 2));
        assert_eq!(y.argmax_rows(), vec![0, 2, 1]);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            InMemoryDataset::new(vec![vec![1.0]], vec![], 2).unwrap_err(),
            DatasetError::LengthMismatch {
                features: 1,
                labels: 0
            }
        );
        assert!(matches!(
            InMemoryDataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![0, 0], 2),
            Err(DatasetError::RaggedRows { row: 1, .. })
        ));
        assert_eq!(
            InMemoryDataset::new(vec![vec![1.0]], vec![4], 4).unwrap_err(),
            DatasetError::LabelOutOfRange {
                label: 4,
                n_classes: 4
            }
        );
    }

    #[test]
    fn test_empty_dataset_yields_no_batches() {
        let ds = InMemoryDataset::new(vec![], vec![], 4).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.batches::<CpuBackend>(8).count(), 0);
    }
}
