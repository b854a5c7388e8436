use super::scalar::Scalar;
use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Backend-typed, row-major 2D tensor.
///
/// Rows are samples; columns are features, or classes for logits and
/// one-hot targets.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::from_raw(B::from_vec_2d(data, rows, cols))
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_raw(B::zeros_2d(rows, cols))
    }

    /// Stacks equally sized rows into a tensor.
    ///
    /// # Panics
    /// If the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), cols, "All rows must have the same length");
            data.extend_from_slice(row);
        }
        Self::new(data, rows.len(), cols)
    }

    /// One-hot encodes class indices into a `(labels.len(), n_classes)` tensor.
    ///
    /// # Panics
    /// If a label is not below `n_classes`.
    pub fn one_hot(labels: &[usize], n_classes: usize) -> Self {
        let mut data = vec![0.0; labels.len() * n_classes];
        for (i, &label) in labels.iter().enumerate() {
            assert!(label < n_classes, "label {} out of range", label);
            data[i * n_classes + label] = 1.0;
        }
        Self::new(data, labels.len(), n_classes)
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape_2d(&self.data)
    }

    pub fn rows(&self) -> usize {
        self.shape().0
    }

    pub fn cols(&self) -> usize {
        self.shape().1
    }

    /// Row-major flattened copy of the data.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Copies the data out as one `Vec` per row.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let (_, cols) = self.shape();
        if cols == 0 {
            return vec![Vec::new(); self.rows()];
        }
        self.to_vec().chunks(cols).map(|c| c.to_vec()).collect()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_2d(&self.data, &other.data))
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_2d(&self.data, &other.data))
    }

    /// Element-wise (Hadamard) product.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_2d(&self.data, &other.data))
    }

    pub fn scale(&self, s: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_2d(&self.data, &s.data))
    }

    pub fn sum(&self) -> Scalar<B> {
        Scalar::from_raw(B::sum_2d(&self.data))
    }

    /// Squared Frobenius norm.
    pub fn sq_norm(&self) -> Scalar<B> {
        Scalar::from_raw(B::sum_2d(&B::mul_2d(&self.data, &self.data)))
    }

    /// Matrix product `self @ other`.
    pub fn dot(&self, other: &Self) -> Self {
        Self::from_raw(B::matmul(&self.data, &other.data))
    }

    /// Transposed product `self^T @ other`.
    pub fn tdot(&self, other: &Self) -> Self {
        Self::from_raw(B::tmatmul(&self.data, &other.data))
    }

    /// Row-vector product `v @ self`.
    pub fn vecmat(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::vecmat(&v.data, &self.data))
    }

    pub fn col_sum(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_sum_2d(&self.data))
    }

    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_mean_2d(&self.data))
    }

    pub fn col_std(&self, ddof: usize) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_std_2d(&self.data, ddof))
    }

    pub fn add_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_add_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn sub_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_sub_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn mul_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_mul_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn div_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_div_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn log_softmax_rows(&self) -> Self {
        Self::from_raw(B::log_softmax_rows_2d(&self.data))
    }

    pub fn softmax_rows(&self) -> Self {
        Self::from_raw(B::exp_2d(&B::log_softmax_rows_2d(&self.data)))
    }

    /// Column index of the largest entry per row; the first one wins on ties.
    pub fn argmax_rows(&self) -> Vec<usize> {
        B::argmax_rows_2d(&self.data)
    }
}

impl<B: Backend> fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor2D")
            .field("shape", &self.shape())
            .field("data", &self.to_vec())
            .finish()
    }
}
