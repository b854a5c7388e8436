//! # Backend Abstraction
//!
//! Trait-based abstraction over the numeric kernels used by the scaler and the
//! classifier. Models and transformers are generic over [`Backend`] and only
//! ever touch data through the typed wrappers [`Tensor1D`], [`Tensor2D`] and
//! [`Scalar`].
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                              |
//! |------------------|-----------|---------------------------------------|
//! | `CpuBackend`     | always on | Default, pure-Rust `Vec<f64>` storage |
//! | `NdarrayBackend` | `ndarray` | Interop with the `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use health_risk::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! let w = Tensor2D::<CpuBackend>::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
//! let b = Tensor1D::<CpuBackend>::new(vec![0.5, -0.5]);
//!
//! let logits = x.dot(&w).add_row_vector(&b);
//! assert_eq!(logits.to_vec(), vec![1.5, 1.5, 3.5, 3.5]);
//! ```

pub mod cpu;
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::NdarrayBackend;

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional (row-major) tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the operations the training loop needs.
///
/// 2D tensors are row-major: rows are samples, columns are features (or
/// classes, for logits and one-hot targets).
///
/// # Panics
///
/// Operations on mismatched shapes panic; shape validation is the job of the
/// typed layers above (transformers, models, pipeline).
pub trait Backend: Clone + Copy + Send + Sync + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Host conversion and shape ---

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Flattens a 2D tensor in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns `(rows, cols)`.
    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize);

    // --- 1D operations ---

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn div_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;
    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar;
    fn sum_1d(t: &Self::Tensor1D) -> Self::Scalar;

    // --- 2D element-wise operations ---

    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;
    fn sub_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;
    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;
    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;
    fn sum_2d(t: &Self::Tensor2D) -> Self::Scalar;

    // --- Linear algebra ---

    /// Matrix product `a @ b`.
    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Transposed product `a^T @ b` without materialising the transpose.
    fn tmatmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Vector-matrix product `v @ m` (a single row times a matrix).
    fn vecmat(v: &Self::Tensor1D, m: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Column statistics ---

    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D;
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Column standard deviation with `ddof` delta degrees of freedom.
    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D;

    // --- Row broadcasting ---

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Row-wise reductions ---

    /// Numerically stable row-wise `log(softmax(t))`.
    fn log_softmax_rows_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Index of the largest entry in each row; ties resolve to the lowest index.
    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<usize>;

    /// Index of the largest entry; ties resolve to the lowest index.
    fn argmax_1d(t: &Self::Tensor1D) -> usize;

    // --- Element-wise math ---

    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D;
}
