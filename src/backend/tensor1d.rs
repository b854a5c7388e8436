use super::scalar::Scalar;
use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D representation (`B::Tensor1D`) while carrying
/// phantom type information about its originating backend.
///
/// # Example
/// ```
/// use health_risk::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
///
/// let y = x.scale(&Scalar::<CpuBackend>::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    pub fn new(data: Vec<f64>) -> Self {
        Self::from_raw(B::from_vec_1d(data))
    }

    pub fn zeros(len: usize) -> Self {
        Self::from_raw(B::zeros_1d(len))
    }

    pub(crate) fn from_raw(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Element-wise `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_1d(&self.data, &other.data))
    }

    /// Element-wise `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_1d(&self.data, &other.data))
    }

    /// Element-wise `self * other`.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_1d(&self.data, &other.data))
    }

    /// Element-wise `self / other`.
    pub fn div(&self, other: &Self) -> Self {
        Self::from_raw(B::div_1d(&self.data, &other.data))
    }

    pub fn scale(&self, s: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_1d(&self.data, &s.data))
    }

    pub fn dot(&self, other: &Self) -> Scalar<B> {
        Scalar::from_raw(B::dot_1d(&self.data, &other.data))
    }

    pub fn sum(&self) -> Scalar<B> {
        Scalar::from_raw(B::sum_1d(&self.data))
    }

    /// Index of the largest element; the first one wins on ties.
    pub fn argmax(&self) -> usize {
        B::argmax_1d(&self.data)
    }
}

impl<B: Backend> fmt::Debug for Tensor1D<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tensor1D").field(&self.to_vec()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_elementwise_ops() {
        let a = Tensor1D::<CpuBackend>::new(vec![6.0, 8.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 4.0]);

        assert_eq!(a.add(&b).to_vec(), vec![8.0, 12.0]);
        assert_eq!(a.sub(&b).to_vec(), vec![4.0, 4.0]);
        assert_eq!(a.mul(&b).to_vec(), vec![12.0, 32.0]);
        assert_eq!(a.div(&b).to_vec(), vec![3.0, 2.0]);
    }

    #[test]
    fn test_reductions() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(a.sum().to_f64(), 6.0);
        assert_eq!(a.dot(&a).to_f64(), 14.0);
    }

    #[test]
    fn test_argmax_prefers_first_on_tie() {
        let a = Tensor1D::<CpuBackend>::new(vec![0.5, 2.0, 2.0, -1.0]);
        assert_eq!(a.argmax(), 1);
    }

    #[test]
    fn test_zeros_and_len() {
        let z = Tensor1D::<CpuBackend>::zeros(4);
        assert_eq!(z.len(), 4);
        assert!(!z.is_empty());
        assert!(z.to_vec().iter().all(|&x| x == 0.0));
    }
}
