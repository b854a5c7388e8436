use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Trait for scalar operations required by numerical backends.
///
/// Implemented for the primitive floating-point type used by the backends
/// (`f64`).
///
/// # Example
/// ```
/// use health_risk::backend::ScalarOps;
///
/// let x = 4.0f64;
/// assert_eq!(ScalarOps::sqrt(x), 2.0);
/// assert_eq!(f64::zero(), 0.0);
/// assert_eq!(f64::one(), 1.0);
/// ```
pub trait ScalarOps:
    Clone
    + Copy
    + Send
    + Sync
    + PartialOrd
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Div<Output = Self>
{
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl ScalarOps for f64 {
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    fn abs(self) -> Self {
        f64::abs(self)
    }

    fn exp(self) -> Self {
        f64::exp(self)
    }

    fn ln(self) -> Self {
        f64::ln(self)
    }

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Backend-typed scalar wrapper.
///
/// Carries phantom type information about its originating backend so that
/// scalars from different backends cannot be mixed.
#[derive(Clone, Copy)]
pub struct Scalar<B: Backend> {
    pub(crate) data: B::Scalar,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Scalar<B> {
    /// Creates a new scalar from an `f64` host value.
    pub fn new(value: f64) -> Self {
        Self {
            data: B::Scalar::from_f64(value),
            backend: PhantomData,
        }
    }

    pub(crate) fn from_raw(data: B::Scalar) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.data.to_f64()
    }

    pub fn sqrt(self) -> Self {
        Self::from_raw(self.data.sqrt())
    }

    pub fn abs(self) -> Self {
        Self::from_raw(self.data.abs())
    }

    pub fn exp(self) -> Self {
        Self::from_raw(self.data.exp())
    }

    pub fn ln(self) -> Self {
        Self::from_raw(self.data.ln())
    }
}

impl<B: Backend> fmt::Debug for Scalar<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({})", self.data.to_f64())
    }
}

impl<B: Backend> std::ops::Add for Scalar<B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.data + rhs.data)
    }
}

impl<B: Backend> std::ops::Sub for Scalar<B> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.data - rhs.data)
    }
}

impl<B: Backend> std::ops::Mul for Scalar<B> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_raw(self.data * rhs.data)
    }
}

impl<B: Backend> std::ops::Div for Scalar<B> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::from_raw(self.data / rhs.data)
    }
}

impl<B: Backend> std::ops::Neg for Scalar<B> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_raw(B::Scalar::zero() - self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_scalar_arithmetic() {
        let a = Scalar::<CpuBackend>::new(6.0);
        let b = Scalar::<CpuBackend>::new(3.0);

        assert_eq!((a + b).to_f64(), 9.0);
        assert_eq!((a - b).to_f64(), 3.0);
        assert_eq!((a * b).to_f64(), 18.0);
        assert_eq!((a / b).to_f64(), 2.0);
        assert_eq!((-a).to_f64(), -6.0);
    }

    #[test]
    fn test_scalar_math() {
        let x = Scalar::<CpuBackend>::new(4.0);
        assert_eq!(x.sqrt().to_f64(), 2.0);
        assert!((Scalar::<CpuBackend>::new(1.0).exp().ln().to_f64() - 1.0).abs() < 1e-12);
        assert_eq!(Scalar::<CpuBackend>::new(-2.5).abs().to_f64(), 2.5);
    }

    #[test]
    fn test_scalar_debug_shows_value() {
        let x = Scalar::<CpuBackend>::new(1.5);
        assert_eq!(format!("{:?}", x), "Scalar(1.5)");
    }
}
