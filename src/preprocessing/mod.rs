//! Feature preprocessing.
//!
//! Transformers follow the same type-state split as models: an unfitted
//! [`Transformer`] carries configuration, and [`Transformer::fit`] produces a
//! [`FittedTransformer`] holding learned statistics that can be applied to new
//! data, inverted, and serialized.
//!
//! The only transformer the risk pipeline needs is [`StandardScaler`].
//!
//! ```
//! use health_risk::backend::{CpuBackend, Tensor2D};
//! use health_risk::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//!
//! let x = Tensor2D::<CpuBackend>::new(vec![1.0, 10.0, 3.0, 30.0], 2, 2);
//! let fitted = StandardScaler::<CpuBackend>::new().fit(&x).unwrap();
//! let z = fitted.transform(&x).unwrap();
//! assert_eq!(z.to_vec(), vec![-1.0, -1.0, 1.0, 1.0]);
//! ```

pub mod error;
pub mod standard;
pub mod traits;

pub use error::PreprocessingError;
pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
