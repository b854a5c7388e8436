//! Data splitting and hyperparameter search.
//!
//! Everything here works on sample indices and is independent of the model:
//! [`train_test_split`] partitions once, [`CvStrategy`] produces
//! cross-validation folds, and [`grid_search`] scores every point of a
//! [`ParamGrid`] with a caller-supplied fit-and-score function.

pub mod grid;
pub mod kfold;
pub mod search;
pub mod split;

pub use grid::{Hyperparams, ParamGrid};
pub use kfold::{k_fold, stratified_k_fold, CvStrategy, Fold};
pub use search::{grid_search, CandidateScore, SearchOutcome};
pub use split::{train_test_split, TrainTestSplit};
