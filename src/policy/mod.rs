//! Labeling policy: categories, feature vectors, the ordered rule table and
//! the synthetic data generator built on it.
//!
//! ```
//! use health_risk::policy::{Category, FeatureVector, RuleTable};
//!
//! let rules = RuleTable::standard();
//! assert_eq!(rules.classify(&FeatureVector::new(75.0, 1.0, 1.0)), Category::Chronic);
//! assert_eq!(rules.classify(&FeatureVector::new(40.0, 5.0, 5.0)), Category::NotSick);
//! ```

pub mod category;
pub mod features;
pub mod generator;
pub mod rules;

pub use category::Category;
pub use features::FeatureVector;
pub use generator::{FeatureRanges, SyntheticGenerator};
pub use rules::{AgeBand, BandPolicy, Condition, Rule, RuleTable};
