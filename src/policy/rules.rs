//! Ordered rule table mapping a feature vector to a category.
//!
//! Age bands are checked top-down with strict `age > threshold`, so a value
//! exactly at a breakpoint falls into the lower band. Inside a band, rules
//! are checked in order and the first match wins; each rule fires when
//! `visits < visits_below` **or** `activity < activity_below`.

use crate::error::{Result, RiskError};
use crate::policy::{Category, FeatureVector};

/// Disjunction of "below threshold" tests. `None` disables a test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Condition {
    pub visits_below: Option<f64>,
    pub activity_below: Option<f64>,
}

impl Condition {
    pub fn either(visits_below: f64, activity_below: f64) -> Self {
        Self {
            visits_below: Some(visits_below),
            activity_below: Some(activity_below),
        }
    }

    pub fn activity_below(threshold: f64) -> Self {
        Self {
            visits_below: None,
            activity_below: Some(threshold),
        }
    }

    pub fn matches(&self, visits: f64, activity: f64) -> bool {
        self.visits_below.is_some_and(|t| visits < t)
            || self.activity_below.is_some_and(|t| activity < t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rule {
    pub when: Condition,
    pub category: Category,
}

/// Rules of one age band plus the category used when none fires.
#[derive(Clone, Debug, PartialEq)]
pub struct BandPolicy {
    pub rules: Vec<Rule>,
    pub otherwise: Category,
}

impl BandPolicy {
    pub fn new(rules: Vec<Rule>, otherwise: Category) -> Self {
        Self { rules, otherwise }
    }

    fn classify(&self, visits: f64, activity: f64) -> Category {
        self.rules
            .iter()
            .find(|r| r.when.matches(visits, activity))
            .map_or(self.otherwise, |r| r.category)
    }
}

/// Band selected when `age > above_age`.
#[derive(Clone, Debug, PartialEq)]
pub struct AgeBand {
    pub above_age: f64,
    pub policy: BandPolicy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleTable {
    bands: Vec<AgeBand>,
    base: BandPolicy,
}

fn rule(when: Condition, category: Category) -> Rule {
    Rule { when, category }
}

impl RuleTable {
    /// Builds a table from bands ordered by strictly descending `above_age`
    /// and a `base` policy covering every age not above the last breakpoint.
    pub fn new(bands: Vec<AgeBand>, base: BandPolicy) -> Result<Self> {
        for pair in bands.windows(2) {
            if pair[0].above_age <= pair[1].above_age {
                return Err(RiskError::InvalidParameter(format!(
                    "age breakpoints must be strictly descending, got {} then {}",
                    pair[0].above_age, pair[1].above_age
                )));
            }
        }
        let policies = bands.iter().map(|b| &b.policy).chain(std::iter::once(&base));
        for (band, policy) in policies.enumerate() {
            for r in &policy.rules {
                let thresholds = [r.when.visits_below, r.when.activity_below];
                if thresholds.iter().all(Option::is_none) {
                    return Err(RiskError::InvalidParameter(format!(
                        "rule in band {} has no threshold",
                        band
                    )));
                }
                if thresholds.iter().flatten().any(|t| !t.is_finite()) {
                    return Err(RiskError::InvalidParameter(format!(
                        "rule in band {} has a non-finite threshold",
                        band
                    )));
                }
            }
        }
        if bands.iter().any(|b| !b.above_age.is_finite()) {
            return Err(RiskError::InvalidParameter(
                "age breakpoints must be finite".to_string(),
            ));
        }
        Ok(Self { bands, base })
    }

    /// The labeling policy used for synthetic training data.
    ///
    /// | age band      | rule (visits `v`, activity `a`) | category  |
    /// |---------------|---------------------------------|-----------|
    /// | age > 70      | v < 2 or a < 1.5                | CHRONIC   |
    /// |               | v < 4 or a < 3                  | ACUTE     |
    /// |               | else                            | MILD      |
    /// | 50 < age ≤ 70 | v < 3 or a < 2                  | ACUTE     |
    /// |               | v < 5 or a < 4                  | MILD      |
    /// |               | else                            | NOT_SICK  |
    /// | 30 < age ≤ 50 | a < 3                           | MILD      |
    /// |               | v < 4 or a < 5                  | ACUTE     |
    /// |               | else                            | NOT_SICK  |
    /// | age ≤ 30      | a < 3                           | MILD      |
    /// |               | v < 2 or a < 4                  | ACUTE     |
    /// |               | else                            | NOT_SICK  |
    pub fn standard() -> Self {
        use Category::*;
        Self {
            bands: vec![
                AgeBand {
                    above_age: 70.0,
                    policy: BandPolicy::new(
                        vec![
                            rule(Condition::either(2.0, 1.5), Chronic),
                            rule(Condition::either(4.0, 3.0), Acute),
                        ],
                        Mild,
                    ),
                },
                AgeBand {
                    above_age: 50.0,
                    policy: BandPolicy::new(
                        vec![
                            rule(Condition::either(3.0, 2.0), Acute),
                            rule(Condition::either(5.0, 4.0), Mild),
                        ],
                        NotSick,
                    ),
                },
                AgeBand {
                    above_age: 30.0,
                    policy: BandPolicy::new(
                        vec![
                            rule(Condition::activity_below(3.0), Mild),
                            rule(Condition::either(4.0, 5.0), Acute),
                        ],
                        NotSick,
                    ),
                },
            ],
            base: BandPolicy::new(
                vec![
                    rule(Condition::activity_below(3.0), Mild),
                    rule(Condition::either(2.0, 4.0), Acute),
                ],
                NotSick,
            ),
        }
    }

    pub fn bands(&self) -> &[AgeBand] {
        &self.bands
    }

    pub fn base(&self) -> &BandPolicy {
        &self.base
    }

    /// Assigns exactly one category; total over all inputs.
    pub fn classify(&self, features: &FeatureVector) -> Category {
        self.bands
            .iter()
            .find(|band| features.age > band.above_age)
            .map_or(&self.base, |band| &band.policy)
            .classify(features.visit_frequency, features.activity_level)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}
