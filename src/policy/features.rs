use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Observations describing one subject: `(age, visit_frequency, activity_level)`.
///
/// The type does not constrain sign or range; values are expected to be
/// non-negative in practice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: f64,
    pub visit_frequency: f64,
    pub activity_level: f64,
}

impl FeatureVector {
    /// Number of features.
    pub const LEN: usize = 3;

    /// Field names accepted from external callers, in feature order.
    pub const FIELD_NAMES: [&'static str; Self::LEN] = [
        "age",
        "medical_visits_frequency",
        "physical_activity_level",
    ];

    pub fn new(age: f64, visit_frequency: f64, activity_level: f64) -> Self {
        Self {
            age,
            visit_frequency,
            activity_level,
        }
    }

    pub fn to_array(&self) -> [f64; Self::LEN] {
        [self.age, self.visit_frequency, self.activity_level]
    }

    /// Builds a vector from already-numeric values, rejecting NaN and infinities.
    pub fn checked(
        age: f64,
        visit_frequency: f64,
        activity_level: f64,
    ) -> Result<Self, InvalidInputError> {
        let values = [age, visit_frequency, activity_level];
        for (value, field) in values.iter().zip(Self::FIELD_NAMES) {
            if !value.is_finite() {
                return Err(InvalidInputError::not_finite(field));
            }
        }
        Ok(Self::new(age, visit_frequency, activity_level))
    }

    /// Parses textual form fields; any missing or unparsable field is rejected.
    ///
    /// ```
    /// use health_risk::policy::FeatureVector;
    ///
    /// let fv = FeatureVector::from_fields(Some("40"), Some(" 5 "), Some("5.0")).unwrap();
    /// assert_eq!(fv, FeatureVector::new(40.0, 5.0, 5.0));
    /// assert!(FeatureVector::from_fields(Some("0"), None, Some("1")).is_err());
    /// ```
    pub fn from_fields(
        age: Option<&str>,
        visit_frequency: Option<&str>,
        activity_level: Option<&str>,
    ) -> Result<Self, InvalidInputError> {
        let [f_age, f_visits, f_activity] = Self::FIELD_NAMES;
        Self::checked(
            parse_field(f_age, age)?,
            parse_field(f_visits, visit_frequency)?,
            parse_field(f_activity, activity_level)?,
        )
    }

    /// Reads the three fields from a JSON object.
    ///
    /// Numbers and numeric strings are accepted; anything else (including
    /// booleans and `null`) is rejected.
    pub fn from_json(value: &Value) -> Result<Self, InvalidInputError> {
        let [f_age, f_visits, f_activity] = Self::FIELD_NAMES;
        Self::checked(
            json_field(value, f_age)?,
            json_field(value, f_visits)?,
            json_field(value, f_activity)?,
        )
    }
}

impl From<[f64; FeatureVector::LEN]> for FeatureVector {
    fn from(v: [f64; FeatureVector::LEN]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<f64, InvalidInputError> {
    let raw = raw.ok_or_else(|| InvalidInputError::missing(field))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| InvalidInputError::not_numeric(field, raw))
}

fn json_field(value: &Value, field: &'static str) -> Result<f64, InvalidInputError> {
    match value.get(field) {
        None | Some(Value::Null) => Err(InvalidInputError::missing(field)),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| InvalidInputError::not_numeric(field, n.to_string())),
        Some(Value::String(s)) => parse_field(field, Some(s)),
        Some(other) => Err(InvalidInputError::not_numeric(field, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputProblem;
    use serde_json::json;

    #[test]
    fn test_to_array_order() {
        let fv = FeatureVector::new(75.0, 1.0, 2.5);
        assert_eq!(fv.to_array(), [75.0, 1.0, 2.5]);
        assert_eq!(FeatureVector::from([75.0, 1.0, 2.5]), fv);
    }

    #[test]
    fn test_missing_field_is_reported_by_name() {
        let err = FeatureVector::from_fields(Some("0"), None, Some("3")).unwrap_err();
        assert_eq!(err.field, "medical_visits_frequency");
        assert_eq!(err.problem, InputProblem::Missing);
    }

    #[test]
    fn test_non_numeric_field() {
        let err = FeatureVector::from_fields(Some("abc"), Some("1"), Some("1")).unwrap_err();
        assert_eq!(err.field, "age");
        assert!(matches!(err.problem, InputProblem::NotNumeric(_)));
    }

    #[test]
    fn test_nan_is_rejected() {
        let err = FeatureVector::from_fields(Some("1"), Some("1"), Some("NaN")).unwrap_err();
        assert_eq!(err.field, "physical_activity_level");
        assert_eq!(err.problem, InputProblem::NotFinite);
        assert!(FeatureVector::checked(f64::INFINITY, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_from_json_numbers_and_strings() {
        let body = json!({
            "age": 40,
            "medical_visits_frequency": "5",
            "physical_activity_level": 5.0
        });
        assert_eq!(
            FeatureVector::from_json(&body).unwrap(),
            FeatureVector::new(40.0, 5.0, 5.0)
        );
    }

    #[test]
    fn test_from_json_rejects_missing_and_bool() {
        let missing = json!({ "age": 0 });
        let err = FeatureVector::from_json(&missing).unwrap_err();
        assert_eq!(err.field, "medical_visits_frequency");

        let boolean = json!({
            "age": true,
            "medical_visits_frequency": 1,
            "physical_activity_level": 1
        });
        let err = FeatureVector::from_json(&boolean).unwrap_err();
        assert_eq!(err.field, "age");
        assert!(matches!(err.problem, InputProblem::NotNumeric(_)));

        let null = json!({
            "age": 1,
            "medical_visits_frequency": 1,
            "physical_activity_level": null
        });
        assert_eq!(
            FeatureVector::from_json(&null).unwrap_err().problem,
            InputProblem::Missing
        );
    }

    #[test]
    fn test_from_json_non_object() {
        let err = FeatureVector::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.problem, InputProblem::Missing);
    }
}
