//! Request validation
//!
//! Raw parameters arrive either as query-string pairs or as a JSON body.
//! [`FieldValidator`] coerces them into typed values, checks declared ranges
//! and collects every failure, so a rejected request lists all of its bad
//! fields at once.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::SentinelError;
use crate::models::location::{DEFAULT_NEWS_LIMIT, DEFAULT_RADIUS_KM, LocationQuery};

/// Where the raw values came from; booleans are read differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Query,
    Body,
}

/// Unvalidated request parameters
#[derive(Debug, Clone)]
pub struct RawInput {
    fields: Map<String, Value>,
    source: InputSource,
}

impl RawInput {
    #[must_use]
    pub fn from_query(params: HashMap<String, String>) -> Self {
        let fields = params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        Self {
            fields,
            source: InputSource::Query,
        }
    }

    pub fn from_json(body: Value) -> Result<Self, SentinelError> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                source: InputSource::Body,
            }),
            _ => Err(SentinelError::validation(
                "request body must be a JSON object",
            )),
        }
    }

    /// Parse a raw request body; malformed JSON is a validation failure
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, SentinelError> {
        let value = serde_json::from_slice(body)
            .map_err(|_| SentinelError::validation("request body must be valid JSON"))?;
        Self::from_json(value)
    }

    /// Whether `name` carries a value
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Missing, null, and (for query strings) empty values all read as absent
    fn get(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() && self.source == InputSource::Query => None,
            Some(value) => Some(value),
        }
    }
}

pub struct FieldValidator<'a> {
    input: &'a RawInput,
    errors: Vec<String>,
}

impl<'a> FieldValidator<'a> {
    #[must_use]
    pub fn new(input: &'a RawInput) -> Self {
        Self {
            input,
            errors: Vec::new(),
        }
    }

    fn number(&mut self, name: &str) -> Option<f64> {
        let value = self.input.get(name)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Some(n),
            _ => {
                self.errors.push(format!("{name} must be a number"));
                None
            }
        }
    }

    fn check_range(&mut self, name: &str, value: f64, range: &RangeInclusive<f64>) -> bool {
        if range.contains(&value) {
            true
        } else {
            self.errors.push(format!(
                "{name} must be between {} and {}",
                range.start(),
                range.end()
            ));
            false
        }
    }

    /// A required float within `range`
    pub fn required_f64(&mut self, name: &str, range: RangeInclusive<f64>) -> f64 {
        if self.input.get(name).is_none() {
            self.errors.push(format!("{name} is required"));
            return 0.0;
        }
        match self.number(name) {
            Some(n) if self.check_range(name, n, &range) => n,
            _ => 0.0,
        }
    }

    /// An optional float within `range`
    pub fn optional_f64(&mut self, name: &str, default: f64, range: RangeInclusive<f64>) -> f64 {
        match self.number(name) {
            Some(n) if self.check_range(name, n, &range) => n,
            _ => default,
        }
    }

    /// An optional whole number within `range`
    pub fn optional_u32(&mut self, name: &str, default: u32, range: RangeInclusive<u32>) -> u32 {
        let Some(n) = self.number(name) else {
            return default;
        };
        if n.fract() != 0.0 {
            self.errors.push(format!("{name} must be an integer"));
            return default;
        }
        let bounds = f64::from(*range.start())..=f64::from(*range.end());
        if self.check_range(name, n, &bounds) {
            // in range, so the cast is exact
            n as u32
        } else {
            default
        }
    }

    /// An optional flag. In a query string every value except `false` is true.
    pub fn optional_bool(&mut self, name: &str, default: bool) -> bool {
        let Some(value) = self.input.get(name) else {
            return default;
        };
        match (self.input.source, value) {
            (InputSource::Query, Value::String(s)) => s != "false",
            (_, Value::Bool(b)) => *b,
            (InputSource::Body, Value::String(s)) if s == "true" => true,
            (InputSource::Body, Value::String(s)) if s == "false" => false,
            _ => {
                self.errors.push(format!("{name} must be a boolean"));
                default
            }
        }
    }

    /// An optional non-empty string
    pub fn optional_string(&mut self, name: &str) -> Option<String> {
        match self.input.get(name)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors.push(format!("{name} must be a string"));
                None
            }
        }
    }

    /// An optional list of strings, comma separated in a query string
    pub fn optional_list(&mut self, name: &str) -> Option<Vec<String>> {
        match self.input.get(name)? {
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Value::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                if strings.is_none() {
                    self.errors.push(format!("{name} must be a list of strings"));
                }
                strings
            }
            _ => {
                self.errors.push(format!("{name} must be a list of strings"));
                None
            }
        }
    }

    /// An optional value from a fixed set of names
    pub fn optional_choice<T: FromStr>(&mut self, name: &str, choices: &[&str]) -> Option<T> {
        let raw = self.optional_string(name)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors
                    .push(format!("{name} must be one of {}", choices.join(", ")));
                None
            }
        }
    }

    /// A required value from a fixed set of names
    pub fn required_choice<T: FromStr>(&mut self, name: &str, choices: &[&str]) -> Option<T> {
        let missing = match self.input.get(name) {
            None => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            self.errors.push(format!("{name} is required"));
            return None;
        }
        self.optional_choice(name, choices)
    }

    /// Return `value` if no field failed, otherwise every collected error
    pub fn finish<T>(self, value: T) -> Result<T, SentinelError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(SentinelError::validation_errors(self.errors))
        }
    }
}

/// Validate the disaster-intelligence parameters, applying defaults
pub fn location_query(input: &RawInput) -> Result<LocationQuery, SentinelError> {
    let mut fields = FieldValidator::new(input);

    let latitude = fields.required_f64("lat", -90.0..=90.0);
    let longitude = fields.required_f64("lng", -180.0..=180.0);
    let location_name = fields.optional_string("location_name");
    let radius_km = fields.optional_u32("radius_km", DEFAULT_RADIUS_KM, 1..=100);
    let include_forecast = fields.optional_bool("include_forecast", true);
    let include_satellite = fields.optional_bool("include_satellite", true);
    let news_limit = fields.optional_u32("news_limit", DEFAULT_NEWS_LIMIT, 1..=50);

    fields.finish(LocationQuery {
        latitude,
        longitude,
        location_name,
        radius_km,
        include_forecast,
        include_satellite,
        news_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> RawInput {
        RawInput::from_query(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn messages(err: SentinelError) -> Vec<String> {
        match err {
            SentinelError::Validation { errors } => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_query_defaults_applied() {
        let parsed = location_query(&query(&[("lat", "28.6139"), ("lng", "77.2090")])).unwrap();
        assert_eq!(parsed, LocationQuery::new(28.6139, 77.2090));
    }

    #[test]
    fn test_query_flags_only_false_disables() {
        let parsed = location_query(&query(&[
            ("lat", "0"),
            ("lng", "0"),
            ("include_forecast", "false"),
            ("include_satellite", "no"),
        ]))
        .unwrap();
        assert!(!parsed.include_forecast);
        assert!(parsed.include_satellite);
    }

    #[test]
    fn test_empty_location_name_is_absent() {
        let parsed = location_query(&query(&[
            ("lat", "10"),
            ("lng", "10"),
            ("location_name", ""),
        ]))
        .unwrap();
        assert!(parsed.location_name.is_none());
    }

    #[test]
    fn test_body_accepts_numbers_and_numeric_strings() {
        let input = RawInput::from_json(json!({
            "lat": 28.6139,
            "lng": "77.2090",
            "location_name": "Delhi",
            "radius_km": 25,
            "include_forecast": false,
            "include_satellite": "false",
            "news_limit": 5
        }))
        .unwrap();
        let parsed = location_query(&input).unwrap();
        assert_eq!(parsed.longitude, 77.2090);
        assert_eq!(parsed.location_name.as_deref(), Some("Delhi"));
        assert_eq!(parsed.radius_km, 25);
        assert!(!parsed.include_forecast);
        assert!(!parsed.include_satellite);
        assert_eq!(parsed.news_limit, 5);
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let err = location_query(&query(&[
            ("lat", "200"),
            ("lng", "77"),
            ("radius_km", "0"),
            ("news_limit", "51"),
        ]))
        .unwrap_err();
        let errors = messages(err);
        assert_eq!(
            errors,
            vec![
                "lat must be between -90 and 90",
                "radius_km must be between 1 and 100",
                "news_limit must be between 1 and 50",
            ]
        );
    }

    #[rstest]
    #[case(json!({"lng": 1.0}), "lat is required")]
    #[case(json!({"lat": "north", "lng": 1.0}), "lat must be a number")]
    #[case(json!({"lat": 1.0, "lng": 181.0}), "lng must be between -180 and 180")]
    #[case(json!({"lat": 1.0, "lng": 1.0, "radius_km": 12.5}), "radius_km must be an integer")]
    #[case(json!({"lat": 1.0, "lng": 1.0, "include_forecast": "yes"}), "include_forecast must be a boolean")]
    #[case(json!({"lat": 1.0, "lng": 1.0, "location_name": 42}), "location_name must be a string")]
    fn test_body_field_errors(#[case] body: Value, #[case] expected: &str) {
        let input = RawInput::from_json(body).unwrap();
        let errors = messages(location_query(&input).unwrap_err());
        assert_eq!(errors, vec![expected.to_string()]);
    }

    #[test]
    fn test_non_object_body_rejected() {
        let err = RawInput::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().starts_with("Validation error: "));
    }

    #[test]
    fn test_optional_list_from_query_and_body() {
        let input = query(&[("keywords", "flood, storm,,")]);
        let mut fields = FieldValidator::new(&input);
        assert_eq!(
            fields.optional_list("keywords"),
            Some(vec!["flood".to_string(), "storm".to_string()])
        );
        assert!(fields.finish(()).is_ok());

        let input = RawInput::from_json(json!({"keywords": ["a", 1]})).unwrap();
        let mut fields = FieldValidator::new(&input);
        assert!(fields.optional_list("keywords").is_none());
        assert!(fields.finish(()).is_err());
    }

    #[test]
    fn test_choices() {
        use crate::satellite::DisasterType;

        let input = RawInput::from_json(json!({"disaster_type": "fire", "other": "tornado"})).unwrap();
        let mut fields = FieldValidator::new(&input);
        assert_eq!(
            fields.required_choice::<DisasterType>("disaster_type", DisasterType::NAMES),
            Some(DisasterType::Fire)
        );
        assert!(fields.optional_choice::<DisasterType>("absent", DisasterType::NAMES).is_none());
        assert!(fields.optional_choice::<DisasterType>("other", DisasterType::NAMES).is_none());
        assert_eq!(
            messages(fields.finish(()).unwrap_err()),
            vec!["other must be one of flood, fire, landslide, earthquake, storm"]
        );

        let input = RawInput::from_json(json!({"disaster_type": ""})).unwrap();
        let mut fields = FieldValidator::new(&input);
        assert!(fields.required_choice::<DisasterType>("disaster_type", DisasterType::NAMES).is_none());
        assert_eq!(messages(fields.finish(()).unwrap_err()), vec!["disaster_type is required"]);
    }
}
