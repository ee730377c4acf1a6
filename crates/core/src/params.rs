//! Named numeric engine parameters and the pick-with-default convention.
//!
//! Every engine reads its parameters through [`pick`]: a missing key falls
//! back to the engine's documented default and is never an error. Only
//! values that are present but unusable (a non-positive count, a negative
//! width) fail, and they fail through the `require_*` helpers so that every
//! engine reports them the same way.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::EngineError;

/// Engine parameters keyed by name. Ordered so that logs and dumps are stable.
pub type Params = BTreeMap<String, f64>;

/// Returns `params[key]`, or `default` if the key is missing.
pub fn pick(params: &Params, key: &str, default: f64) -> f64 {
    params.get(key).copied().unwrap_or(default)
}

/// Returns `params[key]` truncated toward zero, or `default` if missing.
///
/// Non-finite values saturate (`NaN` becomes 0).
pub fn pick_int(params: &Params, key: &str, default: i64) -> i64 {
    params.get(key).map(|&v| v as i64).unwrap_or(default)
}

/// Fails with `InvalidParameter` unless `value > 0`.
pub fn require_positive(engine: &str, name: &str, value: f64) -> Result<(), EngineError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(engine, name, value, "must be > 0"))
    }
}

/// Fails with `InvalidParameter` unless `value >= 0`.
pub fn require_non_negative(engine: &str, name: &str, value: f64) -> Result<(), EngineError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(engine, name, value, "must be >= 0"))
    }
}

/// Fails with `InvalidParameter` unless `value > 0`, then converts to `usize`.
pub fn require_count(engine: &str, name: &str, value: i64) -> Result<usize, EngineError> {
    usize::try_from(value)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| invalid(engine, name, value as f64, "must be > 0"))
}

/// Fails with `InvalidParameter` if `value > max`.
pub fn require_at_most(engine: &str, name: &str, value: i64, max: i64) -> Result<(), EngineError> {
    if value <= max {
        Ok(())
    } else {
        Err(invalid(engine, name, value as f64, &format!("must be <= {max}")))
    }
}

fn invalid(engine: &str, name: &str, value: f64, reason: &str) -> EngineError {
    EngineError::InvalidParameter {
        engine: engine.to_string(),
        name: name.to_string(),
        value,
        reason: reason.to_string(),
    }
}

/// Parses `k=v,k=v` pairs with numeric values (the CLI `--params` format).
///
/// An empty string yields empty params. Whitespace around keys and values
/// is ignored.
pub fn parse_params(csv: &str) -> Result<Params, EngineError> {
    let mut params = Params::new();
    if csv.trim().is_empty() {
        return Ok(params);
    }
    for part in csv.split(',') {
        let (key, value) = part.trim().split_once('=').ok_or_else(|| {
            EngineError::InvalidConfig(format!("invalid param {part:?} (expected k=v)"))
        })?;
        let key = key.trim();
        let value = value.trim();
        let parsed: f64 = value.parse().map_err(|_| {
            EngineError::InvalidConfig(format!(
                "invalid value for param {key:?}: {value:?} (want number)"
            ))
        })?;
        params.insert(key.to_string(), parsed);
    }
    Ok(params)
}

/// Collects the numeric entries of a JSON object into [`Params`].
///
/// Non-numeric entries are skipped, matching the pick-with-default
/// convention: an unusable value behaves like a missing one.
pub fn params_from_json(value: &Value) -> Params {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, f64)]) -> Params {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    // -- pick --

    #[test]
    fn pick_returns_present_value() {
        let p = params(&[("step", 0.01)]);
        assert_eq!(pick(&p, "step", 0.5), 0.01);
    }

    #[test]
    fn pick_returns_default_when_missing() {
        let p = params(&[("other", 1.0)]);
        assert_eq!(pick(&p, "step", 0.5), 0.5);
    }

    #[test]
    fn pick_on_empty_params_returns_default() {
        assert_eq!(pick(&Params::new(), "anything", -2.0), -2.0);
    }

    // -- pick_int --

    #[test]
    fn pick_int_truncates_toward_zero() {
        let p = params(&[("a", 2.9), ("b", -2.9)]);
        assert_eq!(pick_int(&p, "a", 0), 2);
        assert_eq!(pick_int(&p, "b", 0), -2);
    }

    #[test]
    fn pick_int_returns_default_when_missing() {
        assert_eq!(pick_int(&Params::new(), "count", 300), 300);
    }

    // -- validation --

    #[test]
    fn require_positive_rejects_zero_and_negative() {
        assert!(require_positive("e", "scale", 0.001).is_ok());
        assert!(require_positive("e", "scale", 0.0).is_err());
        assert!(require_positive("e", "scale", -1.0).is_err());
        assert!(require_positive("e", "scale", f64::NAN).is_err());
    }

    #[test]
    fn require_non_negative_accepts_zero() {
        assert!(require_non_negative("e", "lw", 0.0).is_ok());
        assert!(require_non_negative("e", "lw", -0.001).is_err());
    }

    #[test]
    fn require_count_converts_positive_values() {
        assert_eq!(require_count("e", "dots", 12).unwrap(), 12);
    }

    #[test]
    fn require_count_reports_name_and_value() {
        let err = require_count("flowfield", "particles", 0).unwrap_err();
        match err {
            EngineError::InvalidParameter { engine, name, value, .. } => {
                assert_eq!(engine, "flowfield");
                assert_eq!(name, "particles");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(require_count("e", "dots", -5).is_err());
    }

    #[test]
    fn require_at_most_is_inclusive() {
        assert!(require_at_most("strata", "depth", 16, 16).is_ok());
        let err = require_at_most("strata", "depth", i64::MAX, 16).unwrap_err();
        assert!(err.to_string().contains("depth"));
    }

    // -- parse_params --

    #[test]
    fn parse_params_reads_pairs() {
        let p = parse_params("dots=100, step = 0.01").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p["dots"], 100.0);
        assert_eq!(p["step"], 0.01);
    }

    #[test]
    fn parse_params_empty_is_ok() {
        assert!(parse_params("").unwrap().is_empty());
        assert!(parse_params("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_params_rejects_missing_equals() {
        assert!(parse_params("dots").is_err());
    }

    #[test]
    fn parse_params_rejects_non_numeric_value() {
        let err = parse_params("dots=many").unwrap_err();
        assert!(err.to_string().contains("dots"));
    }

    // -- params_from_json --

    #[test]
    fn params_from_json_keeps_numbers_only() {
        let p = params_from_json(&json!({"dots": 10, "step": 0.5, "name": "x", "on": true}));
        assert_eq!(p, params(&[("dots", 10.0), ("step", 0.5)]));
    }

    #[test]
    fn params_from_json_non_object_is_empty() {
        assert!(params_from_json(&json!([1, 2, 3])).is_empty());
    }
}
