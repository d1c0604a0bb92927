//! Optional-field access over loosely structured JSON.
//!
//! Forecast payloads are read through these helpers so the policy for absent
//! or mistyped fields lives in one place: anything that is not there, at any
//! nesting level, yields the caller's default.

use serde_json::Value;

pub trait ValueExt {
    /// Walk `path` through nested objects, returning the leaf if every step exists.
    fn at_path(&self, path: &[&str]) -> Option<&Value>;

    /// Numeric leaf at `path`, or `default`. Integers are widened to `f64`.
    fn get_or(&self, path: &[&str], default: f64) -> f64 {
        self.at_path(path).and_then(Value::as_f64).unwrap_or(default)
    }

    /// String leaf at `path`, or `default`.
    fn get_str_or<'a>(&'a self, path: &[&str], default: &'a str) -> &'a str {
        self.at_path(path).and_then(Value::as_str).unwrap_or(default)
    }
}

impl ValueExt for Value {
    fn at_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.get(*key))
    }
}
