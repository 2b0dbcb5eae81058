use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{ChordError, Result};

pub type Predicate = Arc<dyn Fn() -> Condition + Send + Sync>;

/// Gate deciding whether an action runs when its key is pressed.
#[derive(Clone)]
pub enum Condition {
    Bool(bool),
    /// True iff non-empty.
    Text(String),
    /// True iff non-zero.
    Number(f64),
    /// Evaluated on every check. The result is evaluated again, so a predicate
    /// may hand back another predicate. A chain that never ends in a literal
    /// never terminates; that is on the caller.
    Predicate(Predicate),
}

impl Condition {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn() -> Condition + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(f))
    }

    pub fn is_true(&self) -> bool {
        match self {
            Condition::Bool(value) => *value,
            Condition::Text(text) => !text.is_empty(),
            Condition::Number(n) => *n != 0.0,
            Condition::Predicate(predicate) => {
                let mut current = predicate();
                loop {
                    match current {
                        Condition::Predicate(inner) => current = inner(),
                        literal => return literal.is_true(),
                    }
                }
            }
        }
    }

    /// Builds a condition from an untyped value. `null` means the default.
    pub fn from_value(key: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Condition::default()),
            Value::Bool(b) => Ok(Condition::Bool(*b)),
            Value::String(s) => Ok(Condition::Text(s.clone())),
            Value::Number(n) => n
                .as_f64()
                .map(Condition::Number)
                .ok_or_else(|| ChordError::invalid_condition(key, format!("unrepresentable number {n}"))),
            Value::Array(_) => Err(ChordError::invalid_condition(key, "arrays are not conditions")),
            Value::Object(_) => Err(ChordError::invalid_condition(key, "objects are not conditions")),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Condition::Bool(true))
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Bool(true)
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Condition::Bool(a), Condition::Bool(b)) => a == b,
            (Condition::Text(a), Condition::Text(b)) => a == b,
            (Condition::Number(a), Condition::Number(b)) => a == b,
            (Condition::Predicate(a), Condition::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Condition::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Condition::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Bool(b) => write!(f, "{b}"),
            Condition::Text(s) => write!(f, "{s:?}"),
            Condition::Number(n) => write!(f, "{n}"),
            Condition::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        Condition::Bool(value)
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Condition::Text(value.to_string())
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::Text(value)
    }
}

impl From<f64> for Condition {
    fn from(value: f64) -> Self {
        Condition::Number(value)
    }
}

impl From<i64> for Condition {
    fn from(value: i64) -> Self {
        Condition::Number(value as f64)
    }
}

impl From<i32> for Condition {
    fn from(value: i32) -> Self {
        Condition::Number(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_literals() {
        assert!(Condition::from(true).is_true());
        assert!(!Condition::from(false).is_true());
        assert!(!Condition::from("").is_true());
        assert!(Condition::from("x").is_true());
        assert!(!Condition::from(0).is_true());
        assert!(!Condition::from(0.0).is_true());
        assert!(Condition::from(-3).is_true());
        assert!(Condition::default().is_true());
    }

    #[test]
    fn test_predicate_is_evaluated_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let condition = Condition::predicate(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Condition::from(n % 2 == 0)
        });
        assert!(condition.is_true());
        assert!(!condition.is_true());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_nested_predicates_resolve_transitively() {
        let condition = Condition::predicate(|| Condition::predicate(|| Condition::predicate(|| "yes".into())));
        assert!(condition.is_true());
        let condition = Condition::predicate(|| Condition::predicate(|| 0.into()));
        assert!(!condition.is_true());
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Condition::from_value("a", &json!(null)).unwrap(), Condition::Bool(true));
        assert_eq!(Condition::from_value("a", &json!(false)).unwrap(), Condition::Bool(false));
        assert_eq!(Condition::from_value("a", &json!("on")).unwrap(), Condition::Text("on".into()));
        assert_eq!(Condition::from_value("a", &json!(2)).unwrap(), Condition::Number(2.0));
        assert!(matches!(
            Condition::from_value("a", &json!([1])),
            Err(ChordError::InvalidCondition { .. })
        ));
        assert!(matches!(
            Condition::from_value("a", &json!({"x": 1})),
            Err(ChordError::InvalidCondition { .. })
        ));
    }

    #[test]
    fn test_predicates_compare_by_identity() {
        let a = Condition::predicate(|| true.into());
        let b = Condition::predicate(|| true.into());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
