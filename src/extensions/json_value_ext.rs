use serde_json::Value;

/// Loose comparisons over JSON values reported by the laser firmware. The firmware is not
/// consistent about integer versus float encodings or about booleans versus 0/1 flags.
pub trait JsonValueExt {
    /// Returns whether the value counts as set: not null, not false, not zero and not empty.
    fn is_truthy(&self) -> bool;

    /// Returns the value as an integral device code, accepting floats without a fraction.
    fn as_code(&self) -> Option<i64>;

    /// Returns whether the value is `true` or the number 1.
    fn is_true(&self) -> bool;

    /// Returns the value rendered as a trimmed string, `None` for null.
    fn trimmed_string(&self) -> Option<String>;
}

impl JsonValueExt for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    fn as_code(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    fn is_true(&self) -> bool {
        self.as_code() == Some(1)
    }

    fn trimmed_string(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!({}), false)]
    #[case(json!([]), false)]
    #[case(json!(true), true)]
    #[case(json!(-1), true)]
    #[case(json!("off"), true)]
    #[case(json!({"state": "on"}), true)]
    fn is_truthy(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[rstest]
    #[case(json!(29), Some(29))]
    #[case(json!(29.0), Some(29))]
    #[case(json!(29.5), None)]
    #[case(json!(false), Some(0))]
    #[case(json!("29"), None)]
    fn as_code(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(value.as_code(), expected);
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!(1), true)]
    #[case(json!("true"), false)]
    #[case(json!(2), false)]
    fn is_true(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_true(), expected);
    }

    #[rstest]
    #[case(json!(" p_idle "), Some("p_idle".to_string()))]
    #[case(json!(3), Some("3".to_string()))]
    #[case(json!(null), None)]
    fn trimmed_string(#[case] value: Value, #[case] expected: Option<String>) {
        assert_eq!(value.trimmed_string(), expected);
    }
}
