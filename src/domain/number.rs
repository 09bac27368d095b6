use std::fmt::Display;

#[derive(Clone, Debug)]
pub enum Number {
    PositiveInt(u64),
    NegativeInt(i64),
    Float(f64),
}

impl Number {
    pub fn from_json(number: &serde_json::Number) -> Option<Number> {
        if let Some(n) = number.as_u64() {
            return Some(Number::PositiveInt(n));
        }
        if let Some(n) = number.as_i64() {
            return Some(Number::NegativeInt(n));
        }
        number.as_f64().map(Number::Float)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        if value >= 0 {
            Number::PositiveInt(value as u64)
        } else {
            Number::NegativeInt(value)
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::PositiveInt(a), Number::PositiveInt(b)) => a == b,
            (Number::NegativeInt(a), Number::NegativeInt(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Float(a), Number::PositiveInt(b)) => *a == *b as f64,
            (Number::Float(a), Number::NegativeInt(b)) => *a == *b as f64,
            (Number::PositiveInt(a), Number::Float(b)) => *a as f64 == *b,
            (Number::NegativeInt(a), Number::Float(b)) => *a as f64 == *b,
            (Number::PositiveInt(a), Number::NegativeInt(b)) => *b >= 0 && *a == *b as u64,
            (Number::NegativeInt(a), Number::PositiveInt(b)) => *a >= 0 && *a as u64 == *b,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::PositiveInt(n) => write!(f, "{}", n),
            Number::NegativeInt(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}
