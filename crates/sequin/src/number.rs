//! Numeric items for averaging and for the dynamic surface.

use std::cmp::Ordering;

use serde_json::Value;

/// A numeric item widened to one of three representations.
///
/// Integers keep full precision; mixed comparisons go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// The value as a float, rounding large integers.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// The value as a signed integer, if it is one and fits.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(n) => Some(n),
            Number::U64(n) => i64::try_from(n).ok(),
            Number::F64(_) => None,
        }
    }

    /// Orders two numbers, exactly when both have the same kind.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Reads a JSON number. Anything else gives `None`.
    pub fn from_json(value: &Value) -> Option<Number> {
        let Value::Number(n) = value else {
            return None;
        };
        if let Some(i) = n.as_i64() {
            Some(Number::I64(i))
        } else if let Some(u) = n.as_u64() {
            Some(Number::U64(u))
        } else {
            n.as_f64().map(Number::F64)
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mixed_comparisons_widen() {
        assert!(Number::from(3u8) > Number::from(-1i32));
        assert!(Number::from(2.5f64) < Number::from(3u64));
        assert_eq!(
            Number::from(f64::NAN).compare(Number::from(1.0)),
            None
        );
    }

    #[test]
    fn reads_json_numbers() {
        assert_eq!(Number::from_json(&json!(-4)), Some(Number::I64(-4)));
        assert_eq!(
            Number::from_json(&json!(u64::MAX)),
            Some(Number::U64(u64::MAX))
        );
        assert_eq!(Number::from_json(&json!(1.5)), Some(Number::F64(1.5)));
        assert_eq!(Number::from_json(&json!("1")), None);
    }

    #[test]
    fn as_i64_rejects_fractions_and_overflow() {
        assert_eq!(Number::from(7u32).as_i64(), Some(7));
        assert_eq!(Number::from(u64::MAX).as_i64(), None);
        assert_eq!(Number::from(1.0f64).as_i64(), None);
    }
}
