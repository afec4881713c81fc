use super::{require_text, TextInput, ValidationError, ValidationErrorKind, ValidationResult};

const FIELD: &str = "duration";

/// Time units understood by Elasticsearch datemath strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    pub fn from_char(unit: char) -> Option<Self> {
        match unit {
            's' => Some(TimeUnit::Seconds),
            'm' => Some(TimeUnit::Minutes),
            'h' => Some(TimeUnit::Hours),
            'd' => Some(TimeUnit::Days),
            'w' => Some(TimeUnit::Weeks),
            _ => None,
        }
    }

    pub fn seconds(&self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 60 * 60,
            TimeUnit::Days => 60 * 60 * 24,
            TimeUnit::Weeks => 60 * 60 * 24 * 7,
        }
    }
}

/// Parse a datemath duration such as `"5m"` or `"21d"` into seconds.
///
/// The string must be an integer immediately followed by exactly one unit
/// letter: `s`, `m`, `h`, `d` or `w`.
pub fn convert_to_sec<T>(duration: &T) -> ValidationResult<i64>
where
    T: TextInput + ?Sized,
{
    let value = require_text(FIELD, duration)?;

    let malformed = |kind| ValidationError::new(FIELD, kind);

    let unit = match value.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => c,
        _ => {
            return Err(malformed(ValidationErrorKind::MissingUnit {
                value: value.to_string(),
            }));
        }
    };

    let unit = TimeUnit::from_char(unit).ok_or_else(|| {
        malformed(ValidationErrorKind::UnknownUnit {
            value: value.to_string(),
            unit,
        })
    })?;

    // The unit is a single ASCII byte
    let number = &value[..value.len() - 1];
    let number: i64 = number.parse().map_err(|e: std::num::ParseIntError| {
        malformed(ValidationErrorKind::InvalidNumber {
            value: value.to_string(),
            reason: e.to_string(),
        })
    })?;

    number.checked_mul(unit.seconds()).ok_or_else(|| {
        malformed(ValidationErrorKind::InvalidNumber {
            value: value.to_string(),
            reason: "duration overflows".to_string(),
        })
    })
}
