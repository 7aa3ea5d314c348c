use std::fmt;

/// A scalar field value as entered into a form.
///
/// Comparisons follow loose scalar coercion: string operators compare the
/// textual rendering of both sides, numeric operators compare numeric casts,
/// and a value that cannot be read as a number becomes `NaN`, which compares
/// false against everything.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum Value {
    /// An explicit null (cleared field).
    Null,
    /// A boolean, typically from a checkbox or toggle.
    Bool(bool),
    /// A number. Integers and decimals share one representation.
    Number(f64),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Render the value the way string operators see it.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
        }
    }

    /// Numeric cast used by the ordering operators.
    ///
    /// `null` and `false` are `0`, `true` is `1`, blank strings are `0`, and
    /// strings that are not a complete numeric literal are `NaN`.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
        }
    }

    /// Whether this value counts as "empty" for `isEmpty`.
    /// Numeric zero and `false` are not empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }
}

/// Textual rendering of a possibly-missing value. A missing field renders as
/// `"undefined"`.
pub(crate) fn text_of(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_owned(), Value::to_text)
}

/// Numeric cast of a possibly-missing value. A missing field is `NaN`.
pub(crate) fn number_of(value: Option<&Value>) -> f64 {
    value.map_or(f64::NAN, Value::to_number)
}

/// Missing, null, and the empty string are empty.
pub(crate) fn is_empty(value: Option<&Value>) -> bool {
    value.map_or(true, Value::is_blank)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_owned()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponential(n)
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Shortest exponent form with an explicit sign on positive exponents,
/// e.g. `1e+21`, `1.5e-7`.
fn exponential(n: f64) -> String {
    let rendered = format!("{n:e}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => rendered,
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            #[allow(clippy::cast_precision_loss)]
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }

    // Rust's float parser also accepts "inf" and "nan" spellings; only plain
    // decimal literals count here.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Number(v) => write!(f, "{}", format_number(*v)),
            Value::String(v) => write!(f, "\"{v}\""),
        }
    }
}
