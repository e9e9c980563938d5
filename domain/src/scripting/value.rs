//! Host-side representation of interpreter values.

use serde::{Deserialize, Serialize};

/// A simple value type that can be passed to/from scripts.
///
/// Tables and other reference types (functions, userdata, threads) are not
/// copied into the host; they are represented by a marker carrying the
/// interpreter's type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScriptValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Table,
    /// Any other interpreter type, by name (`function`, `userdata`, ...).
    Other(String),
}

impl ScriptValue {
    /// Lua type name of this value.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Nil => "nil",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) | Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Table => "table",
            Self::Other(name) => name,
        }
    }

    /// Whether the value can be bound as a global from the host side.
    pub fn is_registrable(&self) -> bool {
        !matches!(self, Self::Table | Self::Other(_))
    }

    /// Parse a command-line style literal.
    ///
    /// `true`/`false` become booleans, `nil` becomes nil, then integers and
    /// floats are tried; anything else is kept as a string.
    pub fn parse_literal(raw: &str) -> Self {
        match raw {
            "true" => return Self::Boolean(true),
            "false" => return Self::Boolean(false),
            "nil" => return Self::Nil,
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Integer(n);
        }
        if let Ok(n) = raw.parse::<f64>()
            && n.is_finite()
        {
            return Self::Number(n);
        }
        Self::String(raw.to_string())
    }
}

impl std::fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => write!(f, "{}", s),
            Self::Table => write!(f, "table"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Significant digits Lua 5.4 uses for floats (`LUAI_NUMFFORMAT` is `%.14g`).
const NUMBER_DIGITS: i32 = 14;

/// Format a float the way Lua's `tostring` does.
///
/// `%.14g`, plus a trailing `.0` when the result would read as an integer.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    // Exponent after rounding to the significant digits
    let scientific = format!("{:.*e}", (NUMBER_DIGITS - 1) as usize, n);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let mut text = if (-4..NUMBER_DIGITS).contains(&exponent) {
        let precision = (NUMBER_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", precision, n)).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    };

    if text.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
        text.push_str(".0");
    }
    text
}

/// Drop trailing zeros after the decimal point, and the point itself.
fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ScriptValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ScriptValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ScriptValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_follow_lua() {
        assert_eq!(ScriptValue::Nil.type_name(), "nil");
        assert_eq!(ScriptValue::Integer(1).type_name(), "number");
        assert_eq!(ScriptValue::Number(1.5).type_name(), "number");
        assert_eq!(ScriptValue::from("x").type_name(), "string");
        assert_eq!(ScriptValue::Table.type_name(), "table");
        assert_eq!(ScriptValue::Other("function".into()).type_name(), "function");
    }

    #[test]
    fn test_display_matches_tostring() {
        assert_eq!(ScriptValue::Integer(42).to_string(), "42");
        assert_eq!(ScriptValue::Number(2.0).to_string(), "2.0");
        assert_eq!(ScriptValue::Number(0.25).to_string(), "0.25");
        assert_eq!(ScriptValue::Boolean(false).to_string(), "false");
        assert_eq!(ScriptValue::Nil.to_string(), "nil");
    }

    #[test]
    fn test_float_display_uses_fourteen_significant_digits() {
        let cases = [
            (0.1 + 0.2, "0.3"),
            (1e20, "1e+20"),
            (1e15, "1e+15"),
            (1e14, "1e+14"),
            (1e13, "10000000000000.0"),
            (123456.789, "123456.789"),
            (0.0001, "0.0001"),
            (0.00001, "1e-05"),
            (-2.5e-7, "-2.5e-07"),
            (100.0, "100.0"),
            (-0.0, "-0.0"),
            (3.14159265358979, "3.1415926535898"),
            (f64::INFINITY, "inf"),
            (f64::NEG_INFINITY, "-inf"),
            (f64::NAN, "nan"),
            (-f64::NAN, "-nan"),
        ];
        for (n, expected) in cases {
            assert_eq!(ScriptValue::Number(n).to_string(), expected, "{:e}", n);
        }
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(ScriptValue::parse_literal("true"), ScriptValue::Boolean(true));
        assert_eq!(ScriptValue::parse_literal("nil"), ScriptValue::Nil);
        assert_eq!(ScriptValue::parse_literal("-7"), ScriptValue::Integer(-7));
        assert_eq!(ScriptValue::parse_literal("1.5"), ScriptValue::Number(1.5));
        assert_eq!(
            ScriptValue::parse_literal("localhost"),
            ScriptValue::String("localhost".into())
        );
    }

    #[test]
    fn test_only_primitives_are_registrable() {
        assert!(ScriptValue::Integer(1).is_registrable());
        assert!(ScriptValue::Nil.is_registrable());
        assert!(!ScriptValue::Table.is_registrable());
        assert!(!ScriptValue::Other("function".into()).is_registrable());
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_string(&ScriptValue::Integer(8080)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":8080}"#);

        let json = serde_json::to_string(&ScriptValue::Nil).unwrap();
        assert_eq!(json, r#"{"type":"nil"}"#);
    }
}
