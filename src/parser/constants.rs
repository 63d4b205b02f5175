use std::fmt;

use num_enum::TryFromPrimitive;

/// Tag byte preceding every entry of a constant pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ConstantTag {
    Nil = 0x00,
    Boolean = 0x01,
    Float = 0x03,
    ShortString = 0x04,
    Integer = 0x13,
    LongString = 0x14,
}

/// A value from a prototype's constant pool
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Raw string bytes; Lua strings are not required to be UTF-8
    String(Vec<u8>),
}

/// Writes `n` in the shortest form that reads back exactly, switching to
/// exponent notation (`1e+20`, `1.5e-07`) when the decimal exponent is below
/// -4 or at least 6.
fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return write!(f, "NaN");
    }
    if n.is_infinite() {
        return write!(f, "{}Inf", if n < 0.0 { '-' } else { '+' });
    }

    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..6).contains(&exponent) {
        write!(f, "{n}")
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Nil => write!(f, "nil"),
            Constant::Boolean(b) => write!(f, "{b}"),
            Constant::Integer(i) => write!(f, "{i}"),
            Constant::Float(n) => write_float(f, *n),
            Constant::String(bytes) => write!(f, "\"{}\"", bytes.escape_ascii()),
        }
    }
}
