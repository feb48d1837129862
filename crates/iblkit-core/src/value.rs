//! Typed manifest values and the coercion rules that produce them.
//!
//! `.ibl` files carry no type annotations; every value is classified from its
//! raw text. The rules are tried in a fixed order and the first match wins:
//!
//! 1. color   `255,128,0`   three 0-255 channels, stored as 0-1 floats
//! 2. string  `"Studio"`    one pair of surrounding quotes is stripped
//! 3. float   `-3.5`        optional minus, digits, a point, digits
//! 4. integer `42`          bare unsigned digits
//!
//! Anything else is kept verbatim as a string.

use glam::Vec3;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,3}),([0-9]{1,3}),([0-9]{1,3})$").unwrap());
static STRING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"(.*)"$"#).unwrap());
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Linear 0-1 channels.
    Color(Vec3),
    String(String),
    Float(f32),
    Integer(i64),
}

impl Value {
    pub fn as_color(&self) -> Option<Vec3> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Floats and integers both read as `f32`; manifests write `1` and `1.0`
    /// interchangeably for multipliers.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        coerce(raw)
    }
}

/// Writes the value back in manifest syntax. Feeding the output to [`coerce`]
/// yields an equal value, except for non-finite floats: an overlong literal
/// such as `1e39` written out in digits parses to infinity, which is written
/// as `inf` and reads back as a string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Color(c) => {
                let channel = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
                write!(f, "{},{},{}", channel(c.x), channel(c.y), channel(c.z))
            }
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Float(v) => {
                let text = v.to_string();
                if v.is_finite() && !text.contains('.') {
                    write!(f, "{}.0", text)
                } else {
                    f.write_str(&text)
                }
            }
            Value::Integer(i) => write!(f, "{}", i),
        }
    }
}

/// Classifies a raw (already trimmed) value. Never fails: unmatched input is
/// returned unchanged as [`Value::String`].
pub fn coerce(raw: &str) -> Value {
    if let Some(color) = parse_color(raw) {
        return Value::Color(color);
    }

    if let Some(caps) = STRING_RE.captures(raw) {
        return Value::String(caps[1].to_string());
    }

    if FLOAT_RE.is_match(raw) {
        if let Ok(f) = raw.parse::<f32>() {
            return Value::Float(f);
        }
    }

    if INTEGER_RE.is_match(raw) {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    Value::String(raw.to_string())
}

fn parse_color(raw: &str) -> Option<Vec3> {
    let caps = COLOR_RE.captures(raw)?;
    let mut channels = [0.0f32; 3];
    for (slot, group) in channels.iter_mut().zip(1usize..=3) {
        let byte: u16 = caps[group].parse().ok()?;
        if byte > 255 {
            return None;
        }
        *slot = byte as f32 / 255.0;
    }
    Some(Vec3::from_array(channels))
}
