use crate::interpreter::lexer::{is_digit, prefix_base};

/// Reads a numeric literal in positional notation.
///
/// The literal may carry a base prefix (`0x`, `0b`, `0o`) and, when `e` is
/// not a digit of its base, an exponent suffix. The exponent scales by the
/// ambient base: `1e2` in base 16 is `0x100`.
///
/// Plain decimal literals go through the standard float parser so that
/// rendered numbers read back exactly.
///
/// # Example
/// ```
/// use abacus::interpreter::parser::number::parse_number;
///
/// assert_eq!(parse_number("2.5e2", 10), Some(250.0));
/// assert_eq!(parse_number("0x1f", 10), Some(31.0));
/// assert_eq!(parse_number("0ff", 16), Some(255.0));
/// assert_eq!(parse_number("101", 2), Some(5.0));
/// ```
#[must_use]
pub fn parse_number(text: &str, base: u32) -> Option<f64> {
    let bytes = text.as_bytes();
    let prefixed = match bytes {
        [b'0', letter, ..] => prefix_base(*letter, base),
        _ => None,
    };
    if base == 10 && prefixed.is_none() {
        return text.parse().ok();
    }

    let (digit_base, body) = match prefixed {
        Some(prefixed) => (prefixed, &text[2..]),
        None => (base, text),
    };
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) if !is_digit(b'e', digit_base) => (&body[..at], Some(&body[at + 1..])),
        _ => (body, None),
    };

    let radix = f64::from(digit_base);
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let mut value = 0.0;
    for c in whole.chars() {
        value = value * radix + f64::from(c.to_digit(digit_base)?);
    }
    let mut scale = 1.0;
    for c in fraction.chars() {
        scale /= radix;
        value += f64::from(c.to_digit(digit_base)?) * scale;
    }

    if let Some(exponent) = exponent {
        let exponent: i32 = exponent.parse().ok()?;
        value *= f64::from(base).powi(exponent);
    }
    Some(value)
}
