//! Percent-style text formatting for `string.format`.
//!
//! Supports `%s %r %c`, the integer conversions `%d %i %u %x %X %o`, the
//! float conversions `%f %F %e %E %g %G`, and `%%`. Each accepts the `-`,
//! `+` and `0` flags, a field width, and a `.precision`.

use std::iter::Peekable;
use std::str::Chars;

use crate::{errors, AilResult, TypeRegistry, Value};

#[derive(Default)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    width: usize,
    precision: Option<usize>,
}

/// Substitute `args` into `template`.
///
/// Too few or too many arguments, or an argument of the wrong kind for its
/// conversion, is a `TypeError`; an unknown conversion is a `ValueError`.
pub(super) fn percent_format(
    reg: &TypeRegistry,
    template: &str,
    args: &[Value],
) -> AilResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut remaining = args.iter();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let spec = parse_spec(&mut chars);
        let Some(conversion) = chars.next() else {
            return Err(errors::value_error("incomplete format"));
        };
        if conversion == '%' {
            out.push('%');
            continue;
        }
        let arg = remaining
            .next()
            .ok_or_else(|| errors::type_error("not enough arguments for format string"))?;
        let (body, numeric) = convert(reg, conversion, &spec, arg)?;
        pad(&mut out, &body, &spec, numeric);
    }

    if remaining.next().is_some() {
        return Err(errors::type_error(
            "not all arguments converted during string formatting",
        ));
    }
    Ok(out)
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Spec {
    let mut spec = Spec::default();
    while let Some(&flag) = chars.peek() {
        match flag {
            '-' => spec.left_align = true,
            '0' => spec.zero_pad = true,
            '+' => spec.plus_sign = true,
            _ => break,
        }
        chars.next();
    }
    spec.width = parse_number(chars).unwrap_or(0);
    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(parse_number(chars).unwrap_or(0));
    }
    spec
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

/// Render one conversion. Returns the text and whether it is numeric.
fn convert(
    reg: &TypeRegistry,
    conversion: char,
    spec: &Spec,
    arg: &Value,
) -> AilResult<(String, bool)> {
    let arg = arg.unwrapped();
    match conversion {
        's' => {
            let text = reg.stringify_value(&arg)?;
            Ok((truncate(text, spec.precision), false))
        }
        'r' => {
            let text = reg.repr_value(&arg)?;
            Ok((truncate(text, spec.precision), false))
        }
        'c' => Ok((character(&arg)?.to_string(), false)),
        'd' | 'i' | 'u' => {
            let n = integral(&arg).ok_or_else(|| {
                errors::type_error(format!(
                    "%{conversion} format: a number is required, not {}",
                    arg.type_name()
                ))
            })?;
            Ok((signed(n.to_string(), n >= 0, spec), true))
        }
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let x = real(&arg).ok_or_else(|| {
                errors::type_error(format!("must be real number, not {}", arg.type_name()))
            })?;
            let upper = conversion.is_ascii_uppercase();
            let precision = spec.precision.unwrap_or(6);
            let text = if x.is_finite() {
                match conversion.to_ascii_lowercase() {
                    'e' => exponent_text(x, precision, upper),
                    'g' => general_text(x, precision, upper),
                    _ => format!("{x:.precision$}"),
                }
            } else {
                non_finite(x, upper)
            };
            Ok((signed(text, !x.is_sign_negative(), spec), x.is_finite()))
        }
        'x' | 'X' | 'o' => {
            let n = match arg {
                Value::Int(n) => n,
                Value::Bool(b) => i64::from(b),
                ref other => {
                    return Err(errors::type_error(format!(
                        "%{conversion} format: an integer is required, not {}",
                        other.type_name()
                    )))
                }
            };
            let magnitude = n.unsigned_abs();
            let digits = match conversion {
                'x' => format!("{magnitude:x}"),
                'X' => format!("{magnitude:X}"),
                _ => format!("{magnitude:o}"),
            };
            let text = if n < 0 { format!("-{digits}") } else { digits };
            Ok((signed(text, n >= 0, spec), true))
        }
        other => Err(errors::value_error(format!(
            "unsupported format character '{other}' ({:#x})",
            u32::from(other)
        ))),
    }
}

/// `%c` takes a code point or a one-character string.
fn character(arg: &Value) -> AilResult<char> {
    match arg {
        Value::Int(n) => u32::try_from(*n)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| errors::value_error("%c arg not in range(0x110000)")),
        Value::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(errors::type_error("%c requires int or char")),
            }
        }
        other => Err(errors::type_error(format!(
            "%c requires int or char, not {}",
            other.type_name()
        ))),
    }
}

fn non_finite(x: f64, upper: bool) -> String {
    let text = if x.is_nan() {
        "nan"
    } else if x > 0.0 {
        "inf"
    } else {
        "-inf"
    };
    if upper {
        text.to_ascii_uppercase()
    } else {
        text.to_string()
    }
}

/// `d.ddde+XX`: at least two exponent digits, always signed.
fn exponent_text(x: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{x:.precision$e}");
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{digits:0>2}")
}

/// `%g`: exponent form when the exponent is below -4 or at least the
/// precision, fixed otherwise; trailing zeros are dropped either way.
fn general_text(x: f64, precision: usize, upper: bool) -> String {
    let precision = precision.max(1);
    let significant = i64::try_from(precision).unwrap_or(i64::MAX);
    let digits = precision - 1;
    let exponent: i64 = format!("{x:.digits$e}")
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if exponent < -4 || exponent >= significant {
        let text = exponent_text(x, digits, upper);
        let marker = if upper { 'E' } else { 'e' };
        match text.split_once(marker) {
            Some((mantissa, rest)) => format!("{}{marker}{rest}", strip_fraction(mantissa)),
            None => text,
        }
    } else {
        let decimals = usize::try_from(significant - 1 - exponent).unwrap_or(0);
        strip_fraction(&format!("{x:.decimals$}")).to_string()
    }
}

fn strip_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[allow(clippy::cast_possible_truncation, reason = "%d truncates floats")]
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Float(x) if x.is_finite() => Some(x.trunc() as i64),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss, reason = "%f promotes integers")]
fn real(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn signed(text: String, non_negative: bool, spec: &Spec) -> String {
    if spec.plus_sign && non_negative {
        format!("+{text}")
    } else {
        text
    }
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(limit) => text.chars().take(limit).collect(),
        None => text,
    }
}

fn pad(out: &mut String, body: &str, spec: &Spec, numeric: bool) {
    let len = body.chars().count();
    let fill = spec.width.saturating_sub(len);
    if fill == 0 {
        out.push_str(body);
    } else if spec.left_align {
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero_pad && numeric {
        // Zeros go between the sign and the digits.
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('+' | '-')) => (Some(c), &body[1..]),
            _ => (None, body),
        };
        out.extend(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(body);
    }
}
