//! The string type: immutable text.

use unicode_general_category::{get_general_category, GeneralCategory};

use super::format::percent_format;
use super::{quote, require_args, single_arg};
use crate::convert::as_index;
use crate::{
    errors, AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value,
    VALUE,
};

/// Largest text, in bytes, that repetition will build.
pub const MAX_TEXT_BYTES: usize = 1 << 30;

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("string", TypeCategory::String)
        .slot(Slot::Init, string_init)
        .slot(Slot::Str, string_str)
        .slot(Slot::Repr, string_repr)
        .slot(Slot::Eq, string_eq)
        .slot(Slot::Add, string_add)
        .slot(Slot::Mul, string_mul)
        .slot(Slot::GetItem, string_getitem)
        .slot(Slot::Len, string_len)
        .method("isAlpha", |reg, this, args| {
            classify(reg, this, args, "isAlpha", char::is_alphabetic)
        })
        .method("isDecimal", |reg, this, args| {
            classify(reg, this, args, "isDecimal", is_decimal)
        })
        .method("isDigit", |reg, this, args| {
            classify(reg, this, args, "isDigit", is_digit)
        })
        .method("isNumeric", |reg, this, args| {
            classify(reg, this, args, "isNumeric", char::is_numeric)
        })
        .method("isLower", string_is_lower)
        .method("isUpper", string_is_upper)
        .method("join", string_join)
        .method("format", string_format)
        .build()
}

/// The receiver's text.
fn text_of(this: &ObjRef) -> String {
    match this.value() {
        Some(Value::Str(s)) => s,
        _ => String::new(),
    }
}

/// Accepts raw text, another string (copied), or any other value through
/// its stringifier.
fn string_init(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let text = match args.first() {
        None => String::new(),
        Some(Value::Str(s)) => s.clone(),
        Some(Value::Object(obj)) if obj.is_instance_of(&reg.types().string) => text_of(obj),
        Some(other) => reg.stringify_value(other)?,
    };
    this.set_property(VALUE, Value::Str(text));
    Ok(Value::Null)
}

fn string_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::Str(text_of(this)))
}

fn string_repr(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::Str(quote(&text_of(this))))
}

/// Concatenate with any operand, stringified.
fn string_add(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let other = single_arg("__add__", args)?;
    let mut text = text_of(this);
    text.push_str(&reg.stringify_value(other)?);
    reg.to_value(&Value::Str(text))
}

/// Repeat the text; a negative count yields empty text and a result over
/// [`MAX_TEXT_BYTES`] is a `MemoryError`.
fn string_mul(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let other = single_arg("__mul__", args)?;
    let count = match other {
        Value::Int(n) => *n,
        Value::Object(obj) if obj.is_instance_of(&reg.types().integer) => match obj.value() {
            Some(Value::Int(n)) => n,
            _ => 0,
        },
        _ => {
            return Err(errors::type_error(format!(
                "can't multiply sequence by non-int of type '{}'",
                other.type_name()
            )))
        }
    };
    let count = usize::try_from(count).unwrap_or(0);
    let text = text_of(this);
    match text.len().checked_mul(count) {
        Some(total) if total <= MAX_TEXT_BYTES => reg.to_value(&Value::Str(text.repeat(count))),
        _ => Err(errors::memory_error("repeated string is too long")),
    }
}

/// Character-wise equality.
///
/// Both operands must be strings. The loop compares one character at a
/// time so that the comparison stays under this slot's control.
fn string_eq(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let other = single_arg("__eq__", args)?;
    let Value::Object(other) = other else {
        return Err(errors::type_error(format!(
            "string can only compare with string, not {}",
            other.type_name()
        )));
    };
    if !other.is_instance_of(&reg.types().string) {
        return Err(errors::type_error(format!(
            "string can only compare with string, not {}",
            other.type_name()
        )));
    }

    let lhs: Vec<char> = text_of(this).chars().collect();
    let rhs: Vec<char> = text_of(other).chars().collect();
    if lhs.len() != rhs.len() {
        return Ok(Value::Object(reg.boolean(false)));
    }
    for (a, b) in lhs.iter().zip(&rhs) {
        if a != b {
            return Ok(Value::Object(reg.boolean(false)));
        }
    }
    Ok(Value::Object(reg.boolean(true)))
}

fn string_getitem(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let index = as_index(reg, single_arg("__getitem__", args)?, "string")?;
    let text = text_of(this);
    let len = text.chars().count();
    let ch = usize::try_from(index)
        .ok()
        .and_then(|i| text.chars().nth(i))
        .ok_or_else(|| errors::index_out_of_range(len, index))?;
    reg.to_value(&Value::Str(ch.to_string()))
}

#[allow(clippy::cast_possible_wrap, reason = "text length fits in i64")]
fn string_len(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__len__", 0, args)?;
    Ok(Value::Int(text_of(this).chars().count() as i64))
}

/// True when the text is non-empty and every character satisfies `pred`.
fn classify(
    _: &TypeRegistry,
    this: &ObjRef,
    args: &[Value],
    method: &str,
    pred: fn(char) -> bool,
) -> AilResult<Value> {
    require_args(method, 0, args)?;
    let text = text_of(this);
    Ok(Value::Bool(!text.is_empty() && text.chars().all(pred)))
}

/// Characters outside `Nd` whose Unicode numeric type is `Digit`:
/// superscripts, subscripts, circled and parenthesized digits.
const DIGIT_VALUED: &[(char, char)] = &[
    ('\u{B2}', '\u{B3}'),
    ('\u{B9}', '\u{B9}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19DA}', '\u{19DA}'),
    ('\u{2070}', '\u{2070}'),
    ('\u{2074}', '\u{2079}'),
    ('\u{2080}', '\u{2089}'),
    ('\u{2460}', '\u{2468}'),
    ('\u{2474}', '\u{247C}'),
    ('\u{2488}', '\u{2490}'),
    ('\u{24EA}', '\u{24EA}'),
    ('\u{24F5}', '\u{24FD}'),
    ('\u{24FF}', '\u{24FF}'),
    ('\u{2776}', '\u{277E}'),
    ('\u{2780}', '\u{2788}'),
    ('\u{278A}', '\u{2792}'),
    ('\u{10A40}', '\u{10A43}'),
    ('\u{10E60}', '\u{10E68}'),
    ('\u{11052}', '\u{1105A}'),
    ('\u{1F100}', '\u{1F10A}'),
];

fn is_decimal(c: char) -> bool {
    get_general_category(c) == GeneralCategory::DecimalNumber
}

fn is_digit(c: char) -> bool {
    is_decimal(c)
        || (get_general_category(c) == GeneralCategory::OtherNumber
            && DIGIT_VALUED.iter().any(|&(lo, hi)| (lo..=hi).contains(&c)))
}

/// True when the text has at least one cased character and none of the
/// opposite case.
fn string_is_lower(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("isLower", 0, args)?;
    let text = text_of(this);
    let has_cased = text.chars().any(char::is_lowercase);
    Ok(Value::Bool(has_cased && !text.chars().any(char::is_uppercase)))
}

fn string_is_upper(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("isUpper", 0, args)?;
    let text = text_of(this);
    let has_cased = text.chars().any(char::is_uppercase);
    Ok(Value::Bool(has_cased && !text.chars().any(char::is_lowercase)))
}

/// Join the stringified elements of an iterable with the receiver's text.
fn string_join(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let iterable = single_arg("join", args)?;
    let Some(array) = reg.convert_to_array(iterable)? else {
        return Err(errors::type_error(format!(
            "can only join an iterable, not {}",
            iterable.type_name()
        )));
    };
    let items = match array.value() {
        Some(Value::List(items)) => items,
        _ => Vec::new(),
    };
    let separator = text_of(this);
    let mut parts = Vec::with_capacity(items.len());
    for item in &items {
        parts.push(reg.stringify_value(item)?);
    }
    reg.to_value(&Value::Str(parts.join(&separator)))
}

/// Percent-format the receiver with the unwrapped arguments.
fn string_format(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let values: Vec<Value> = args.iter().map(Value::unwrapped).collect();
    let text = percent_format(reg, &text_of(this), &values)?;
    reg.to_value(&Value::Str(text))
}
