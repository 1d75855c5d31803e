//! Arithmetic shared by the integer, float and complex types.

use crate::builtins::require_args;
use crate::{errors, AilResult, Complex, ObjRef, TypeRegistry, Value};

/// A numeric payload after promotion.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
    Complex(Complex),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value.unwrapped() {
            Value::Bool(b) => Some(Num::Int(i64::from(b))),
            Value::Int(n) => Some(Num::Int(n)),
            Value::Float(x) => Some(Num::Float(x)),
            Value::Complex(c) => Some(Num::Complex(c)),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss, reason = "numeric tower promotion")]
    fn to_float(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(x) => x,
            Num::Complex(c) => c.re,
        }
    }

    fn to_complex(self) -> Complex {
        match self {
            Num::Complex(c) => c,
            other => Complex::new(other.to_float(), 0.0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
        }
    }

    fn dunder(self) -> &'static str {
        match self {
            Op::Add => "__add__",
            Op::Sub => "__sub__",
            Op::Mul => "__mul__",
            Op::Div => "__div__",
        }
    }
}

/// Apply `op` to the receiver and the single argument, promoting along
/// int, float, complex. The result is converted back to an object.
pub(super) fn arith(reg: &TypeRegistry, op: Op, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args(op.dunder(), 1, args)?;
    let lhs = Num::of(&Value::Object(this.clone()));
    let rhs = Num::of(&args[0]);
    let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
        return Err(errors::unsupported_operand(
            op.symbol(),
            this.type_name(),
            args[0].type_name(),
        ));
    };

    let result = match (lhs, rhs) {
        (Num::Int(a), Num::Int(b)) => int_op(op, a, b)?,
        (Num::Complex(_), _) | (_, Num::Complex(_)) => {
            Value::Complex(complex_op(op, lhs.to_complex(), rhs.to_complex())?)
        }
        _ => Value::Float(float_op(op, lhs.to_float(), rhs.to_float())?),
    };
    reg.to_value(&result)
}

/// Equality of two numeric payloads, as a boxed boolean.
pub(super) fn numeric_eq(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__eq__", 1, args)?;
    let equal = Value::Object(this.clone()).raw_eq(&args[0]);
    Ok(Value::Object(reg.boolean(equal)))
}

#[allow(clippy::cast_precision_loss, reason = "true division yields a float")]
fn int_op(op: Op, a: i64, b: i64) -> AilResult<Value> {
    let checked = match op {
        Op::Add => a.checked_add(b),
        Op::Sub => a.checked_sub(b),
        Op::Mul => a.checked_mul(b),
        Op::Div => {
            if b == 0 {
                return Err(errors::division_by_zero());
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
    };
    checked
        .map(Value::Int)
        .ok_or_else(|| errors::integer_overflow(op.symbol()))
}

fn float_op(op: Op, a: f64, b: f64) -> AilResult<f64> {
    Ok(match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => {
            if b == 0.0 {
                return Err(errors::division_by_zero());
            }
            a / b
        }
    })
}

fn complex_op(op: Op, a: Complex, b: Complex) -> AilResult<Complex> {
    Ok(match op {
        Op::Add => Complex::new(a.re + b.re, a.im + b.im),
        Op::Sub => Complex::new(a.re - b.re, a.im - b.im),
        Op::Mul => Complex::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re),
        Op::Div => {
            let denominator = b.re * b.re + b.im * b.im;
            if denominator == 0.0 {
                return Err(errors::division_by_zero());
            }
            Complex::new(
                (a.re * b.re + a.im * b.im) / denominator,
                (a.im * b.re - a.re * b.im) / denominator,
            )
        }
    })
}
