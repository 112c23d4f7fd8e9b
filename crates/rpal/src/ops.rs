//! Primitive operators: the unary/binary arithmetic-and-logic table and the
//! builtin-identifier dispatch table (spec §4.D "Primitive operators").

use std::rc::Rc;

use crate::error::RpalError;
use crate::symbol::{Bop, Symbol, Uop};

fn eval_err(message: impl Into<String>) -> RpalError {
    RpalError::Eval { message: message.into() }
}

fn want_int(symbol: &Symbol, context: &str) -> Result<i64, RpalError> {
    symbol.as_int().ok_or_else(|| eval_err(format!("{context} expects an integer, found {symbol}")))
}

fn want_bool(symbol: &Symbol, context: &str) -> Result<bool, RpalError> {
    symbol.as_bool().ok_or_else(|| eval_err(format!("{context} expects a truth value, found {symbol}")))
}

fn want_str<'a>(symbol: &'a Symbol, context: &str) -> Result<&'a str, RpalError> {
    symbol.as_str().ok_or_else(|| eval_err(format!("{context} expects a string, found {symbol}")))
}

pub fn apply_unary(op: Uop, operand: Symbol) -> Result<Symbol, RpalError> {
    match op {
        Uop::Neg => Ok(Symbol::Int(-want_int(&operand, "neg")?)),
        Uop::Not => Ok(Symbol::Bool(!want_bool(&operand, "not")?)),
    }
}

/// `rand1` is the first operand popped off the stack, `rand2` the second
/// (spec §4.D "Binary operators": the same `val1 OP val2` shape throughout).
pub fn apply_binary(op: Bop, rand1: Symbol, rand2: Symbol) -> Result<Symbol, RpalError> {
    match op {
        Bop::Add => {
            let (a, b) = (want_int(&rand1, "+")?, want_int(&rand2, "+")?);
            Ok(Symbol::Int(a.checked_add(b).ok_or_else(|| eval_err("arithmetic overflow"))?))
        }
        Bop::Sub => {
            let (a, b) = (want_int(&rand1, "-")?, want_int(&rand2, "-")?);
            Ok(Symbol::Int(a.checked_sub(b).ok_or_else(|| eval_err("arithmetic overflow"))?))
        }
        Bop::Mul => {
            let (a, b) = (want_int(&rand1, "*")?, want_int(&rand2, "*")?);
            Ok(Symbol::Int(a.checked_mul(b).ok_or_else(|| eval_err("arithmetic overflow"))?))
        }
        Bop::Div => {
            let (a, b) = (want_int(&rand1, "/")?, want_int(&rand2, "/")?);
            if b == 0 {
                return Err(eval_err("division by zero"));
            }
            Ok(Symbol::Int(a / b))
        }
        Bop::Pow => {
            let (base, exp) = (want_int(&rand1, "**")?, want_int(&rand2, "**")?);
            let exp = u32::try_from(exp).map_err(|_| eval_err("** expects a non-negative exponent"))?;
            Ok(Symbol::Int(base.checked_pow(exp).ok_or_else(|| eval_err("arithmetic overflow"))?))
        }
        Bop::And => Ok(Symbol::Bool(want_bool(&rand1, "&")? && want_bool(&rand2, "&")?)),
        Bop::Or => Ok(Symbol::Bool(want_bool(&rand1, "or")? || want_bool(&rand2, "or")?)),
        Bop::Eq => Ok(Symbol::Bool(rand1.to_string() == rand2.to_string())),
        Bop::Ne => Ok(Symbol::Bool(rand1.to_string() != rand2.to_string())),
        Bop::Ls => Ok(Symbol::Bool(want_int(&rand1, "ls")? < want_int(&rand2, "ls")?)),
        Bop::Le => Ok(Symbol::Bool(want_int(&rand1, "le")? <= want_int(&rand2, "le")?)),
        Bop::Gr => Ok(Symbol::Bool(want_int(&rand1, "gr")? > want_int(&rand2, "gr")?)),
        Bop::Ge => Ok(Symbol::Bool(want_int(&rand1, "ge")? >= want_int(&rand2, "ge")?)),
        Bop::Aug => {
            let mut items = rand1
                .as_tup()
                .ok_or_else(|| eval_err(format!("aug expects a tuple on the left, found {rand1}")))?
                .as_ref()
                .clone();
            match rand2.as_tup() {
                Some(more) => items.extend(more.iter().cloned()),
                None => items.push(rand2),
            }
            Ok(Symbol::Tup(Rc::new(items)))
        }
    }
}

/// Dispatches the fixed set of 1-ary builtins recognized by name (spec §4.D
/// "Builtins"). `Conc` is 2-ary and handled separately in the evaluator,
/// since it is curried at the call site rather than applied in one step.
pub fn apply_builtin(name: &str, arg: Symbol) -> Result<Symbol, RpalError> {
    match name {
        "Print" | "Print_" => Ok(Symbol::Dummy),
        "Stem" => {
            let s = want_str(&arg, "Stem")?;
            Ok(Symbol::Str(s.chars().next().map(String::from).unwrap_or_default()))
        }
        "Stern" => {
            let s = want_str(&arg, "Stern")?;
            Ok(Symbol::Str(s.chars().skip(1).collect()))
        }
        "Order" => {
            let t = arg.as_tup().ok_or_else(|| eval_err(format!("Order expects a tuple, found {arg}")))?;
            Ok(Symbol::Int(t.len() as i64))
        }
        "Null" => Ok(Symbol::Bool(matches!(&arg, Symbol::Tup(t) if t.is_empty()))),
        "Isinteger" => Ok(Symbol::Bool(matches!(arg, Symbol::Int(_)))),
        "Isstring" => Ok(Symbol::Bool(matches!(arg, Symbol::Str(_)))),
        "Istuple" => Ok(Symbol::Bool(matches!(arg, Symbol::Tup(_)))),
        "Isdummy" => Ok(Symbol::Bool(matches!(arg, Symbol::Dummy))),
        "Istruthvalue" => Ok(Symbol::Bool(matches!(arg, Symbol::Bool(_)))),
        "Isfunction" => Ok(Symbol::Bool(matches!(arg, Symbol::Lambda(_) | Symbol::Eta(_) | Symbol::Ystar))),
        "Itos" => Ok(Symbol::Str(want_int(&arg, "Itos")?.to_string())),
        other => Err(eval_err(format!("'{other}' is not a recognized function"))),
    }
}

/// The 2-ary string-concatenation builtin, applied once both operands are in
/// hand (spec §4.D "Builtins", `Conc`).
pub fn conc(a: &Symbol, b: &Symbol) -> Result<Symbol, RpalError> {
    let (a, b) = (want_str(a, "Conc")?, want_str(b, "Conc")?);
    Ok(Symbol::Str(format!("{a}{b}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_overflow_is_a_recoverable_error_not_a_panic() {
        assert!(apply_binary(Bop::Pow, Symbol::Int(2), Symbol::Int(100)).is_err());
    }

    #[test]
    fn add_overflow_is_a_recoverable_error() {
        assert!(apply_binary(Bop::Add, Symbol::Int(i64::MAX), Symbol::Int(1)).is_err());
    }

    #[test]
    fn division_truncates_toward_zero() {
        let result = apply_binary(Bop::Div, Symbol::Int(-7), Symbol::Int(2)).unwrap();
        assert_eq!(result, Symbol::Int(-3));
    }

    #[test]
    fn le_produces_a_real_bool() {
        assert_eq!(apply_binary(Bop::Le, Symbol::Int(3), Symbol::Int(3)).unwrap(), Symbol::Bool(true));
        assert_eq!(apply_binary(Bop::Le, Symbol::Int(4), Symbol::Int(3)).unwrap(), Symbol::Bool(false));
    }

    #[test]
    fn aug_builds_a_new_tuple_without_mutating_the_original() {
        let original = Rc::new(vec![Symbol::Int(1)]);
        let left = Symbol::Tup(Rc::clone(&original));
        let result = apply_binary(Bop::Aug, left, Symbol::Int(2)).unwrap();
        assert_eq!(original.len(), 1);
        assert_eq!(result, Symbol::Tup(Rc::new(vec![Symbol::Int(1), Symbol::Int(2)])));
    }

    #[test]
    fn stem_and_stern_split_the_first_character() {
        assert_eq!(apply_builtin("Stem", Symbol::Str("Hello".into())).unwrap(), Symbol::Str("H".into()));
        assert_eq!(apply_builtin("Stern", Symbol::Str("Hello".into())).unwrap(), Symbol::Str("ello".into()));
    }

    #[test]
    fn conc_concatenates_two_strings() {
        assert_eq!(conc(&Symbol::Str("foo".into()), &Symbol::Str("bar".into())).unwrap(), Symbol::Str("foobar".into()));
    }

    #[test]
    fn null_is_true_only_for_the_empty_tuple() {
        assert_eq!(apply_builtin("Null", Symbol::Tup(Rc::new(Vec::new()))).unwrap(), Symbol::Bool(true));
        assert_eq!(apply_builtin("Null", Symbol::Tup(Rc::new(vec![Symbol::Int(1)]))).unwrap(), Symbol::Bool(false));
    }
}
