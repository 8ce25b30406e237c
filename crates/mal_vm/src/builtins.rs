//! Builtin functions of the root environment.

use crate::{
    error::{MalError, MalResult},
    types::{Builtin, MalValue},
};

pub fn ns() -> Vec<Builtin> {
    vec![
        Builtin { name: "=", func: equal },
        Builtin { name: "list", func: list },
        Builtin { name: "list?", func: is_list },
        Builtin { name: "empty?", func: is_empty },
        Builtin { name: "count", func: count },
        Builtin { name: "+", func: add },
        Builtin { name: "-", func: sub },
        Builtin { name: "*", func: mul },
        Builtin { name: "/", func: div },
        Builtin { name: "<", func: lt },
        Builtin { name: "<=", func: lte },
        Builtin { name: ">", func: gt },
        Builtin { name: ">=", func: gte },
        Builtin { name: "prn", func: prn },
    ]
}

fn wrong_arity(name: &str, args: &[MalValue], expected: usize) -> MalError {
    MalError::msg(format!(
        "wrong arity ({}) for {name}, should be {expected}",
        args.len()
    ))
}

fn equal(args: &[MalValue]) -> MalResult {
    let [left, right] = args else {
        return Err(wrong_arity("=", args, 2));
    };
    Ok(MalValue::Bool(left == right))
}

fn list(args: &[MalValue]) -> MalResult {
    Ok(MalValue::List(args.to_vec()))
}

fn is_list(args: &[MalValue]) -> MalResult {
    let [value] = args else {
        return Err(wrong_arity("list?", args, 1));
    };
    Ok(MalValue::Bool(matches!(value, MalValue::List(_))))
}

fn is_empty(args: &[MalValue]) -> MalResult {
    match args {
        [MalValue::List(seq) | MalValue::Vector(seq)] => Ok(MalValue::Bool(seq.is_empty())),
        [_] => Err(MalError::msg("empty? called on non-list/vector")),
        _ => Err(wrong_arity("empty?", args, 1)),
    }
}

fn count(args: &[MalValue]) -> MalResult {
    match args {
        [MalValue::List(seq) | MalValue::Vector(seq)] => i64::try_from(seq.len())
            .map(MalValue::Integer)
            .map_err(|_| MalError::msg("integer overflow")),
        [_] => Err(MalError::msg("count called on non-list/vector")),
        _ => Err(wrong_arity("count", args, 1)),
    }
}

/// Readable form of the argument, as a string value.
fn prn(args: &[MalValue]) -> MalResult {
    let [value] = args else {
        return Err(wrong_arity("prn", args, 1));
    };
    Ok(MalValue::Str(value.pr_str(true)))
}

fn int_pair(args: &[MalValue], operation: &str) -> Result<(i64, i64), MalError> {
    match args {
        [MalValue::Integer(left), MalValue::Integer(right)] => Ok((*left, *right)),
        [MalValue::Integer(_), _] => Err(MalError::msg("right argument must be an integer")),
        [_, _] => Err(MalError::msg("left argument must be an integer")),
        _ => Err(MalError::msg(format!(
            "wrong arity ({}) for {operation} between 2 integers",
            args.len()
        ))),
    }
}

fn int_op(args: &[MalValue], op: fn(i64, i64) -> Option<i64>) -> MalResult {
    let (left, right) = int_pair(args, "operation")?;
    op(left, right)
        .map(MalValue::Integer)
        .ok_or_else(|| MalError::msg("integer overflow"))
}

fn int_cmp(args: &[MalValue], cmp: fn(i64, i64) -> bool) -> MalResult {
    let (left, right) = int_pair(args, "comparison")?;
    Ok(MalValue::Bool(cmp(left, right)))
}

fn add(args: &[MalValue]) -> MalResult {
    int_op(args, i64::checked_add)
}

fn sub(args: &[MalValue]) -> MalResult {
    int_op(args, i64::checked_sub)
}

fn mul(args: &[MalValue]) -> MalResult {
    int_op(args, i64::checked_mul)
}

fn div(args: &[MalValue]) -> MalResult {
    let (_, right) = int_pair(args, "operation")?;
    if right == 0 {
        return Err(MalError::msg("cannot divide by 0"));
    }
    int_op(args, i64::checked_div)
}

fn lt(args: &[MalValue]) -> MalResult {
    int_cmp(args, |a, b| a < b)
}

fn lte(args: &[MalValue]) -> MalResult {
    int_cmp(args, |a, b| a <= b)
}

fn gt(args: &[MalValue]) -> MalResult {
    int_cmp(args, |a, b| a > b)
}

fn gte(args: &[MalValue]) -> MalResult {
    int_cmp(args, |a, b| a >= b)
}
