use std::sync::Arc;

use crate::{
    env::Env,
    error::{MalError, MalResult},
    reader,
    types::{Closure, MalValue},
};

/// Deepest evaluation accepted, counting nested forms and function calls.
pub const MAX_EVAL_DEPTH: usize = 200;

/// Definitions every console environment starts with.
const PRELUDE: &[&str] = &["(def! not (fn* (x) (if x false true)))"];

/// Read, evaluate and print one line against `env`.
pub fn rep(input: &str, env: &Env) -> Result<String, MalError> {
    let ast = reader::read_str(input)?;
    let value = eval(&ast, env)?;
    Ok(value.pr_str(true))
}

pub fn load_prelude(env: &Env) -> Result<(), MalError> {
    for line in PRELUDE {
        rep(line, env)?;
    }
    Ok(())
}

pub fn eval(ast: &MalValue, env: &Env) -> MalResult {
    eval_at(ast, env, 0)
}

fn eval_at(ast: &MalValue, env: &Env, depth: usize) -> MalResult {
    if depth >= MAX_EVAL_DEPTH {
        return Err(MalError::msg("nesting too deep"));
    }
    let depth = depth + 1;

    let MalValue::List(items) = ast else {
        return eval_ast(ast, env, depth);
    };
    let Some((head, args)) = items.split_first() else {
        return Ok(ast.clone());
    };
    match head.as_symbol() {
        Some("def!") => eval_def(args, env, depth),
        Some("let*") => eval_let(args, env, depth),
        Some("do") => eval_do(args, env, depth),
        Some("if") => eval_if(args, env, depth),
        Some("fn*") => eval_fn(args, env),
        _ => {
            let function = eval_at(head, env, depth)?;
            let values = eval_all(args, env, depth)?;
            apply(&function, &values, depth)
        }
    }
}

fn eval_ast(ast: &MalValue, env: &Env, depth: usize) -> MalResult {
    match ast {
        MalValue::Symbol(name) => env.get(name),
        MalValue::List(items) => Ok(MalValue::List(eval_all(items, env, depth)?)),
        MalValue::Vector(items) => Ok(MalValue::Vector(eval_all(items, env, depth)?)),
        MalValue::Map(map) => {
            let mut evaluated = map.clone();
            for value in evaluated.values_mut() {
                *value = eval_at(value, env, depth)?;
            }
            Ok(MalValue::Map(evaluated))
        }
        other => Ok(other.clone()),
    }
}

fn eval_all(items: &[MalValue], env: &Env, depth: usize) -> Result<Vec<MalValue>, MalError> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(eval_at(item, env, depth)?);
    }
    Ok(values)
}

fn apply(function: &MalValue, args: &[MalValue], depth: usize) -> MalResult {
    match function {
        MalValue::Builtin(builtin) => (builtin.func)(args),
        MalValue::Closure(closure) => {
            let scope = bind_params(closure, args)?;
            eval_at(&closure.body, &scope, depth)
        }
        other => Err(MalError::msg(format!(
            "cannot call a non-function ({})",
            other.type_name()
        ))),
    }
}

fn bind_params(closure: &Closure, args: &[MalValue]) -> Result<Env, MalError> {
    let fixed = closure.params.len();
    let arity_ok = match closure.rest {
        Some(_) => args.len() >= fixed,
        None => args.len() == fixed,
    };
    if !arity_ok {
        return Err(MalError::msg(format!(
            "wrong arity ({}) for function, should be {fixed}",
            args.len()
        )));
    }

    let scope = closure.env.inner();
    for (name, value) in closure.params.iter().zip(args) {
        scope.set(name.as_str(), value.clone());
    }
    if let Some(rest) = &closure.rest {
        scope.set(rest.as_str(), MalValue::List(args[fixed..].to_vec()));
    }
    Ok(scope)
}

fn eval_def(args: &[MalValue], env: &Env, depth: usize) -> MalResult {
    let [key, value] = args else {
        return Err(MalError::msg("wrong arity for def!, should be 2"));
    };
    let Some(name) = key.as_symbol() else {
        return Err(MalError::msg("def! with non-symbol as a key"));
    };
    let value = eval_at(value, env, depth)?;
    env.set(name, value.clone());
    Ok(value)
}

fn eval_let(args: &[MalValue], env: &Env, depth: usize) -> MalResult {
    let [bindings, body] = args else {
        return Err(MalError::msg("wrong arity for \"let*\", should be 2"));
    };
    let (MalValue::List(bindings) | MalValue::Vector(bindings)) = bindings else {
        return Err(MalError::msg("let* with non-list binding"));
    };
    if bindings.len() % 2 != 0 {
        return Err(MalError::msg(
            "missing key or value in the let* binding list",
        ));
    }

    let inner = env.inner();
    for pair in bindings.chunks(2) {
        let Some(name) = pair[0].as_symbol() else {
            return Err(MalError::msg("non-symbol key in the let* binding list"));
        };
        let value = eval_at(&pair[1], &inner, depth)?;
        inner.set(name, value);
    }
    eval_at(body, &inner, depth)
}

// `(do)` yields nil.
fn eval_do(args: &[MalValue], env: &Env, depth: usize) -> MalResult {
    let mut last = MalValue::Nil;
    for form in args {
        last = eval_at(form, env, depth)?;
    }
    Ok(last)
}

fn eval_if(args: &[MalValue], env: &Env, depth: usize) -> MalResult {
    let (condition, then, otherwise) = match args {
        [condition, then] => (condition, then, None),
        [condition, then, otherwise] => (condition, then, Some(otherwise)),
        _ => return Err(MalError::msg("wrong arity for if, should be 3 or 4")),
    };
    if eval_at(condition, env, depth)?.is_truthy() {
        eval_at(then, env, depth)
    } else {
        match otherwise {
            Some(otherwise) => eval_at(otherwise, env, depth),
            None => Ok(MalValue::Nil),
        }
    }
}

fn eval_fn(args: &[MalValue], env: &Env) -> MalResult {
    let [params, body] = args else {
        return Err(MalError::msg("wrong arity for fn*, should be 2"));
    };
    let (MalValue::List(params) | MalValue::Vector(params)) = params else {
        return Err(MalError::msg("fn* with non-list arguments"));
    };

    let mut names = Vec::with_capacity(params.len());
    let mut rest = None;
    let mut symbols = params.iter();
    while let Some(param) = symbols.next() {
        let Some(name) = param.as_symbol() else {
            return Err(MalError::msg("fn* with non-symbol argument"));
        };
        if name == "&" {
            match (symbols.next().and_then(MalValue::as_symbol), symbols.next()) {
                (Some(rest_name), None) => rest = Some(rest_name.to_string()),
                _ => return Err(MalError::msg("fn* expects one symbol after &")),
            }
            break;
        }
        names.push(name.to_string());
    }

    Ok(MalValue::Closure(Arc::new(Closure {
        params: names,
        rest,
        body: body.clone(),
        env: env.clone(),
    })))
}
