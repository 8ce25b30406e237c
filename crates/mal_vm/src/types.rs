use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{env::Env, error::MalResult};

pub type BuiltinFn = fn(&[MalValue]) -> MalResult;

/// A native function exposed to MAL code.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<builtin {}>", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A function created by `fn*`, closed over the scope it was created in.
pub struct Closure {
    pub params: Vec<String>,
    /// Symbol after `&`, bound to the remaining arguments as a list.
    pub rest: Option<String>,
    pub body: MalValue,
    pub env: Env,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#<function>")
    }
}

// Identity: two closures are equal only if they are the same value.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MalValue {
    Nil,
    Bool(bool),
    Integer(i64),
    Str(String),
    Symbol(String),
    List(Vec<MalValue>),
    Vector(Vec<MalValue>),
    Map(BTreeMap<String, MalValue>),
    Builtin(Builtin),
    Closure(Arc<Closure>),
}

impl MalValue {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// `nil` and `false` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::List(_) => "list",
            Self::Vector(_) => "vector",
            Self::Map(_) => "hash-map",
            Self::Builtin(_) | Self::Closure(_) => "function",
        }
    }
}
