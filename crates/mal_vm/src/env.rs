use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};

use crate::{
    builtins,
    error::{MalError, MalResult},
    types::MalValue,
};

/// A lexical scope. Clones share the same scope, which is how closures keep
/// the scope they were created in.
#[derive(Debug, Clone, Default)]
pub struct Env(Arc<Scope>);

#[derive(Debug, Default)]
struct Scope {
    data: RwLock<HashMap<String, MalValue>>,
    outer: Option<Env>,
}

impl Env {
    /// Root scope preloaded with the core builtins.
    pub fn root() -> Self {
        let env = Self::default();
        for builtin in builtins::ns() {
            env.set(builtin.name, MalValue::Builtin(builtin));
        }
        env
    }

    pub fn inner(&self) -> Self {
        Self(Arc::new(Scope {
            data: RwLock::default(),
            outer: Some(self.clone()),
        }))
    }

    pub fn get(&self, key: &str) -> MalResult {
        let mut scope = self;
        loop {
            if let Some(value) = scope.data().get(key) {
                return Ok(value.clone());
            }
            scope = match &scope.0.outer {
                Some(outer) => outer,
                None => return Err(MalError::SymbolNotFound(key.to_string())),
            };
        }
    }

    pub fn set(&self, key: impl Into<String>, value: MalValue) {
        self.0
            .data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    /// Drop every binding of this scope, releasing closures that refer back to it.
    pub fn clear(&self) {
        self.0
            .data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    fn data(&self) -> RwLockReadGuard<'_, HashMap<String, MalValue>> {
        self.0.data.read().unwrap_or_else(PoisonError::into_inner)
    }
}
