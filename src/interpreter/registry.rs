use std::collections::HashMap;

use crate::{
    ast::{Function, FunctionId},
    interpreter::value::core::Value,
};

/// Storage for custom functions.
///
/// Functions live in slots addressed by [`FunctionId`]. Deleting a function
/// leaves a tombstone that is never handed out again, so trees that still
/// refer to it fail with a deleted-function error. Redefining a name reuses
/// its slot, which keeps existing callers pointed at the new body.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    slots: Vec<Option<Function>>,
    names: HashMap<String, usize>,
}

impl FunctionRegistry {
    /// The slot of the live function `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<FunctionId> {
        self.names.get(name).copied().map(FunctionId)
    }

    /// The function in slot `id`, unless it was deleted.
    #[must_use]
    pub fn get(&self, id: FunctionId) -> Option<&Function> {
        self.slots.get(id.0)?.as_ref()
    }

    /// The slot a definition of `name` will occupy: its current slot when
    /// the name is live, otherwise a fresh one.
    #[must_use]
    pub fn reserve(&self, name: &str) -> FunctionId {
        self.lookup(name).unwrap_or(FunctionId(self.slots.len()))
    }

    /// Stores `function` in the slot handed out by [`reserve`](Self::reserve).
    pub fn insert(&mut self, id: FunctionId, function: Function) {
        self.names.insert(function.name.clone(), id.0);
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = Some(function);
        } else {
            self.slots.push(Some(function));
        }
    }

    /// Tombstones the function `name` and returns it.
    pub fn remove(&mut self, name: &str) -> Option<Function> {
        let index = self.names.remove(name)?;
        self.slots.get_mut(index)?.take()
    }

    /// Live functions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|function| (FunctionId(index), function)))
    }

    /// Number of live functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Storage for global variables, with the same tombstone rules as
/// [`FunctionRegistry`].
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    slots: Vec<Option<(String, Value)>>,
    names: HashMap<String, usize>,
}

impl VariableRegistry {
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// The value in `slot`, unless it was deleted.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Value> {
        self.slots.get(slot)?.as_ref().map(|(_, value)| value)
    }

    /// The name stored in `slot`, unless it was deleted.
    #[must_use]
    pub fn name(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot)?.as_ref().map(|(name, _)| name.as_str())
    }

    /// Sets `name`, reusing its slot when it exists. Returns the slot.
    pub fn set(&mut self, name: &str, value: Value) -> usize {
        if let Some(index) = self.lookup(name)
           && let Some(Some((_, stored))) = self.slots.get_mut(index)
        {
            *stored = value;
            return index;
        }
        let index = self.slots.len();
        self.slots.push(Some((name.to_string(), value)));
        self.names.insert(name.to_string(), index);
        index
    }

    /// Tombstones `name` and returns its last value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.names.remove(name)?;
        self.slots.get_mut(index)?.take().map(|(_, value)| value)
    }

    /// Live variables in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots
            .iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
