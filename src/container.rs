//! The explicit container stack (§9 design note): replaces the original's
//! open-coded `parentsStack []SuperProp` of dynamically-typed maps with a
//! small typed enum, so pushing/popping nested object and array values has
//! one place that knows how a finished child gets written into its parent.

use crate::model::{PropertyMap, Value};

/// Where a container's finished value is written once it closes.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Write under this key in whatever the parent turns out to be (the
    /// next container down the stack, or `scratch` if the stack empties).
    Key(String),
    /// Push onto the parent array (next container down the stack, or the
    /// root array accumulator for a multi-line `var x = [` declaration).
    Append,
    /// The root array accumulator for a multi-line variable array
    /// declaration (`var x = [ ... ]`) — finalizes the variable itself
    /// rather than writing into any parent.
    VariableArrayRoot,
    /// The `@allowed([ ... ])` payload accumulator — finalizes into
    /// `pending_decorators.allowed` rather than any element's body.
    DecoratorAllowed,
}

/// One entry on the open-container stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Object { slot: Slot, map: PropertyMap },
    Array { slot: Slot, items: Vec<Value> },
}

impl Container {
    pub fn slot(&self) -> &Slot {
        match self {
            Container::Object { slot, .. } => slot,
            Container::Array { slot, .. } => slot,
        }
    }

    /// Converts a finished container into the `Value` it represents.
    pub fn into_value(self) -> Value {
        match self {
            Container::Object { map, .. } => Value::Object(map),
            Container::Array { items, .. } => Value::Array(items),
        }
    }

    /// Inserts a key/value pair, valid only when this container is an
    /// object — properties never target an open array directly.
    pub fn insert(&mut self, key: String, value: Value) {
        match self {
            Container::Object { map, .. } => {
                map.insert(key, value);
            }
            Container::Array { .. } => {
                tracing::warn!("dropping property {key:?} assigned inside an open array");
            }
        }
    }

    /// Appends a value, valid only when this container is an array.
    pub fn push(&mut self, value: Value) {
        match self {
            Container::Array { items, .. } => items.push(value),
            Container::Object { .. } => {
                tracing::warn!("dropping array element assigned inside an open object");
            }
        }
    }

    /// Places a finished child container's value into `self`, per the
    /// child's own slot.
    pub fn place(&mut self, slot: Slot, value: Value) {
        match slot {
            Slot::Key(key) => self.insert(key, value),
            Slot::Append => self.push(value),
            Slot::VariableArrayRoot | Slot::DecoratorAllowed => {
                tracing::warn!("root-level container slot reached a non-root parent; dropping value");
            }
        }
    }
}
