//! The Block Parser (§4.2): drives the classified lines through an explicit
//! container stack, assembling `Element`s. Grounded on
//! `parserBicepFile()` in the original Go source, restructured per §9 into
//! a classifier/driver/`Container` split instead of one function mutating a
//! bag of loosely-typed locals.

use indexmap::IndexSet;

use crate::coerce::coerce_value;
use crate::container::{Container, Slot};
use crate::lexer::{classify, LineKind};
use crate::model::{DecoratorName, DecoratorSet, Element, PropertyMap, Value};

/// The declaration currently being assembled at nesting-depth zero. Variable
/// declarations come in two flavors: object bodies (buffered in `scratch`)
/// and array bodies (buffered as a real `Container` on the stack, since an
/// array accumulator isn't `scratch`-shaped).
#[derive(Debug, Clone)]
enum CurrentRoot {
    Resource { type_name: String, api_version: String, decorators: DecoratorSet },
    Variable { name: String, is_array: bool },
}

/// Parser state for a single call (§5: constructed fresh, never shared).
#[derive(Debug, Default)]
pub struct ParseContext {
    elements: Vec<Element>,
    container_stack: Vec<Container>,
    pending_decorators: DecoratorSet,
    current_root: Option<CurrentRoot>,
    scratch: PropertyMap,
    known_params: IndexSet<String>,
}

impl ParseContext {
    fn coerce(&self, raw: &str) -> Value {
        coerce_value(raw, &self.known_params)
    }

    /// Writes a property into whatever is topmost: an open nested
    /// container, or `scratch` if none is open.
    fn insert_property(&mut self, key: String, value: Value) {
        match self.container_stack.last_mut() {
            Some(top) => top.insert(key, value),
            None => {
                self.scratch.insert(key, value);
            }
        }
    }

    /// A line matched `key: {` or `key: [` — push a nested container bound
    /// to that key, or (for the anonymous `{`/`[` the lexer reports as
    /// `OpenObject`/`OpenArray`) bound to `Append` when the enclosing
    /// container is itself an array.
    fn open_nested(&mut self, slot: Slot, is_array: bool) {
        if is_array {
            self.container_stack.push(Container::Array { slot, items: Vec::new() });
        } else {
            self.container_stack.push(Container::Object { slot, map: PropertyMap::new() });
        }
    }

    fn anonymous_slot(&self) -> Slot {
        match self.container_stack.last() {
            Some(Container::Array { .. }) => Slot::Append,
            _ => {
                tracing::debug!("anonymous container open with no enclosing array; value will be dropped on close");
                Slot::Append
            }
        }
    }

    fn close_object(&mut self) {
        if self.container_stack.is_empty() {
            self.finalize_root_object();
            return;
        }
        let finished = self.container_stack.pop().unwrap();
        let slot = finished.slot().clone();
        let value = finished.into_value();
        match self.container_stack.last_mut() {
            Some(parent) => parent.place(slot, value),
            None => self.place_into_scratch(slot, value),
        }
    }

    fn close_array(&mut self) {
        if let Some(Container::Array { slot: Slot::VariableArrayRoot, .. }) = self.container_stack.last() {
            if self.container_stack.len() == 1 {
                let finished = self.container_stack.pop().unwrap();
                let items = match finished {
                    Container::Array { items, .. } => items,
                    _ => unreachable!(),
                };
                self.finalize_variable_array(items);
                return;
            }
        }
        if let Some(Container::Array { slot: Slot::DecoratorAllowed, .. }) = self.container_stack.last() {
            if self.container_stack.len() == 1 {
                let finished = self.container_stack.pop().unwrap();
                let items = match finished {
                    Container::Array { items, .. } => items,
                    _ => unreachable!(),
                };
                self.pending_decorators.allowed = Some(items);
                return;
            }
        }
        if self.container_stack.is_empty() {
            tracing::warn!("unmatched array close with no open container; skipping");
            return;
        }
        let finished = self.container_stack.pop().unwrap();
        let slot = finished.slot().clone();
        let value = finished.into_value();
        match self.container_stack.last_mut() {
            Some(parent) => parent.place(slot, value),
            None => self.place_into_scratch(slot, value),
        }
    }

    fn place_into_scratch(&mut self, slot: Slot, value: Value) {
        match slot {
            Slot::Key(key) => {
                self.scratch.insert(key, value);
            }
            _ => {
                tracing::warn!("nested container closed to an empty stack without a key; dropping value");
            }
        }
    }

    fn finalize_root_object(&mut self) {
        let Some(root) = self.current_root.take() else {
            tracing::warn!("unmatched object close with no declaration open; skipping");
            return;
        };
        let properties = std::mem::take(&mut self.scratch);
        match root {
            CurrentRoot::Resource { type_name, api_version, decorators } => {
                self.elements.push(Element::Resource { type_name, api_version, properties, decorators });
            }
            CurrentRoot::Variable { name, is_array: false } => {
                self.elements.push(Element::Variable { name, is_array: false, value: None, properties: Some(properties) });
            }
            CurrentRoot::Variable { name, is_array: true } => {
                tracing::warn!("variable {name} opened as an array but closed as an object; discarding");
            }
        }
        self.pending_decorators = DecoratorSet::default();
    }

    fn finalize_variable_array(&mut self, items: Vec<Value>) {
        let Some(CurrentRoot::Variable { name, is_array: true }) = self.current_root.take() else {
            tracing::warn!("array close finalized with no matching array variable open; skipping");
            return;
        };
        let mut properties = PropertyMap::new();
        properties.insert("values".to_string(), Value::Array(items));
        self.elements.push(Element::Variable { name, is_array: true, value: None, properties: Some(properties) });
        self.pending_decorators = DecoratorSet::default();
    }

    fn apply_decorator_kv(&mut self, name: &str, raw_value: String) {
        match DecoratorName::recognize(name) {
            Some(DecoratorName::Description) => self.pending_decorators.description = Some(raw_value),
            Some(DecoratorName::MaxLength) => self.pending_decorators.max_length = Some(raw_value),
            Some(DecoratorName::MinLength) => self.pending_decorators.min_length = Some(raw_value),
            Some(DecoratorName::MaxValue) => self.pending_decorators.max_value = Some(raw_value),
            Some(DecoratorName::MinValue) => self.pending_decorators.min_value = Some(raw_value),
            _ => tracing::debug!("ignoring unrecognized decorator @{name}"),
        }
    }

    fn process_line(&mut self, raw_line: &str) {
        match classify(raw_line) {
            LineKind::Blank => {}
            LineKind::TargetScope { value } => {
                self.elements.push(Element::TargetScope { value });
                self.pending_decorators = DecoratorSet::default();
            }
            LineKind::Metadata { name, description } => {
                self.elements.push(Element::Metadata { name, description });
                self.pending_decorators = DecoratorSet::default();
            }
            LineKind::DecoratorSecure => self.pending_decorators.secure = true,
            LineKind::DecoratorAllowedOpen => {
                self.container_stack.push(Container::Array { slot: Slot::DecoratorAllowed, items: Vec::new() });
            }
            LineKind::DecoratorAllowedInline { raw_items } => {
                let items = split_top_level_commas(&raw_items).into_iter().map(|v| self.coerce(&v)).collect();
                self.pending_decorators.allowed = Some(items);
            }
            LineKind::DecoratorKv { name, raw_value } => self.apply_decorator_kv(&name, raw_value),
            LineKind::VarObjectOpen { name } => {
                self.scratch.clear();
                self.current_root = Some(CurrentRoot::Variable { name, is_array: false });
            }
            LineKind::VarArrayOpen { name } => {
                self.current_root = Some(CurrentRoot::Variable { name, is_array: true });
                self.container_stack.push(Container::Array { slot: Slot::VariableArrayRoot, items: Vec::new() });
            }
            LineKind::VarSingle { name, raw_value } => {
                let value = self.coerce(&raw_value);
                self.elements.push(Element::Variable { name, is_array: false, value: Some(value), properties: None });
                // `var`s carry no `decorators` field in the `Element` model, so any
                // accumulated decorators are stray and must be discarded here rather
                // than left to leak onto whatever declaration comes next.
                self.pending_decorators = DecoratorSet::default();
            }
            LineKind::Resource { type_name, api_version, .. } => {
                self.scratch.clear();
                let decorators = std::mem::take(&mut self.pending_decorators);
                self.current_root = Some(CurrentRoot::Resource { type_name, api_version, decorators });
            }
            LineKind::Param { name, type_name, raw_value } => {
                let default_value = self.coerce(&raw_value);
                let decorators = std::mem::take(&mut self.pending_decorators);
                self.known_params.insert(name.clone());
                self.elements.push(Element::Param { name, type_name, default_value, decorators });
            }
            LineKind::Output { name, type_name, raw_value } => {
                let value = self.coerce(&raw_value);
                let decorators = std::mem::take(&mut self.pending_decorators);
                self.elements.push(Element::Output { name, type_name, value, decorators });
            }
            LineKind::Property { key, raw_value } => {
                if raw_value == "{" {
                    self.open_nested(Slot::Key(key), false);
                } else if raw_value == "[" {
                    self.open_nested(Slot::Key(key), true);
                } else {
                    let value = self.coerce(&raw_value);
                    self.insert_property(key, value);
                }
            }
            LineKind::InlineArrayProperty { key, raw_items } => {
                let items = split_top_level_commas(&raw_items).into_iter().map(|v| self.coerce(&v)).collect();
                self.insert_property(key, Value::Array(items));
            }
            LineKind::OpenObject => {
                let slot = self.anonymous_slot();
                self.open_nested(slot, false);
            }
            LineKind::OpenArray => {
                let slot = self.anonymous_slot();
                self.open_nested(slot, true);
            }
            LineKind::CloseObject => self.close_object(),
            LineKind::CloseArray => self.close_array(),
            LineKind::CloseParen => {}
            LineKind::Other { raw } => {
                if let Some(top) = self.container_stack.last_mut() {
                    if matches!(top, Container::Array { .. }) {
                        let value = coerce_value(strip_leading_dash(&raw), &self.known_params);
                        top.push(value);
                        return;
                    }
                }
                tracing::warn!("skipping unrecognized line: {raw:?}");
            }
        }
    }
}

/// Strips a bare array element line down to the value `coerce_value`
/// expects (a leading `'` wrapping a scalar has no other punctuation to
/// remove, so this is effectively the identity — kept as its own function
/// since the original's `arrayElementRegex` is a distinct step).
fn strip_leading_dash(s: &str) -> &str {
    s.trim()
}

/// Splits a single-line comma-separated list, respecting that each element
/// here is a simple coercible token (no nested commas inside braces — those
/// go through the multi-line container path instead).
fn split_top_level_commas(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parses a full Bicep source document (already split into lines) into its
/// sequence of top-level `Element`s.
pub fn parse_elements(lines: &[String]) -> Vec<Element> {
    let mut ctx = ParseContext::default();
    for line in lines {
        ctx.process_line(line);
    }
    ctx.elements
}
