//! References: handles to document locations that may not exist yet.
//!
//! A [`Reference`] is how the evaluator talks about a place in the document
//! rather than a value. It records the navigation steps taken from its
//! anchor together with a snapshot of the value reached so far, so it can
//! keep descending through branches that are missing, answer reads, and on
//! assignment create exactly the containers the recorded path needs.
//!
//! Plain descent never mutates anything; missing branches stay missing
//! until a [`Reference::set`] call materializes them.

use crate::evaluator::EvalError;
use crate::value::Value;
use indexmap::IndexMap;

/// One recorded navigation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Mapping entry by key
    Key(String),
    /// Sequence element by index
    Index(usize),
}

/// The value a reference currently points at, if it exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The path does not (yet) lead to a value
    Absent,
    /// A snapshot of the value at the path
    Present(Value),
}

/// Where a reference chain is anchored.
///
/// Only root-anchored references can be written through; a detached
/// reference navigates a plain value that has no place in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    Root,
    Detached,
}

/// A possibly-unresolved handle to a location in the document.
///
/// References are value-typed snapshots: cloning one copies its recorded
/// path, so descending a clone never affects the original. The recorded
/// steps hold keys and indices only; writes re-walk the live document from
/// the root, which keeps the snapshot free of aliasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    anchor: Anchor,
    steps: Vec<Step>,
    current: Resolved,
}

impl Reference {
    /// A reference standing at the document root.
    pub fn to_root(root: &Value) -> Self {
        Reference {
            anchor: Anchor::Root,
            steps: Vec::new(),
            current: Resolved::Present(root.clone()),
        }
    }

    /// A reference over a plain value with no document location.
    pub fn detached(value: Value) -> Self {
        Reference {
            anchor: Anchor::Detached,
            steps: Vec::new(),
            current: Resolved::Present(value),
        }
    }

    /// The value reached so far, or absence.
    pub fn current(&self) -> &Resolved {
        &self.current
    }

    /// Collapse to a plain value. An absent location reads as null.
    pub fn resolve(&self) -> Value {
        match &self.current {
            Resolved::Present(value) => value.clone(),
            Resolved::Absent => Value::Null,
        }
    }

    /// Take one navigation step.
    ///
    /// Descending from an absent location stays absent, which is what lets
    /// a reference describe a path that does not exist yet. Descending with
    /// a key into a present non-mapping, or with an index into a present
    /// non-sequence, is an error.
    pub fn descend(&mut self, step: Step) -> Result<(), EvalError> {
        let next = match (&self.current, &step) {
            (Resolved::Absent, _) => Resolved::Absent,
            (Resolved::Present(Value::Mapping(entries)), Step::Key(key)) => {
                match entries.get(key) {
                    Some(value) => Resolved::Present(value.clone()),
                    None => Resolved::Absent,
                }
            }
            (Resolved::Present(Value::Sequence(items)), Step::Index(index)) => {
                match items.get(*index) {
                    Some(value) => Resolved::Present(value.clone()),
                    None => Resolved::Absent,
                }
            }
            (Resolved::Present(other), Step::Key(key)) => {
                return Err(EvalError::TypeError(format!(
                    "cannot look up key '{}' in {}",
                    key,
                    other.type_name()
                )))
            }
            (Resolved::Present(other), Step::Index(index)) => {
                return Err(EvalError::TypeError(format!(
                    "cannot index [{}] into {}",
                    index,
                    other.type_name()
                )))
            }
        };
        self.steps.push(step);
        self.current = next;
        Ok(())
    }

    /// Write `value` at this reference's location in `root`, creating any
    /// missing ancestor containers first.
    ///
    /// Materialization is two-phase: walk the recorded steps from the root,
    /// filling each missing slot with an empty container whose kind matches
    /// the step that will descend into it, then perform the one final
    /// assignment under the last parent. Existing values along the path are
    /// never replaced, only entered; a kind mismatch against an existing
    /// value aborts before anything has been created, leaving the document
    /// unchanged.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), EvalError> {
        if self.anchor == Anchor::Detached {
            return Err(EvalError::UnsupportedAssignment(
                "target is detached from the document".to_string(),
            ));
        }
        let Some((last, ancestors)) = self.steps.split_last() else {
            return Err(EvalError::UnsupportedAssignment(
                "target is the document root itself".to_string(),
            ));
        };

        let mut parent: &mut Value = root;
        for (i, step) in ancestors.iter().enumerate() {
            // steps[i + 1] always exists: `last` was split off the end
            parent = enter(parent, step, &self.steps[i + 1])?;
        }
        place(parent, last, value)
    }
}

/// Descend one step for writing, creating the slot if it is missing.
///
/// A freshly created container's kind comes from `following`, the step
/// that will be taken inside it.
fn enter<'a>(
    parent: &'a mut Value,
    step: &Step,
    following: &Step,
) -> Result<&'a mut Value, EvalError> {
    match (parent, step) {
        (Value::Mapping(entries), Step::Key(key)) => Ok(entries
            .entry(key.clone())
            .or_insert_with(|| empty_container(following))),
        (Value::Sequence(items), Step::Index(index)) => {
            while items.len() < *index {
                items.push(Value::Null);
            }
            if items.len() == *index {
                items.push(empty_container(following));
            }
            Ok(&mut items[*index])
        }
        (other, Step::Key(key)) => Err(EvalError::TypeError(format!(
            "cannot create key '{}' in {}",
            key,
            other.type_name()
        ))),
        (other, Step::Index(index)) => Err(EvalError::TypeError(format!(
            "cannot create index [{}] in {}",
            index,
            other.type_name()
        ))),
    }
}

/// The single final assignment under the last recorded parent.
fn place(parent: &mut Value, step: &Step, value: Value) -> Result<(), EvalError> {
    match (parent, step) {
        (Value::Mapping(entries), Step::Key(key)) => {
            entries.insert(key.clone(), value);
            Ok(())
        }
        (Value::Sequence(items), Step::Index(index)) => {
            while items.len() < *index {
                items.push(Value::Null);
            }
            if items.len() == *index {
                items.push(value);
            } else {
                items[*index] = value;
            }
            Ok(())
        }
        (other, Step::Key(key)) => Err(EvalError::TypeError(format!(
            "cannot assign key '{}' in {}",
            key,
            other.type_name()
        ))),
        (other, Step::Index(index)) => Err(EvalError::TypeError(format!(
            "cannot assign index [{}] in {}",
            index,
            other.type_name()
        ))),
    }
}

fn empty_container(step: &Step) -> Value {
    match step {
        Step::Key(_) => Value::Mapping(IndexMap::new()),
        Step::Index(_) => Value::Sequence(Vec::new()),
    }
}
