//! Reducers and the slice combiner.
//!
//! A reducer is a pure transition function `(previous_state, action) ->
//! next_state`, receiving undefined in place of state it has never produced.
//! `combine_reducers` folds a mapping of slice name to reducer into one
//! reducer over a record-shaped state, preserving the reference of the
//! previous state whenever no slice changed.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::action::{action, action_type, probe_unknown_action, INIT, REPLACE};
use crate::error::StoreError;
use crate::value::Value;

/// A pure state transition function.
pub type Reducer = Rc<dyn Fn(&Value, &Value) -> Result<Value, StoreError>>;

/// Wrap a closure as a [`Reducer`].
pub fn reducer(
    f: impl Fn(&Value, &Value) -> Result<Value, StoreError> + 'static,
) -> Reducer {
    Rc::new(f)
}

/// Fold slice reducers into a single reducer over a record-shaped state.
///
/// Slices are visited in the order given. At combine time every slice
/// reducer is probed — once with the init action and once with a freshly
/// randomized reserved type, both against undefined state; a reducer that
/// yields undefined for either poisons the combined reducer, which then
/// fails with the captured error on every call until rebuilt.
///
/// When every slice reducer returns its input unchanged, the combined
/// reducer returns the previous state value itself, so downstream identity
/// checks keep short-circuiting.
pub fn combine_reducers<K, I>(reducers: I) -> Reducer
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Reducer)>,
{
    let slices: Vec<(String, Reducer)> = reducers
        .into_iter()
        .map(|(key, slice_reducer)| (key.into(), slice_reducer))
        .collect();
    let shape_error = assert_reducer_shape(&slices).err();
    let warned = RefCell::new(HashSet::new());

    Rc::new(move |state: &Value, action_value: &Value| {
        if let Some(error) = &shape_error {
            return Err(error.clone());
        }

        if cfg!(debug_assertions) {
            warn_on_unexpected_shape(&slices, state, action_value, &warned);
        }

        let (previous, state_was_record) = match state {
            Value::Record(map) => (Rc::clone(map), true),
            _ => (Rc::new(BTreeMap::new()), false),
        };

        let mut next = BTreeMap::new();
        let mut has_changed = false;
        for (key, slice_reducer) in slices.iter() {
            let previous_slice = previous.get(key).cloned().unwrap_or(Value::Undefined);
            let next_slice = slice_reducer(&previous_slice, action_value)?;
            if next_slice.is_undefined() {
                return Err(StoreError::SliceReturnedUndefined {
                    key: key.clone(),
                    action_type: describe_action_type(action_value),
                });
            }
            has_changed = has_changed || !next_slice.identical(&previous_slice);
            next.insert(key.clone(), next_slice);
        }
        has_changed = has_changed || slices.len() != previous.len();

        if has_changed || !state_was_record {
            Ok(Value::Record(Rc::new(next)))
        } else {
            Ok(state.clone())
        }
    })
}

/// Probe every slice reducer for the two undefined-return failure modes.
fn assert_reducer_shape(slices: &[(String, Reducer)]) -> Result<(), StoreError> {
    for (key, slice_reducer) in slices {
        let initial = slice_reducer(&Value::Undefined, &action(INIT))?;
        if initial.is_undefined() {
            return Err(StoreError::UninitializedSlice { key: key.clone() });
        }
        let probed = slice_reducer(&Value::Undefined, &action(probe_unknown_action()))?;
        if probed.is_undefined() {
            return Err(StoreError::UnknownActionUnhandled { key: key.clone() });
        }
    }
    Ok(())
}

fn describe_action_type(action_value: &Value) -> String {
    match action_type(action_value) {
        Some(kind) => kind.to_string(),
        None => String::from("undefined"),
    }
}

/// Debug-build diagnostics for state that does not match the reducer map.
/// Each warning fires once per cause. Unexpected keys are always recorded
/// in the cache; the replace action only suppresses the message, so a key
/// first seen while replacing stays silenced on later dispatches too.
fn warn_on_unexpected_shape(
    slices: &[(String, Reducer)],
    state: &Value,
    action_value: &Value,
    warned: &RefCell<HashSet<String>>,
) {
    if slices.is_empty() {
        if warned.borrow_mut().insert(String::from("@no-reducers")) {
            log::warn!(
                "the store does not have a valid reducer: combine_reducers was called with no slice reducers"
            );
        }
        return;
    }

    let map = match state {
        Value::Record(map) => map,
        Value::Undefined => return,
        other => {
            if warned.borrow_mut().insert(String::from("@state-shape")) {
                log::warn!(
                    "expected the state given to the combined reducer to be a record, got {}",
                    other.kind()
                );
            }
            return;
        }
    };

    let replacing =
        matches!(action_type(action_value), Some(Value::Str(kind)) if kind == REPLACE);

    for key in map.keys() {
        let known = slices.iter().any(|(slice_key, _)| slice_key == key);
        if !known && warned.borrow_mut().insert(key.clone()) && !replacing {
            log::warn!(
                "unexpected key {key:?} in the state record; it does not match any slice reducer and will be discarded"
            );
        }
    }
}
