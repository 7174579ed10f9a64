//! Action records and the reserved action-type registry.
//!
//! An action is a plain record carrying a `"type"` entry that is not
//! undefined. The store reserves the `@@fluxion` namespace for its own
//! lifecycle signaling; reducers must pass every type in that namespace
//! through untouched.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::value::Value;

/// Dispatched exactly once, by the store creator, so every reducer yields
/// its initial slice state.
pub const INIT: &str = "@@fluxion/INIT";

/// Dispatched exactly once by `replace_reducer`, so the new composition can
/// seed slices the previous reducer did not know about.
pub const REPLACE: &str = "@@fluxion/REPLACE";

/// A freshly randomized reserved type, new on every call. The combiner
/// probes each slice reducer with one of these to verify it returns its
/// current state for types it does not recognize.
pub fn probe_unknown_action() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("@@fluxion/PROBE_UNKNOWN_ACTION.{token}")
}

/// Build a minimal action record: `{ "type": kind }`.
pub fn action(kind: impl Into<String>) -> Value {
    Value::record([("type", Value::Str(kind.into()))])
}

/// Build an action record with extra entries alongside `"type"`.
pub fn action_with<K: Into<String>>(
    kind: impl Into<String>,
    entries: impl IntoIterator<Item = (K, Value)>,
) -> Value {
    let mut pairs: Vec<(String, Value)> = entries
        .into_iter()
        .map(|(k, v)| (k.into(), v))
        .collect();
    pairs.push((String::from("type"), Value::Str(kind.into())));
    Value::record(pairs)
}

/// The action's `"type"` entry, treating an undefined entry as absent.
pub fn action_type(action: &Value) -> Option<&Value> {
    match action.get("type") {
        None | Some(Value::Undefined) => None,
        defined => defined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_builds_a_typed_record() {
        let a = action("INCREMENT");
        assert!(a.is_plain_record());
        assert_eq!(action_type(&a), Some(&Value::from("INCREMENT")));
    }

    #[test]
    fn action_with_keeps_extra_entries() {
        let a = action_with("ADD", [("amount", Value::Int(5))]);
        assert_eq!(action_type(&a), Some(&Value::from("ADD")));
        assert_eq!(a.get("amount"), Some(&Value::Int(5)));
    }

    #[test]
    fn undefined_type_counts_as_absent() {
        let a = Value::record([("type", Value::Undefined)]);
        assert_eq!(action_type(&a), None);
        assert_eq!(action_type(&Value::record([("other", Value::Int(1))])), None);
    }

    #[test]
    fn probe_types_are_reserved_and_unique() {
        let first = probe_unknown_action();
        let second = probe_unknown_action();
        assert!(first.starts_with("@@fluxion/PROBE_UNKNOWN_ACTION"));
        assert_ne!(first, second);
    }
}
