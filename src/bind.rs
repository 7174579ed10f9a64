//! Binding action creators to a dispatch function.
//!
//! An action creator is a plain function producing an action record. Bound
//! creators dispatch whatever they produce, so callers that should not hold
//! the store — child components, adapters — can fire actions directly.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::StoreError;
use crate::store::DispatchFn;
use crate::value::Value;

/// A function from creator arguments to an action record.
pub type ActionCreator = Rc<dyn Fn(Vec<Value>) -> Value>;

/// An action creator whose result is dispatched on call.
pub type BoundActionCreator = Rc<dyn Fn(Vec<Value>) -> Result<Value, StoreError>>;

/// Bind one creator: calling the result builds the action and dispatches
/// it, returning what dispatch returns.
pub fn bind_action_creator(creator: ActionCreator, dispatch: DispatchFn) -> BoundActionCreator {
    Rc::new(move |args| dispatch(creator(args)))
}

/// Bind a whole map of creators, preserving its shape.
pub fn bind_action_creators(
    creators: BTreeMap<String, ActionCreator>,
    dispatch: DispatchFn,
) -> BTreeMap<String, BoundActionCreator> {
    creators
        .into_iter()
        .map(|(name, creator)| (name, bind_action_creator(creator, Rc::clone(&dispatch))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{action, action_type, action_with};
    use crate::reducer::reducer;
    use crate::store::create_store;

    #[test]
    fn bound_creator_dispatches_its_action() {
        let counting = reducer(|state, action_value| {
            let count = state.as_int().unwrap_or(0);
            let step = action_value.get("amount").and_then(Value::as_int).unwrap_or(0);
            Ok(match action_type(action_value).and_then(Value::as_str) {
                Some("ADD") => Value::Int(count + step),
                _ => Value::Int(count),
            })
        });
        let store = create_store(counting, None, None).unwrap();

        let add: ActionCreator = Rc::new(|args| {
            let amount = args.first().cloned().unwrap_or(Value::Int(1));
            action_with("ADD", [("amount", amount)])
        });
        let bound = bind_action_creator(add, store.dispatcher());

        bound(vec![Value::Int(5)]).unwrap();
        bound(vec![Value::Int(2)]).unwrap();
        assert_eq!(store.get_state().unwrap(), Value::Int(7));
    }

    #[test]
    fn binding_a_map_preserves_its_shape() {
        let counting = reducer(|state, action_value| {
            let count = state.as_int().unwrap_or(0);
            Ok(match action_type(action_value).and_then(Value::as_str) {
                Some("+") => Value::Int(count + 1),
                Some("-") => Value::Int(count - 1),
                _ => Value::Int(count),
            })
        });
        let store = create_store(counting, None, None).unwrap();

        let mut creators: BTreeMap<String, ActionCreator> = BTreeMap::new();
        creators.insert(String::from("increment"), Rc::new(|_| action("+")));
        creators.insert(String::from("decrement"), Rc::new(|_| action("-")));

        let bound = bind_action_creators(creators, store.dispatcher());
        assert_eq!(bound.len(), 2);

        bound["increment"](Vec::new()).unwrap();
        bound["increment"](Vec::new()).unwrap();
        bound["decrement"](Vec::new()).unwrap();
        assert_eq!(store.get_state().unwrap(), Value::Int(1));
    }
}
