//! Thunk middleware: callable payloads.
//!
//! With this middleware installed, dispatching a [`Value::Function`] runs
//! the function with the restricted store API instead of forwarding it, and
//! the dispatch call returns whatever the function returns. This is the
//! extensibility point for deferred and conditional dispatch; the base
//! dispatch itself accepts nothing but plain records.

use std::rc::Rc;

use crate::middleware::{middleware, Middleware, MiddlewareLayer};
use crate::value::Value;

/// Intercept function payloads; forward everything else unchanged.
pub fn thunk() -> Middleware {
    middleware(|api| {
        let api = api.clone();
        let layer: MiddlewareLayer = Box::new(move |next| {
            let api = api.clone();
            Rc::new(move |action_value| match action_value {
                Value::Function(run) => run(&api),
                other => next(other),
            })
        });
        Ok(layer)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{action, action_type};
    use crate::middleware::apply_middleware;
    use crate::reducer::reducer;
    use crate::store::create_store;

    #[test]
    fn thunks_can_read_state_and_dispatch_conditionally() {
        let counting = reducer(|state, action_value| {
            let count = state.as_int().unwrap_or(0);
            Ok(match action_type(action_value).and_then(Value::as_str) {
                Some("+") => Value::Int(count + 1),
                _ => Value::Int(count),
            })
        });

        let store =
            create_store(counting, None, Some(apply_middleware(vec![thunk()]))).unwrap();

        let bump_to_two = Value::function(|api| {
            while api.get_state()?.as_int().unwrap_or(0) < 2 {
                api.dispatch(action("+"))?;
            }
            api.get_state()
        });

        assert_eq!(store.dispatch(bump_to_two).unwrap(), Value::Int(2));
        assert_eq!(store.get_state().unwrap(), Value::Int(2));
    }

    #[test]
    fn plain_records_flow_past_the_thunk() {
        let counting = reducer(|state, action_value| {
            let count = state.as_int().unwrap_or(0);
            Ok(match action_type(action_value).and_then(Value::as_str) {
                Some("+") => Value::Int(count + 1),
                _ => Value::Int(count),
            })
        });

        let store =
            create_store(counting, None, Some(apply_middleware(vec![thunk()]))).unwrap();
        store.dispatch(action("+")).unwrap();
        assert_eq!(store.get_state().unwrap(), Value::Int(1));
    }
}
