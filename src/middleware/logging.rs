//! Action logging middleware.

use std::rc::Rc;

use crate::action::action_type;
use crate::middleware::{middleware, Middleware, MiddlewareLayer};

/// Logs every action passing through the pipeline, then forwards it.
///
/// Emits through the `log` facade at debug level; wire up a logger
/// implementation in the host binary to see the output.
pub fn logger() -> Middleware {
    middleware(|_api| {
        let layer: MiddlewareLayer = Box::new(|next| {
            Rc::new(move |action_value| {
                match action_type(&action_value) {
                    Some(kind) => log::debug!("action: {kind}"),
                    None => log::debug!("action: {action_value:?}"),
                }
                next(action_value)
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
    use crate::value::Value;

    #[test]
    fn logger_is_transparent() {
        let counting = reducer(|state, action_value| {
            let count = state.as_int().unwrap_or(0);
            Ok(match action_type(action_value).and_then(Value::as_str) {
                Some("+") => Value::Int(count + 1),
                _ => Value::Int(count),
            })
        });

        let store =
            create_store(counting, None, Some(apply_middleware(vec![logger()]))).unwrap();
        let sent = action("+");
        let returned = store.dispatch(sent.clone()).unwrap();
        assert_eq!(returned, sent);
        assert_eq!(store.get_state().unwrap(), Value::Int(1));
    }
}
