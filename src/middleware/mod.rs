//! The middleware pipeline around dispatch.
//!
//! ```text
//! dispatch(action) → m₁ → m₂ → … → mₙ → base dispatch
//!            return ←    ←    ← … ←    ←
//! ```
//!
//! A middleware is a curried triplet `api → next → action → result`. During
//! setup it receives the restricted [`MiddlewareApi`] and returns the layer
//! that will wrap the next dispatch in line. Layers run left to right on
//! the way in and unwind in reverse; any layer may short-circuit,
//! transform, or forward. The `dispatch` on the API is a trampoline: a
//! middleware may capture the API during setup, but calls through it always
//! reach the fully assembled chain — and until that chain exists, it
//! refuses, which makes a setup-phase dispatch fail store construction.

use std::cell::RefCell;
use std::rc::Rc;

use crate::compose::{compose, Composable};
use crate::error::StoreError;
use crate::store::{DispatchFn, Enhancer, StoreCreator};
use crate::value::Value;

mod logging;
mod thunk;

pub use logging::logger;
pub use thunk::thunk;

/// The restricted store surface handed to middleware at setup time.
#[derive(Clone)]
pub struct MiddlewareApi {
    dispatch_cell: Rc<RefCell<DispatchFn>>,
    state_reader: Rc<dyn Fn() -> Result<Value, StoreError>>,
}

impl MiddlewareApi {
    /// Dispatch through the whole chain, from the top. During middleware
    /// setup this refuses with [`StoreError::MiddlewareSetupDispatch`].
    pub fn dispatch(&self, action_value: Value) -> Result<Value, StoreError> {
        let dispatch = Rc::clone(&*self.dispatch_cell.borrow());
        dispatch(action_value)
    }

    pub fn get_state(&self) -> Result<Value, StoreError> {
        (self.state_reader)()
    }
}

/// One assembled layer: wraps the next dispatch in line.
pub type MiddlewareLayer = Composable<DispatchFn>;

/// A middleware: produces its layer from the restricted API. A setup-phase
/// error (such as the trampoline's setup trap) aborts store construction.
pub type Middleware = Rc<dyn Fn(&MiddlewareApi) -> Result<MiddlewareLayer, StoreError>>;

/// Wrap a closure as a [`Middleware`].
pub fn middleware(
    f: impl Fn(&MiddlewareApi) -> Result<MiddlewareLayer, StoreError> + 'static,
) -> Middleware {
    Rc::new(f)
}

/// Build an enhancer that threads every dispatch through the given
/// middlewares, in order.
pub fn apply_middleware(middlewares: Vec<Middleware>) -> Enhancer {
    Box::new(move |create: StoreCreator| -> StoreCreator {
        let middlewares = middlewares.clone();
        Rc::new(move |reducer, preloaded_state| {
            let store = create(reducer, preloaded_state)?;

            let setup_trap: DispatchFn = Rc::new(|_| Err(StoreError::MiddlewareSetupDispatch));
            let dispatch_cell = Rc::new(RefCell::new(setup_trap));
            let api = MiddlewareApi {
                dispatch_cell: Rc::clone(&dispatch_cell),
                state_reader: {
                    let store = store.clone();
                    Rc::new(move || store.get_state())
                },
            };

            let chain = middlewares
                .iter()
                .map(|build| build(&api))
                .collect::<Result<Vec<MiddlewareLayer>, StoreError>>()?;
            let dispatch = compose(chain)(store.dispatcher());
            // Retarget the trampoline now that the chain exists.
            *dispatch_cell.borrow_mut() = Rc::clone(&dispatch);

            Ok(store.with_dispatch(dispatch))
        })
    })
}
