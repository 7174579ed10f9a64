//! # fluxion
//!
//! A predictable state container: one object holds the entire application
//! state tree, every change funnels through a pure reducer via a strict
//! dispatch protocol, and subscribers are notified after each committed
//! transition.
//!
//! ## Dispatch-Based Architecture
//!
//! ```text
//! dispatch(action) ── middleware chain ── base dispatch ── reducer ── state
//!                                                               │
//!                                     listeners ◄── snapshot ◄──┘
//! ```
//!
//! State and actions are dynamic [`Value`] trees. The base dispatch accepts
//! only plain action records with a defined `"type"`; everything else is a
//! contract violation unless a middleware — such as [`thunk`] — translates
//! it first. Store construction can be wrapped by composable enhancers, of
//! which [`apply_middleware`] is the canonical one.
//!
//! The store is single-threaded and cooperative. Re-entrancy is the only
//! concurrency concern and follows one rule: nothing may call back into the
//! store while the reducer runs, and subscription changes made inside a
//! listener take effect on the next dispatch.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fluxion::{action, action_type, create_store, reducer, Value};
//!
//! let counter = reducer(|state, action| {
//!     let count = state.as_int().unwrap_or(0);
//!     Ok(match action_type(action).and_then(Value::as_str) {
//!         Some("+") => Value::Int(count + 1),
//!         Some("-") => Value::Int(count - 1),
//!         _ if state.is_undefined() => Value::Int(0),
//!         _ => state.clone(),
//!     })
//! });
//!
//! let store = create_store(counter, None, None)?;
//! let subscription = store.subscribe(|| println!("changed"))?;
//! store.dispatch(action("+"))?;
//! assert_eq!(store.get_state()?, Value::Int(1));
//! subscription.unsubscribe()?;
//! ```

mod action;
mod bind;
mod compose;
mod error;
mod middleware;
mod reducer;
mod store;
mod value;

pub use action::{action, action_type, action_with, probe_unknown_action, INIT, REPLACE};
pub use bind::{bind_action_creator, bind_action_creators, ActionCreator, BoundActionCreator};
pub use compose::{compose, Composable};
pub use error::StoreError;
pub use middleware::{
    apply_middleware, logger, middleware, thunk, Middleware, MiddlewareApi, MiddlewareLayer,
};
pub use reducer::{combine_reducers, reducer, Reducer};
pub use store::{
    create_store, DispatchFn, Enhancer, Listener, Observer, StateObservable, Store, StoreCreator,
    Subscription,
};
pub use value::{ThunkFn, Value};
