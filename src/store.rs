//! The store: one state tree, a strict dispatch protocol, and subscriber
//! broadcast.
//!
//! ```text
//! dispatch(action) ── middleware chain ── base dispatch ── reducer ── state
//!                                                              │
//!                                    listeners ◄── snapshot ◄──┘
//! ```
//!
//! The store is single-threaded and cooperative: every operation completes
//! before returning, and the only concurrency phenomenon is re-entrancy
//! from user code invoked by a listener. While the reducer runs, every
//! store operation is forbidden; listeners run after the state commit, and
//! subscriptions they add or remove take effect on the next dispatch, never
//! the current one.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::action::{action, action_type, INIT, REPLACE};
use crate::compose::Composable;
use crate::error::StoreError;
use crate::reducer::Reducer;
use crate::value::Value;

/// A subscriber callback, invoked with no arguments after each committed
/// dispatch.
pub type Listener = Rc<dyn Fn()>;

/// A dispatch function: the base dispatch, or the middleware-augmented one.
pub type DispatchFn = Rc<dyn Fn(Value) -> Result<Value, StoreError>>;

/// A store factory, as seen by enhancers.
pub type StoreCreator = Rc<dyn Fn(Reducer, Option<Value>) -> Result<Store, StoreError>>;

/// A higher-order store factory: wraps a creator to produce an augmented
/// one. [`crate::apply_middleware`] is the canonical enhancer; several
/// enhancers stack through [`crate::compose`], never by nesting store
/// creator arguments.
pub type Enhancer = Composable<StoreCreator>;

#[derive(Clone)]
struct ListenerEntry {
    id: u64,
    callback: Listener,
}

struct StoreInner {
    reducer: RefCell<Reducer>,
    state: RefCell<Value>,
    /// Snapshot iterated by the dispatch in flight.
    current_listeners: RefCell<Rc<Vec<ListenerEntry>>>,
    /// Where subscribe/unsubscribe land; adopted as current by the next
    /// dispatch. Equal to `current_listeners` when quiescent and copied on
    /// first mutation, so an in-flight iteration is never aliased.
    next_listeners: RefCell<Rc<Vec<ListenerEntry>>>,
    is_dispatching: Cell<bool>,
    listener_seq: Cell<u64>,
}

impl StoreInner {
    fn ensure_can_mutate_next_listeners(&self) {
        let current = self.current_listeners.borrow();
        let mut next = self.next_listeners.borrow_mut();
        if Rc::ptr_eq(&next, &current) {
            *next = Rc::new(current.as_ref().clone());
        }
    }
}

/// Clears the dispatching flag when the reducer scope exits, including by
/// error or panic, so a failed reducer cannot lock the store.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        DispatchGuard { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

fn dispatch_to_reducer(inner: &Rc<StoreInner>, action_value: Value) -> Result<Value, StoreError> {
    if !action_value.is_plain_record() {
        return Err(StoreError::NonPlainAction {
            kind: action_value.kind(),
        });
    }
    if action_type(&action_value).is_none() {
        return Err(StoreError::MissingActionType);
    }
    if inner.is_dispatching.get() {
        return Err(StoreError::ReducerExecuting {
            operation: "dispatch",
        });
    }

    let next_state = {
        let _dispatching = DispatchGuard::engage(&inner.is_dispatching);
        let current_reducer = Rc::clone(&*inner.reducer.borrow());
        let previous_state = inner.state.borrow().clone();
        current_reducer(&previous_state, &action_value)?
    };
    *inner.state.borrow_mut() = next_state;

    // Adopt the pending listener list, then walk the adopted snapshot.
    // Listeners may subscribe, unsubscribe and dispatch; all of that
    // targets the pending list or a fresh snapshot, never this one.
    let listeners = {
        let pending = Rc::clone(&*inner.next_listeners.borrow());
        *inner.current_listeners.borrow_mut() = Rc::clone(&pending);
        pending
    };
    for entry in listeners.iter() {
        (entry.callback)();
    }

    Ok(action_value)
}

/// Handle on a single subscription. Dropping it does not unsubscribe;
/// removal is explicit and idempotent.
pub struct Subscription {
    inner: Rc<StoreInner>,
    id: u64,
    subscribed: Cell<bool>,
}

impl Subscription {
    /// Remove the listener. The first call splices it out of the pending
    /// list, taking effect on the next dispatch; later calls are no-ops.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.subscribed.get() {
            return Ok(());
        }
        if self.inner.is_dispatching.get() {
            return Err(StoreError::ReducerExecuting {
                operation: "unsubscribe",
            });
        }
        self.subscribed.set(false);
        self.inner.ensure_can_mutate_next_listeners();
        let mut next = self.inner.next_listeners.borrow_mut();
        let pending = Rc::make_mut(&mut *next);
        if let Some(index) = pending.iter().position(|entry| entry.id == self.id) {
            pending.remove(index);
        }
        Ok(())
    }
}

/// The state container. Handles are cheap to clone and all refer to the
/// same store; an enhanced handle differs only in its dispatch function.
pub struct Store {
    inner: Rc<StoreInner>,
    dispatch: DispatchFn,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Store {
            inner: Rc::clone(&self.inner),
            dispatch: Rc::clone(&self.dispatch),
        }
    }
}

impl Store {
    /// The current state. Cheap — no defensive copy; record and list
    /// contents are shared. Forbidden while the reducer is executing.
    pub fn get_state(&self) -> Result<Value, StoreError> {
        if self.inner.is_dispatching.get() {
            return Err(StoreError::ReducerExecuting {
                operation: "get_state",
            });
        }
        Ok(self.inner.state.borrow().clone())
    }

    /// Dispatch an action through the installed dispatch function and
    /// return it unchanged.
    ///
    /// The base dispatch accepts only plain records with a defined
    /// `"type"`, refuses re-entry, runs the reducer, commits the new
    /// state, and then notifies the listener snapshot in registration
    /// order. A panicking listener propagates and aborts the remaining
    /// notifications; the state commit has already happened by then.
    pub fn dispatch(&self, action_value: Value) -> Result<Value, StoreError> {
        (self.dispatch)(action_value)
    }

    /// Register a change listener. Takes effect on the next dispatch when
    /// called from inside a listener. Duplicate registrations of the same
    /// closure are independent subscriptions.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Result<Subscription, StoreError> {
        if self.inner.is_dispatching.get() {
            return Err(StoreError::ReducerExecuting {
                operation: "subscribe",
            });
        }
        self.inner.ensure_can_mutate_next_listeners();
        let id = self.inner.listener_seq.get();
        self.inner.listener_seq.set(id + 1);
        {
            let mut next = self.inner.next_listeners.borrow_mut();
            Rc::make_mut(&mut *next).push(ListenerEntry {
                id,
                callback: Rc::new(listener),
            });
        }
        Ok(Subscription {
            inner: Rc::clone(&self.inner),
            id,
            subscribed: Cell::new(true),
        })
    }

    /// Swap the reducer, then dispatch the replace action so the new
    /// composition seeds any slice the old one did not produce.
    pub fn replace_reducer(&self, next_reducer: Reducer) -> Result<(), StoreError> {
        *self.inner.reducer.borrow_mut() = next_reducer;
        dispatch_to_reducer(&self.inner, action(REPLACE))?;
        Ok(())
    }

    /// The minimal push-stream bridge over this store.
    pub fn observable(&self) -> StateObservable {
        StateObservable {
            store: self.clone(),
        }
    }

    /// The installed dispatch function as a standalone value, for handing
    /// to code that should dispatch without holding the whole store.
    pub fn dispatcher(&self) -> DispatchFn {
        Rc::clone(&self.dispatch)
    }

    pub(crate) fn with_dispatch(&self, dispatch: DispatchFn) -> Store {
        Store {
            inner: Rc::clone(&self.inner),
            dispatch,
        }
    }
}

/// A push-stream observer: receives each committed state.
pub trait Observer {
    fn next(&self, state: &Value);
}

/// Adapter from the subscription protocol to a minimal push stream.
pub struct StateObservable {
    store: Store,
}

impl StateObservable {
    /// Push the current state to the observer once, synchronously, then on
    /// every committed dispatch until unsubscribed.
    pub fn subscribe(&self, observer: Rc<dyn Observer>) -> Result<Subscription, StoreError> {
        observer.next(&self.store.get_state()?);
        let store = self.store.clone();
        self.store.subscribe(move || {
            // Listeners run after the commit, so the read cannot be refused.
            if let Ok(state) = store.get_state() {
                observer.next(&state);
            }
        })
    }

    /// The standard self-reference of the observable protocol.
    pub fn observable(&self) -> &StateObservable {
        self
    }
}

/// Create a store from a reducer, optional preloaded state, and optional
/// enhancer.
///
/// With an enhancer present the call delegates entirely:
/// `enhancer(creator)(reducer, preloaded_state)`. Otherwise the store is
/// built directly and the init action is dispatched exactly once before
/// the store is returned, so every reducer yields its initial state.
///
/// Without an enhancer, function-typed preloaded state is refused — it is
/// almost always an enhancer passed one argument early. With the enhancer
/// position filled there is nothing ambiguous about it, and it passes
/// through like any other state value.
pub fn create_store(
    reducer: Reducer,
    preloaded_state: Option<Value>,
    enhancer: Option<Enhancer>,
) -> Result<Store, StoreError> {
    match enhancer {
        Some(enhance) => {
            let creator: StoreCreator = Rc::new(bootstrap_store);
            enhance(creator)(reducer, preloaded_state)
        }
        None => {
            if matches!(preloaded_state, Some(Value::Function(_))) {
                return Err(StoreError::FunctionPreloadedState);
            }
            bootstrap_store(reducer, preloaded_state)
        }
    }
}

fn bootstrap_store(reducer: Reducer, preloaded_state: Option<Value>) -> Result<Store, StoreError> {
    let listeners: Rc<Vec<ListenerEntry>> = Rc::new(Vec::new());
    let inner = Rc::new(StoreInner {
        reducer: RefCell::new(reducer),
        state: RefCell::new(preloaded_state.unwrap_or(Value::Undefined)),
        current_listeners: RefCell::new(Rc::clone(&listeners)),
        next_listeners: RefCell::new(listeners),
        is_dispatching: Cell::new(false),
        listener_seq: Cell::new(0),
    });
    let dispatch_inner = Rc::clone(&inner);
    let store = Store {
        inner,
        dispatch: Rc::new(move |action_value| dispatch_to_reducer(&dispatch_inner, action_value)),
    };
    store.dispatch(action(INIT))?;
    Ok(store)
}
