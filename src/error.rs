//! Errors surfaced by store operations.

use thiserror::Error;

/// Everything a store operation can fail with.
///
/// The messages are part of the public contract: they name the offending
/// payload's kind and state the rule that was broken. `Clone` matters —
/// shape errors captured at combine time are re-raised on every subsequent
/// call of the combined reducer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Base dispatch received something other than a plain record.
    #[error("actions must be plain records, got {kind}; wrap other payload kinds in middleware before they reach the base dispatch")]
    NonPlainAction { kind: &'static str },

    /// The action record has no `"type"` entry, or the entry is undefined.
    #[error("actions must carry a \"type\" entry that is not undefined; use string constants for action types")]
    MissingActionType,

    /// A store operation was invoked while the reducer was executing.
    #[error("{operation} may not be called while the reducer is executing; the reducer already receives the state as an argument")]
    ReducerExecuting { operation: &'static str },

    /// The preloaded state is a function value, which almost certainly
    /// means an enhancer was passed in the wrong position. Enhancers go in
    /// the third argument of `create_store`; compose several into one with
    /// `compose`.
    #[error("the preloaded state is a function; pass enhancers as the third argument to create_store")]
    FunctionPreloadedState,

    /// A slice reducer returned undefined when fed undefined state and the
    /// init action. Captured at combine time and re-raised on every call.
    #[error("the reducer for slice {key:?} returned undefined during initialization; given undefined state a reducer must return its initial state, and that initial state may not be undefined")]
    UninitializedSlice { key: String },

    /// A slice reducer returned undefined when probed with a freshly
    /// randomized reserved type. Captured at combine time and re-raised on
    /// every call.
    #[error("the reducer for slice {key:?} returned undefined when probed with a random type; reducers must return their current state for any unknown action and must not handle types in the reserved @@fluxion namespace")]
    UnknownActionUnhandled { key: String },

    /// A slice reducer returned undefined while handling a dispatched
    /// action. Raised from the in-progress dispatch.
    #[error("the reducer for slice {key:?} returned undefined while handling the action type {action_type}; return the previous state to signal no change, or null for an intentionally empty slice")]
    SliceReturnedUndefined { key: String, action_type: String },

    /// A middleware dispatched during its setup phase, before the pipeline
    /// was fully assembled.
    #[error("dispatching while constructing your middleware is not allowed; other middleware would not be applied to this dispatch")]
    MiddlewareSetupDispatch,
}
