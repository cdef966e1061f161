#![forbid(unsafe_code)]

//! Named reducers.
//!
//! A reducer treats the action as a filter: it either returns an updated
//! state or hands back the previous one unchanged. A reducer always has a
//! callable function — assigning an absent function installs the identity
//! fallback at assignment time, never at call time.

use std::rc::Rc;

/// A reducer function: computes new state from an action and prior state.
pub type ReducerFn<S, A> = Rc<dyn Fn(&A, &S) -> S>;

/// A named pure state-transition function.
///
/// The id is fixed at construction. The function may be swapped until the
/// reducer is registered into a store, which consumes it; the store's copy is
/// immutable thereafter. The `state` slot exists for introspection only — the
/// store holds the canonical state.
pub struct Reducer<S, A> {
    id: String,
    f: ReducerFn<S, A>,
    state: Option<S>,
}

impl<S, A> std::fmt::Debug for Reducer<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reducer")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<S: Clone + 'static, A: 'static> Reducer<S, A> {
    /// A reducer with the given id and function.
    pub fn new(id: impl Into<String>, f: impl Fn(&A, &S) -> S + 'static) -> Self {
        Self {
            id: id.into(),
            f: Rc::new(f),
            state: None,
        }
    }

    /// A reducer whose function is the identity (`|_, s| s.clone()`).
    #[must_use]
    pub fn identity(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            f: Self::identity_fn(),
            state: None,
        }
    }

    /// The reducer's id. Read-only after construction.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The active reducer function.
    #[must_use]
    pub fn reducer(&self) -> ReducerFn<S, A> {
        Rc::clone(&self.f)
    }

    /// Replace the reducer function. `None` installs the identity fallback
    /// immediately, so the reducer is always callable.
    pub fn set_reducer(&mut self, f: Option<ReducerFn<S, A>>) {
        self.f = f.unwrap_or_else(Self::identity_fn);
    }

    /// Introspection state, if any was recorded.
    #[must_use]
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// Record introspection state. `None` means "no update" and is ignored,
    /// so a recorded value can never be accidentally cleared.
    pub fn set_state(&mut self, state: Option<S>) {
        if let Some(state) = state {
            self.state = Some(state);
        }
    }

    pub(crate) fn into_parts(self) -> (String, ReducerFn<S, A>) {
        (self.id, self.f)
    }

    fn identity_fn() -> ReducerFn<S, A> {
        Rc::new(|_, s: &S| s.clone())
    }
}
