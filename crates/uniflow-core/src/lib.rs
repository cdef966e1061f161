#![forbid(unsafe_code)]

//! Core: the component capability contract and shared callback vocabulary.
//!
//! # Role in uniflow
//! `uniflow-core` defines the seam between the state container and whatever
//! widget toolkit hosts the view tree. The store (`uniflow-store`) and the
//! component-side connector (`uniflow-props`) both speak only in terms of the
//! [`Component`] and [`ActionSink`] traits defined here, so neither needs to
//! know the other's concrete types.
//!
//! # Primary responsibilities
//! - **Component**: settable named properties plus `bind`/`unbind` of
//!   property observers, identified by `Rc` allocation.
//! - **ActionSink**: the capability to dispatch an action, without exposing
//!   the store itself.
//! - **Callback aliases**: [`MapFn`], [`PropObserver`].

pub mod component;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use component::{ActionSink, Component, MapFn, PropObserver, observer_eq};
