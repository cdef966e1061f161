#![forbid(unsafe_code)]

//! Store: the unidirectional state container.
//!
//! # Role in uniflow
//! `uniflow-store` owns the application state, the reducer registry, and the
//! per-component connection records. A dispatch runs every reducer over the
//! current state in registration order (chained, each reducer observing its
//! predecessors' output), then pushes the result into every connected
//! component through its mapping callbacks.
//!
//! # Primary responsibilities
//! - **Reducer**: named pure `(action, state) -> state` functions.
//! - **Store**: `dispatch`, `connect`, `connect_factory`,
//!   `add_mapping_binding`, and typed inspection of the connection registry.
//! - **Dispatch**: a weak, clonable handle implementing
//!   [`uniflow_core::ActionSink`] for component-side callbacks.

pub mod connection;
pub mod reducer;
pub mod store;

pub use connection::ReplaceMode;
pub use reducer::{Reducer, ReducerFn};
pub use store::{Dispatch, Store, StoreError};
