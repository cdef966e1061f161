#![forbid(unsafe_code)]

//! Component-side mapper/binder protocol.
//!
//! A component (or the code constructing one) declares two things ahead of
//! ever seeing a store: which state slices it wants *mapped* onto itself, and
//! which of its own properties should, when changed externally, *dispatch*
//! back into the store. [`PropDescriptor`] is the immutable declaration
//! value; [`Connector`] is the accumulating handle a component keeps while
//! declarations are still being made.

pub mod connector;
pub mod descriptor;

pub use connector::{Connector, DispatcherFn};
pub use descriptor::{BindFn, PropDescriptor};
