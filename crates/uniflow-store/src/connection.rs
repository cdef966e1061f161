#![forbid(unsafe_code)]

//! Per-component connection records.
//!
//! One [`ConnectionRecord`] exists for every component that has been
//! connected at least once, keyed by the component's `Rc` allocation. Records
//! are created on first connect, updated on every reconnect or re-bind, and
//! never garbage-collected by the store.

use std::rc::Rc;
use uniflow_core::{Component, MapFn, PropObserver};

/// Which existing entries a reconnect/re-bind discards.
///
/// The default replaces nothing: mappers and bindings accumulate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceMode {
    /// Discard prior mapping entries before appending the new mapper.
    pub mappings: bool,
    /// Unregister prior bound-property observers, then discard their
    /// entries, before registering the new ones.
    pub bindings: bool,
}

impl ReplaceMode {
    /// Keep everything; append only.
    pub const NONE: Self = Self {
        mappings: false,
        bindings: false,
    };
    /// Replace mapping entries, keep bindings.
    pub const MAPPINGS: Self = Self {
        mappings: true,
        bindings: false,
    };
    /// Replace bindings, keep mapping entries.
    pub const BINDINGS: Self = Self {
        mappings: false,
        bindings: true,
    };
    /// Replace both groups.
    pub const ALL: Self = Self {
        mappings: true,
        bindings: true,
    };
}

/// A registered mapping callback. An absent callback is tolerated and
/// skipped at invocation.
pub(crate) struct MappingEntry<S, C> {
    pub(crate) callback: Option<MapFn<S, C>>,
}

/// A bound-property descriptor.
///
/// `bound` transitions false→true exactly once, when the observer is
/// actually registered with the component; it never reverts except by the
/// entry being dropped during a replace (which unbinds first).
pub(crate) struct BindingEntry<C: Component> {
    pub(crate) prop: String,
    pub(crate) observer: PropObserver<C>,
    pub(crate) bound: bool,
}

impl<C: Component> BindingEntry<C> {
    pub(crate) fn new(prop: String, observer: PropObserver<C>) -> Self {
        Self {
            prop,
            observer,
            bound: false,
        }
    }
}

pub(crate) struct ConnectionRecord<S, C: Component> {
    pub(crate) component: Rc<C>,
    pub(crate) mappings: Vec<MappingEntry<S, C>>,
    pub(crate) bindings: Vec<BindingEntry<C>>,
}

impl<S, C: Component> ConnectionRecord<S, C> {
    pub(crate) fn new(component: Rc<C>) -> Self {
        Self {
            component,
            mappings: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Present mapping callbacks, in registration order.
    pub(crate) fn mapping_callbacks(&self) -> Vec<MapFn<S, C>> {
        self.mappings
            .iter()
            .filter_map(|m| m.callback.clone())
            .collect()
    }
}
