#![forbid(unsafe_code)]

//! Immutable `{bind, init}` property descriptor.
//!
//! # Design
//!
//! A [`PropDescriptor`] is a value, not a registry: every mutator takes
//! `&self` and returns a freshly derived descriptor, leaving the original
//! untouched. A store that snapshots a descriptor mid-connect can therefore
//! never observe a later declaration bleeding into it.
//!
//! # Invariants
//!
//! 1. Merges are shallow; a later key overwrites an earlier key's value but
//!    keeps its original position (first-insertion order).
//! 2. Removing an absent key is a no-op, not an error.
//! 3. Both groups preserve insertion order for fresh keys.

use std::rc::Rc;
use uniflow_core::{ActionSink, Component};

/// A bound-property callback: invoked when the component's value for the
/// property changes externally, with enough context to dispatch.
pub type BindFn<A, C> = Rc<dyn Fn(&dyn ActionSink<A>, &C)>;

/// The declaration a dispatcher hands to the store at connect time.
///
/// `init` entries are property name → initial value, applied once via direct
/// attribute assignment on first connect. `bind` entries are property name →
/// callback, registered as observers with the component.
pub struct PropDescriptor<A, C: Component> {
    bind: Vec<(String, BindFn<A, C>)>,
    init: Vec<(String, C::Value)>,
}

impl<A, C: Component> Clone for PropDescriptor<A, C> {
    fn clone(&self) -> Self {
        Self {
            bind: self.bind.clone(),
            init: self.init.clone(),
        }
    }
}

impl<A, C: Component> Default for PropDescriptor<A, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C: Component> std::fmt::Debug for PropDescriptor<A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropDescriptor")
            .field(
                "bind",
                &self.bind.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field(
                "init",
                &self.init.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<A, C: Component> PropDescriptor<A, C> {
    /// An empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bind: Vec::new(),
            init: Vec::new(),
        }
    }

    /// Derive a descriptor with the given bind properties merged in.
    #[must_use]
    pub fn with_bind<I>(&self, props: I) -> Self
    where
        I: IntoIterator<Item = (String, BindFn<A, C>)>,
    {
        let mut next = self.clone();
        for (key, value) in props {
            merge_entry(&mut next.bind, key, value);
        }
        next
    }

    /// Derive a descriptor with the given init properties merged in.
    #[must_use]
    pub fn with_init<I>(&self, props: I) -> Self
    where
        I: IntoIterator<Item = (String, C::Value)>,
    {
        let mut next = self.clone();
        for (key, value) in props {
            merge_entry(&mut next.init, key, value);
        }
        next
    }

    /// Derive a descriptor without the named bind property.
    #[must_use]
    pub fn without_bind(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.bind.retain(|(k, _)| k != key);
        next
    }

    /// Derive a descriptor without the named init property.
    #[must_use]
    pub fn without_init(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.init.retain(|(k, _)| k != key);
        next
    }

    /// Derive a descriptor with the init group emptied.
    ///
    /// Init properties only apply at first connect; re-bind paths strip them
    /// with this before consuming the rest.
    #[must_use]
    pub fn without_init_group(&self) -> Self {
        Self {
            bind: self.bind.clone(),
            init: Vec::new(),
        }
    }

    /// Bind entries in declaration order.
    #[must_use]
    pub fn bind_props(&self) -> &[(String, BindFn<A, C>)] {
        &self.bind
    }

    /// Init entries in declaration order.
    #[must_use]
    pub fn init_props(&self) -> &[(String, C::Value)] {
        &self.init
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bind.is_empty() && self.init.is_empty()
    }
}

/// Overwrite in place if the key exists, otherwise append.
fn merge_entry<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}
