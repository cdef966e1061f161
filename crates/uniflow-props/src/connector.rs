#![forbid(unsafe_code)]

//! Connector: the accumulating handle behind a component's declarations.
//!
//! A component under construction does not have a store yet. It keeps a
//! [`Connector`] instead, appending mappers and property declarations as its
//! pieces come together; at connect time the store consumes the connector
//! through [`Connector::mapper_fn`] and [`Connector::dispatcher_fn`].
//!
//! Cloning a `Connector` creates a new handle to the **same** declarations —
//! the `Rc<RefCell<..>>` sharing model used throughout this workspace. The
//! held [`PropDescriptor`] is still an immutable value: each declaration
//! replaces it with a newly derived descriptor, so a snapshot taken by a
//! connect-in-progress is never perturbed by a concurrent declaration.

use crate::descriptor::{BindFn, PropDescriptor};
use std::cell::RefCell;
use std::rc::Rc;
use uniflow_core::{ActionSink, Component, MapFn};

/// A dispatcher: invoked by the store at connect time with a dispatch sink
/// and the component, returning the property declaration to consume.
pub type DispatcherFn<A, C> = Rc<dyn Fn(&dyn ActionSink<A>, &C) -> PropDescriptor<A, C>>;

struct ConnectorInner<S, A, C: Component> {
    mappers: Vec<MapFn<S, C>>,
    descriptor: PropDescriptor<A, C>,
}

/// Shared handle accumulating a component's mappers and property
/// declarations.
pub struct Connector<S, A, C: Component> {
    inner: Rc<RefCell<ConnectorInner<S, A, C>>>,
}

impl<S, A, C: Component> Clone for Connector<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: 'static, C: Component> Default for Connector<S, A, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, A: 'static, C: Component> Connector<S, A, C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ConnectorInner {
                mappers: Vec::new(),
                descriptor: PropDescriptor::new(),
            })),
        }
    }

    /// Append a mapping callback. Mappers run in registration order.
    pub fn add_mapper(&self, f: impl Fn(&S, &C) + 'static) {
        self.inner.borrow_mut().mappers.push(Rc::new(f));
    }

    /// Merge bind properties into the declaration.
    pub fn bind_prop<I>(&self, props: I)
    where
        I: IntoIterator<Item = (String, BindFn<A, C>)>,
    {
        let mut inner = self.inner.borrow_mut();
        inner.descriptor = inner.descriptor.with_bind(props);
    }

    /// Merge init properties into the declaration.
    pub fn init_prop<I>(&self, props: I)
    where
        I: IntoIterator<Item = (String, C::Value)>,
    {
        let mut inner = self.inner.borrow_mut();
        inner.descriptor = inner.descriptor.with_init(props);
    }

    /// Remove a bind property; absent keys are a no-op.
    pub fn unbind_prop(&self, key: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.descriptor = inner.descriptor.without_bind(key);
    }

    /// Remove an init property; absent keys are a no-op.
    pub fn dest_prop(&self, key: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.descriptor = inner.descriptor.without_init(key);
    }

    /// Snapshot of the current declaration.
    #[must_use]
    pub fn descriptor(&self) -> PropDescriptor<A, C> {
        self.inner.borrow().descriptor.clone()
    }

    #[must_use]
    pub fn mapper_count(&self) -> usize {
        self.inner.borrow().mappers.len()
    }

    /// Invoke every registered mapper, in order, with `(state, component)`.
    pub fn mapper(&self, state: &S, component: &C) {
        // Snapshot under the borrow, invoke outside it: a mapper may add
        // further mappers re-entrantly.
        let mappers: Vec<MapFn<S, C>> = self.inner.borrow().mappers.clone();
        for m in &mappers {
            m(state, component);
        }
    }

    /// A mapping callback the store can hold: invokes every mapper
    /// registered on this connector at the time of each call.
    #[must_use]
    pub fn mapper_fn(&self) -> MapFn<S, C> {
        let handle = self.clone();
        Rc::new(move |state: &S, component: &C| handle.mapper(state, component))
    }

    /// A dispatcher the store can consume: returns the declaration current
    /// at the moment the store invokes it. The sink and component arguments
    /// are part of the dispatcher contract; this accumulating form has no
    /// use for them.
    #[must_use]
    pub fn dispatcher_fn(&self) -> DispatcherFn<A, C> {
        let handle = self.clone();
        Rc::new(move |_sink: &dyn ActionSink<A>, _component: &C| handle.descriptor())
    }
}
