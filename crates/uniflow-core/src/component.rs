#![forbid(unsafe_code)]

//! The component capability contract.
//!
//! A component is anything the store can push state into (settable named
//! properties) and listen to (observable named properties). The contract is
//! deliberately small: the hosting toolkit's widget hierarchy, layout, and
//! event plumbing stay on the other side of this trait.

use std::rc::Rc;

/// An observer registered against a component property.
///
/// Observers are compared by `Rc` allocation identity (see [`observer_eq`]),
/// never by value, so registering the same closure twice yields two distinct
/// observers.
pub type PropObserver<C> = Rc<dyn Fn(&C)>;

/// A mapping callback: projects store state onto a connected component's
/// observable attributes.
pub type MapFn<S, C> = Rc<dyn Fn(&S, &C)>;

/// A stateful view component the store can connect to.
///
/// Implementations are expected to use interior mutability (`RefCell`):
/// every method takes `&self` because components are shared via `Rc` and
/// reached from inside callback chains.
///
/// # Contract
///
/// - `set_property` assigns a named attribute directly; unknown names are the
///   implementation's business (ignore, create, or panic — the store does not
///   care).
/// - `bind` registers an observer to be invoked whenever the named property
///   changes *externally* (toolkit-side). Registering the same observer `Rc`
///   twice must result in two invocations per change; the store guards
///   against that with its own bound flag.
/// - `unbind` removes the observer matching the given `Rc` allocation for the
///   named property; a miss is a no-op.
pub trait Component: 'static {
    /// The attribute value type this component accepts.
    type Value: Clone;

    /// Assign a named attribute.
    fn set_property(&self, name: &str, value: Self::Value);

    /// Register an observer for external changes to a named property.
    fn bind(&self, name: &str, observer: PropObserver<Self>);

    /// Remove a previously registered observer, matched by allocation
    /// identity. Unknown (name, observer) pairs are a no-op.
    fn unbind(&self, name: &str, observer: &PropObserver<Self>);
}

/// The capability to dispatch an action into a store.
///
/// Bound-property callbacks receive this rather than a concrete store handle,
/// which keeps component-side code free of any store dependency.
pub trait ActionSink<A> {
    /// Submit an action, triggering the reduce-then-map cycle.
    fn dispatch(&self, action: A);
}

/// Compare two observers by `Rc` allocation identity.
///
/// Trait-object `Rc`s carry a vtable pointer alongside the data pointer, and
/// vtable addresses are not unique across codegen units; only the data
/// address is compared here.
#[must_use]
pub fn observer_eq<C: ?Sized>(a: &PropObserver<C>, b: &PropObserver<C>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
