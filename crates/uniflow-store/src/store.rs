#![forbid(unsafe_code)]

//! The store: state, reducers, and connected components.
//!
//! # Design
//!
//! [`Store<S, A, C>`] wraps its internals in shared, reference-counted
//! storage (`Rc<RefCell<..>>`); cloning a store creates a new handle to the
//! same state and registry. All mutation happens synchronously on the calling
//! thread.
//!
//! # Dispatch semantics
//!
//! A dispatch has two phases:
//!
//! 1. **Reduce**: every registered reducer runs in registration order. The
//!    store's state is replaced after *each* reducer call, so later reducers
//!    in the same pass observe earlier reducers' output — a chained fold, not
//!    independent reduction over the pre-dispatch snapshot.
//! 2. **Map**: every connected component's present mapping callbacks run, in
//!    connection order then mapping-registration order, each receiving the
//!    state current at its own invocation.
//!
//! # Re-entrancy
//!
//! A mapping callback may call `dispatch` again. Nested dispatches run on the
//! call stack: the inner dispatch completes fully (all reducers, all
//! mappings) before the outer mapping loop resumes, and the resumed outer
//! mappers observe the nested result. This is deliberate — nesting is
//! depth-first recursion, never a queue. No borrow is held across any user
//! callback, so re-entry cannot deadlock or panic on borrow rules.
//!
//! # Failure modes
//!
//! Reducers and mapping callbacks are infallible by signature. A panic in
//! either unwinds out of `dispatch`: state is left as of the last applied
//! reducer and the remaining mapping iterations are skipped.

use crate::connection::{BindingEntry, ConnectionRecord, MappingEntry, ReplaceMode};
use crate::reducer::{Reducer, ReducerFn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, debug_span, trace, warn};
use uniflow_core::{ActionSink, Component, MapFn, PropObserver, observer_eq};
use uniflow_props::{DispatcherFn, PropDescriptor};

/// Errors surfaced to callers that misuse the store API.
///
/// Both variants are programmer errors, raised synchronously at the call
/// site; the store never catches or retries them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Two reducers passed to [`Store::new`] share an id. The registry
    /// refuses the collision instead of silently overwriting, since an
    /// overwrite hides bugs.
    DuplicateReducer(String),
    /// The component has never been connected; mapping/binding updates
    /// require a prior [`Store::connect`].
    NotConnected,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateReducer(id) => write!(f, "duplicate reducer id: {id}"),
            Self::NotConnected => {
                write!(f, "component is not connected; connect it before mapping or binding")
            }
        }
    }
}

impl std::error::Error for StoreError {}

struct NamedReducer<S, A> {
    id: String,
    f: ReducerFn<S, A>,
}

struct StoreInner<S, A, C: Component> {
    state: S,
    reducers: Vec<NamedReducer<S, A>>,
    connections: Vec<ConnectionRecord<S, C>>,
}

impl<S, A, C: Component> StoreInner<S, A, C> {
    fn position(&self, component: &Rc<C>) -> Option<usize> {
        self.connections
            .iter()
            .position(|rec| Rc::ptr_eq(&rec.component, component))
    }

    fn record_mut(&mut self, component: &Rc<C>) -> Option<&mut ConnectionRecord<S, C>> {
        let idx = self.position(component)?;
        self.connections.get_mut(idx)
    }
}

/// The unidirectional state container.
///
/// Cloning a `Store` creates a new handle to the **same** state, reducer
/// registry, and connection registry.
pub struct Store<S, A, C: Component> {
    inner: Rc<RefCell<StoreInner<S, A, C>>>,
}

impl<S, A, C: Component> Clone for Store<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, A, C: Component> std::fmt::Debug for Store<S, A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("reducers", &inner.reducers.len())
            .field("connections", &inner.connections.len())
            .finish()
    }
}

impl<S: Clone + 'static, A: 'static, C: Component> Store<S, A, C> {
    /// Create a store owning `initial` and the given reducers.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateReducer`] if two reducers share an id.
    pub fn new(reducers: Vec<Reducer<S, A>>, initial: S) -> Result<Self, StoreError> {
        let mut table: Vec<NamedReducer<S, A>> = Vec::with_capacity(reducers.len());
        for reducer in reducers {
            if table.iter().any(|n| n.id == reducer.id()) {
                return Err(StoreError::DuplicateReducer(reducer.id().to_string()));
            }
            let (id, f) = reducer.into_parts();
            table.push(NamedReducer { id, f });
        }
        debug!(reducers = table.len(), "store created");
        Ok(Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: initial,
                reducers: table,
                connections: Vec::new(),
            })),
        })
    }

    /// A clone of the current state.
    #[must_use]
    pub fn state(&self) -> S {
        self.inner.borrow().state.clone()
    }

    /// Access the current state by reference without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// A weak dispatch handle for component-side callbacks.
    ///
    /// The handle does not keep the store alive; dispatching through it after
    /// the last `Store` clone is dropped is a logged no-op.
    #[must_use]
    pub fn handle(&self) -> Dispatch<S, A, C> {
        Dispatch {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Submit an action: run every reducer, then every mapping callback.
    ///
    /// See the module docs for chaining, ordering, re-entrancy, and panic
    /// behavior.
    pub fn dispatch(&self, action: A) {
        let _span = debug_span!("dispatch").entered();
        self.reduce(&action);
        self.map_connected();
    }

    fn reduce(&self, action: &A) {
        let reducers: Vec<ReducerFn<S, A>> = self
            .inner
            .borrow()
            .reducers
            .iter()
            .map(|n| Rc::clone(&n.f))
            .collect();
        for f in &reducers {
            let current = self.inner.borrow().state.clone();
            let next = f(action, &current);
            self.inner.borrow_mut().state = next;
        }
        trace!(reducers = reducers.len(), "reduce phase done");
    }

    fn map_connected(&self) {
        // Snapshot at phase entry: components connected by a re-entrant
        // dispatch join from the next dispatch on (connect already
        // synchronized them once).
        let plan: Vec<(Rc<C>, Vec<MapFn<S, C>>)> = self
            .inner
            .borrow()
            .connections
            .iter()
            .map(|rec| (Rc::clone(&rec.component), rec.mapping_callbacks()))
            .collect();
        for (component, callbacks) in plan {
            for cb in callbacks {
                // Fetched per call: a nested dispatch must be visible to the
                // remaining outer mappers.
                let state = self.state();
                cb(&state, &component);
            }
        }
    }

    /// Connect a component: register its mapper and/or consume its
    /// dispatcher's property declaration.
    ///
    /// The mapper (if any) is appended and invoked once immediately with the
    /// current state, so the component starts synchronized. The dispatcher
    /// (if any) is invoked with a dispatch handle and the component; its
    /// `init` properties are assigned once, and each `bind` property gets an
    /// observer registered with the component.
    pub fn connect(
        &self,
        component: &Rc<C>,
        mapper: Option<MapFn<S, C>>,
        dispatcher: Option<DispatcherFn<A, C>>,
    ) {
        self.update_connections(component, mapper, dispatcher, ReplaceMode::NONE, true);
    }

    /// Connect a component that does not exist yet.
    ///
    /// Returns a deferred connector: a function of the component's
    /// construction arguments that builds the component, connects it exactly
    /// as [`Store::connect`] would, and returns it.
    pub fn connect_factory<Args, F>(
        &self,
        mapper: Option<MapFn<S, C>>,
        dispatcher: Option<DispatcherFn<A, C>>,
        build: F,
    ) -> impl Fn(Args) -> Rc<C> + use<S, A, C, Args, F>
    where
        F: Fn(Args) -> C + 'static,
    {
        let store = self.clone();
        move |args: Args| {
            let component = Rc::new(build(args));
            store.connect(&component, mapper.clone(), dispatcher.clone());
            component
        }
    }

    /// Update an existing connection's mappings and bindings.
    ///
    /// The dispatcher's `init` group is ignored here — init applies only at
    /// first connect. `replace` controls whether prior entries are discarded
    /// (bindings are unregistered from the component before being dropped)
    /// or appended to.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotConnected`] if the component was never connected.
    pub fn add_mapping_binding(
        &self,
        component: &Rc<C>,
        mapper: Option<MapFn<S, C>>,
        dispatcher: Option<DispatcherFn<A, C>>,
        replace: ReplaceMode,
    ) -> Result<(), StoreError> {
        if !self.is_connected(component) {
            return Err(StoreError::NotConnected);
        }
        self.update_connections(component, mapper, dispatcher, replace, false);
        Ok(())
    }

    fn update_connections(
        &self,
        component: &Rc<C>,
        mapper: Option<MapFn<S, C>>,
        dispatcher: Option<DispatcherFn<A, C>>,
        replace: ReplaceMode,
        first_connect: bool,
    ) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.position(component).is_none() {
                inner
                    .connections
                    .push(ConnectionRecord::new(Rc::clone(component)));
            }
        }

        if let Some(mapper) = mapper {
            {
                let mut inner = self.inner.borrow_mut();
                if let Some(rec) = inner.record_mut(component) {
                    if replace.mappings {
                        rec.mappings.clear();
                    }
                    rec.mappings.push(MappingEntry {
                        callback: Some(Rc::clone(&mapper)),
                    });
                }
            }
            // Immediate synchronization with the current state.
            let state = self.state();
            mapper(&state, component);
        }

        if let Some(dispatcher) = dispatcher {
            let sink = self.handle();
            let descriptor = dispatcher(&sink, component);
            let descriptor: PropDescriptor<A, C> = if first_connect {
                descriptor
            } else {
                descriptor.without_init_group()
            };

            for (name, value) in descriptor.init_props() {
                component.set_property(name, value.clone());
            }

            // Each bind callback is wrapped with the dispatch handle it will
            // need when the toolkit fires it.
            let new_entries: Vec<BindingEntry<C>> = descriptor
                .bind_props()
                .iter()
                .map(|(name, f)| {
                    let sink = sink.clone();
                    let f = Rc::clone(f);
                    BindingEntry::new(
                        name.clone(),
                        Rc::new(move |c: &C| f(&sink, c)),
                    )
                })
                .collect();

            let stale: Vec<(String, PropObserver<C>)> = {
                let mut inner = self.inner.borrow_mut();
                match inner.record_mut(component) {
                    Some(rec) if replace.bindings => {
                        let stale = rec
                            .bindings
                            .iter()
                            .filter(|e| e.bound)
                            .map(|e| (e.prop.clone(), Rc::clone(&e.observer)))
                            .collect();
                        rec.bindings = new_entries;
                        stale
                    }
                    Some(rec) => {
                        rec.bindings.extend(new_entries);
                        Vec::new()
                    }
                    None => Vec::new(),
                }
            };
            // Unregister stale observers before the new ones go live, so a
            // single external change never double-notifies.
            for (prop, observer) in &stale {
                component.unbind(prop, observer);
            }

            let pending: Vec<(String, PropObserver<C>)> = {
                let inner = self.inner.borrow();
                inner
                    .position(component)
                    .map(|idx| {
                        inner.connections[idx]
                            .bindings
                            .iter()
                            .filter(|e| !e.bound)
                            .map(|e| (e.prop.clone(), Rc::clone(&e.observer)))
                            .collect()
                    })
                    .unwrap_or_default()
            };
            for (prop, observer) in pending {
                component.bind(&prop, Rc::clone(&observer));
                let mut inner = self.inner.borrow_mut();
                if let Some(rec) = inner.record_mut(component) {
                    if let Some(entry) = rec
                        .bindings
                        .iter_mut()
                        .find(|e| observer_eq(&e.observer, &observer))
                    {
                        entry.bound = true;
                    }
                }
            }
        }

        debug!(
            connections = self.connection_count(),
            first_connect, "connection updated"
        );
    }

    // --- Inspection -------------------------------------------------------

    /// Number of components with a connection record.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.inner.borrow().connections.len()
    }

    /// Whether the component has a connection record.
    #[must_use]
    pub fn is_connected(&self, component: &Rc<C>) -> bool {
        self.inner.borrow().position(component).is_some()
    }

    /// Number of mapping entries registered for the component.
    #[must_use]
    pub fn mapping_count(&self, component: &Rc<C>) -> usize {
        let inner = self.inner.borrow();
        inner
            .position(component)
            .map_or(0, |idx| inner.connections[idx].mappings.len())
    }

    /// Number of binding entries registered for the component.
    #[must_use]
    pub fn binding_count(&self, component: &Rc<C>) -> usize {
        let inner = self.inner.borrow();
        inner
            .position(component)
            .map_or(0, |idx| inner.connections[idx].bindings.len())
    }

    /// Property names with a live observer registration, in binding order.
    #[must_use]
    pub fn bound_props(&self, component: &Rc<C>) -> Vec<String> {
        let inner = self.inner.borrow();
        inner
            .position(component)
            .map(|idx| {
                inner.connections[idx]
                    .bindings
                    .iter()
                    .filter(|e| e.bound)
                    .map(|e| e.prop.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A weak, clonable dispatch handle.
///
/// Held by bound-property callbacks; deliberately does not keep the store
/// alive, so connection records can never cycle back into their own store.
pub struct Dispatch<S, A, C: Component> {
    inner: Weak<RefCell<StoreInner<S, A, C>>>,
}

impl<S, A, C: Component> Clone for Dispatch<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, A, C: Component> std::fmt::Debug for Dispatch<S, A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("live", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<S: Clone + 'static, A: 'static, C: Component> Dispatch<S, A, C> {
    /// Dispatch through the handle. A handle whose store has been dropped
    /// warns and does nothing.
    pub fn dispatch(&self, action: A) {
        match self.inner.upgrade() {
            Some(inner) => Store { inner }.dispatch(action),
            None => warn!("dispatch on a dropped store ignored"),
        }
    }

    /// Whether the store behind this handle is still alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<S: Clone + 'static, A: 'static, C: Component> ActionSink<A> for Dispatch<S, A, C> {
    fn dispatch(&self, action: A) {
        Dispatch::dispatch(self, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use uniflow_core::test_helpers::TestWidget;
    use uniflow_props::BindFn;

    #[derive(Clone, Debug, PartialEq, Default)]
    struct AppState {
        count: i32,
        text: String,
    }

    #[derive(Clone, Debug)]
    enum Msg {
        Inc,
        SetText(String),
    }

    fn counter() -> Reducer<AppState, Msg> {
        Reducer::new("counter", |action, state: &AppState| match action {
            Msg::Inc => AppState {
                count: state.count + 1,
                ..state.clone()
            },
            _ => state.clone(),
        })
    }

    fn text() -> Reducer<AppState, Msg> {
        Reducer::new("text", |action, state: &AppState| match action {
            Msg::SetText(t) => AppState {
                text: t.clone(),
                ..state.clone()
            },
            _ => state.clone(),
        })
    }

    fn store() -> Store<AppState, Msg, TestWidget> {
        Store::new(vec![counter(), text()], AppState::default()).unwrap()
    }

    #[test]
    fn dispatch_twice_counts_twice() {
        let store = store();
        store.dispatch(Msg::Inc);
        store.dispatch(Msg::Inc);
        assert_eq!(store.state().count, 2);
        store.with_state(|s| assert_eq!(s.count, 2));
    }

    #[test]
    fn unmatched_actions_leave_state_unchanged() {
        let store = store();
        store.dispatch(Msg::SetText("hi".to_string()));
        assert_eq!(store.state(), AppState {
            count: 0,
            text: "hi".to_string()
        });
    }

    #[test]
    fn duplicate_reducer_id_is_refused() {
        let err = Store::<AppState, Msg, TestWidget>::new(
            vec![counter(), counter()],
            AppState::default(),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateReducer("counter".to_string()));
    }

    #[test]
    fn reducers_chain_within_one_dispatch() {
        // add runs first, double second; double must observe add's output.
        let add: Reducer<i64, i64> = Reducer::new("add", |a, s| s + a);
        let double: Reducer<i64, i64> = Reducer::new("double", |_, s| s * 2);
        let store: Store<i64, i64, TestWidget> = Store::new(vec![add, double], 1).unwrap();
        store.dispatch(3);
        assert_eq!(store.state(), 8); // (1 + 3) * 2, not 4 or 2.
    }

    #[test]
    fn reducers_run_in_registration_order() {
        let first: Reducer<String, ()> = Reducer::new("first", |_, s: &String| format!("{s}a"));
        let second: Reducer<String, ()> = Reducer::new("second", |_, s: &String| format!("{s}b"));
        let store: Store<String, (), TestWidget> =
            Store::new(vec![first, second], String::new()).unwrap();
        store.dispatch(());
        assert_eq!(store.state(), "ab");
    }

    #[test]
    fn connect_invokes_mapper_once_immediately() {
        let store = store();
        store.dispatch(Msg::Inc);

        let w = TestWidget::new();
        let calls = Rc::new(Cell::new(0u32));
        let calls_cb = Rc::clone(&calls);
        store.connect(
            &w,
            Some(Rc::new(move |state: &AppState, c: &TestWidget| {
                calls_cb.set(calls_cb.get() + 1);
                c.set_property("count", state.count.to_string());
            })),
            None,
        );

        assert_eq!(calls.get(), 1);
        assert_eq!(w.get("count"), Some("1".to_string()));
    }

    #[test]
    fn mapper_runs_once_per_dispatch_with_latest_state() {
        let store = store();
        let w = TestWidget::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = Rc::clone(&seen);
        store.connect(
            &w,
            Some(Rc::new(move |state: &AppState, _: &TestWidget| {
                seen_cb.borrow_mut().push(state.count);
            })),
            None,
        );

        store.dispatch(Msg::Inc);
        store.dispatch(Msg::Inc);
        // One call at connect, one per dispatch.
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn reconnect_is_additive_by_default() {
        let store = store();
        let w = TestWidget::new();
        let hits = Rc::new(Cell::new(0u32));

        for _ in 0..2 {
            let hits_cb = Rc::clone(&hits);
            store.connect(
                &w,
                Some(Rc::new(move |_: &AppState, _: &TestWidget| {
                    hits_cb.set(hits_cb.get() + 1);
                })),
                None,
            );
        }
        assert_eq!(store.connection_count(), 1);
        assert_eq!(store.mapping_count(&w), 2);

        hits.set(0);
        store.dispatch(Msg::Inc);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn replace_mapping_keeps_only_the_latest() {
        let store = store();
        let w = TestWidget::new();
        let old_hits = Rc::new(Cell::new(0u32));
        let new_hits = Rc::new(Cell::new(0u32));

        let old_cb = Rc::clone(&old_hits);
        store.connect(
            &w,
            Some(Rc::new(move |_: &AppState, _: &TestWidget| {
                old_cb.set(old_cb.get() + 1);
            })),
            None,
        );

        let new_cb = Rc::clone(&new_hits);
        store
            .add_mapping_binding(
                &w,
                Some(Rc::new(move |_: &AppState, _: &TestWidget| {
                    new_cb.set(new_cb.get() + 1);
                })),
                None,
                ReplaceMode::MAPPINGS,
            )
            .unwrap();

        old_hits.set(0);
        new_hits.set(0);
        store.dispatch(Msg::Inc);
        assert_eq!(old_hits.get(), 0);
        assert_eq!(new_hits.get(), 1);
        assert_eq!(store.mapping_count(&w), 1);
    }

    #[test]
    fn update_before_connect_is_refused() {
        let store = store();
        let w = TestWidget::new();
        let err = store
            .add_mapping_binding(&w, None, None, ReplaceMode::NONE)
            .unwrap_err();
        assert_eq!(err, StoreError::NotConnected);
    }

    fn text_dispatcher() -> DispatcherFn<Msg, TestWidget> {
        Rc::new(|_sink, _c| {
            let on_text: BindFn<Msg, TestWidget> = Rc::new(|sink, c: &TestWidget| {
                sink.dispatch(Msg::SetText(c.get("text").unwrap_or_default()));
            });
            PropDescriptor::new()
                .with_init([("text".to_string(), "hello".to_string())])
                .with_bind([("text".to_string(), on_text)])
        })
    }

    #[test]
    fn init_is_applied_once_and_bind_closes_the_loop() {
        let store = store();
        let w = TestWidget::new();
        store.connect(&w, None, Some(text_dispatcher()));

        assert_eq!(w.get("text"), Some("hello".to_string()));
        assert_eq!(store.bound_props(&w), vec!["text".to_string()]);

        // Toolkit-side change routes back into the store.
        w.set_external("text", "typed");
        assert_eq!(store.state().text, "typed");
    }

    #[test]
    fn rebind_strips_init() {
        let store = store();
        let w = TestWidget::new();
        store.connect(&w, None, Some(text_dispatcher()));

        w.set_property("text", "user-edited".to_string());
        store
            .add_mapping_binding(&w, None, Some(text_dispatcher()), ReplaceMode::BINDINGS)
            .unwrap();
        // Init never reapplies after first connect.
        assert_eq!(w.get("text"), Some("user-edited".to_string()));
    }

    #[test]
    fn reconnecting_a_dispatcher_accumulates_observers() {
        let store = store();
        let w = TestWidget::new();
        store.connect(&w, None, Some(text_dispatcher()));
        store
            .add_mapping_binding(&w, None, Some(text_dispatcher()), ReplaceMode::NONE)
            .unwrap();
        assert_eq!(store.binding_count(&w), 2);
        assert_eq!(w.observer_count("text"), 2);
    }

    #[test]
    fn replace_bindings_unbinds_before_rebinding() {
        let store = store();
        let w = TestWidget::new();
        store.connect(&w, None, Some(text_dispatcher()));
        store
            .add_mapping_binding(&w, None, Some(text_dispatcher()), ReplaceMode::BINDINGS)
            .unwrap();

        assert_eq!(store.binding_count(&w), 1);
        assert_eq!(w.observer_count("text"), 1);

        // Exactly one notification for one external change.
        w.set_external("text", "once");
        assert_eq!(w.notifications(), 1);
        assert_eq!(store.state().text, "once");
    }

    #[test]
    fn nested_dispatch_completes_before_outer_mapping_resumes() {
        let store: Store<i32, (), TestWidget> =
            Store::new(vec![Reducer::new("inc", |_, s| s + 1)], 0).unwrap();
        let w = TestWidget::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        let nested = store.handle();
        store.connect(
            &w,
            Some(Rc::new(move |state: &i32, _: &TestWidget| {
                log_a.borrow_mut().push(('a', *state));
                if *state == 1 {
                    nested.dispatch(());
                }
            })),
            None,
        );
        let log_b = Rc::clone(&log);
        store.connect(
            &w,
            Some(Rc::new(move |state: &i32, _: &TestWidget| {
                log_b.borrow_mut().push(('b', *state));
            })),
            None,
        );
        log.borrow_mut().clear();

        store.dispatch(());
        // Outer 'a' sees 1 and nests; the nested dispatch runs both mappers
        // at 2 before the outer loop resumes 'b', which observes the nested
        // result.
        assert_eq!(
            *log.borrow(),
            vec![('a', 1), ('a', 2), ('b', 2), ('b', 2)]
        );
        assert_eq!(store.state(), 2);
    }

    #[test]
    fn connect_factory_defers_connection_until_built() {
        let store = store();
        let make = store.connect_factory(
            Some(Rc::new(|state: &AppState, c: &TestWidget| {
                c.set_property("count", state.count.to_string());
            })),
            None,
            |label: &str| {
                let w = TestWidget::default();
                w.set_property("label", label.to_string());
                w
            },
        );
        assert_eq!(store.connection_count(), 0);

        store.dispatch(Msg::Inc);
        let w = make("primary");
        assert_eq!(store.connection_count(), 1);
        assert!(store.is_connected(&w));
        assert_eq!(w.get("label"), Some("primary".to_string()));
        assert_eq!(w.get("count"), Some("1".to_string()));
    }

    #[test]
    fn dropped_store_makes_handles_inert() {
        let store = store();
        let handle = store.handle();
        assert!(handle.is_live());

        drop(store);
        assert!(!handle.is_live());
        handle.dispatch(Msg::Inc); // Must not panic.
    }

    #[test]
    fn components_are_keyed_by_identity() {
        let store = store();
        let a = TestWidget::new();
        let b = TestWidget::new();
        store.connect(&a, Some(Rc::new(|_: &AppState, _: &TestWidget| {})), None);
        assert!(store.is_connected(&a));
        assert!(!store.is_connected(&b));
    }

    #[test]
    fn mapping_phase_follows_connection_order() {
        let store = store();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = TestWidget::new();
        let second = TestWidget::new();

        let log_1 = Rc::clone(&log);
        store.connect(
            &first,
            Some(Rc::new(move |_: &AppState, _: &TestWidget| {
                log_1.borrow_mut().push(1);
            })),
            None,
        );
        let log_2 = Rc::clone(&log);
        store.connect(
            &second,
            Some(Rc::new(move |_: &AppState, _: &TestWidget| {
                log_2.borrow_mut().push(2);
            })),
            None,
        );
        log.borrow_mut().clear();

        store.dispatch(Msg::Inc);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
