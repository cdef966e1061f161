#![forbid(unsafe_code)]

//! Probe component for exercising stores and connectors in tests.
//!
//! [`TestWidget`] implements [`Component`] with string-valued properties, an
//! observer registry honoring bind/unbind by allocation identity, and an
//! external-change simulator standing in for the toolkit's own event
//! delivery.

use crate::component::{Component, PropObserver, observer_eq};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A minimal component with observable string properties.
#[derive(Default)]
pub struct TestWidget {
    props: RefCell<HashMap<String, String>>,
    observers: RefCell<Vec<(String, PropObserver<TestWidget>)>>,
    /// Total observer invocations delivered via [`TestWidget::set_external`].
    notifications: Cell<u32>,
}

impl TestWidget {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Current value of a property, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.props.borrow().get(name).cloned()
    }

    /// Simulate a toolkit-side property change: write the value, then fire
    /// every observer bound to `name` in registration order.
    pub fn set_external(&self, name: &str, value: impl Into<String>) {
        self.props.borrow_mut().insert(name.to_string(), value.into());
        // Snapshot before invoking so observers may bind/unbind re-entrantly.
        let to_fire: Vec<PropObserver<TestWidget>> = self
            .observers
            .borrow()
            .iter()
            .filter(|(prop, _)| prop == name)
            .map(|(_, obs)| Rc::clone(obs))
            .collect();
        for obs in to_fire {
            self.notifications.set(self.notifications.get() + 1);
            obs(self);
        }
    }

    /// Number of observers currently bound to `name`.
    #[must_use]
    pub fn observer_count(&self, name: &str) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|(prop, _)| prop == name)
            .count()
    }

    /// Total observer invocations delivered so far.
    #[must_use]
    pub fn notifications(&self) -> u32 {
        self.notifications.get()
    }
}

impl Component for TestWidget {
    type Value = String;

    fn set_property(&self, name: &str, value: String) {
        self.props.borrow_mut().insert(name.to_string(), value);
    }

    fn bind(&self, name: &str, observer: PropObserver<Self>) {
        self.observers
            .borrow_mut()
            .push((name.to_string(), observer));
    }

    fn unbind(&self, name: &str, observer: &PropObserver<Self>) {
        self.observers
            .borrow_mut()
            .retain(|(prop, obs)| !(prop == name && observer_eq(obs, observer)));
    }
}
