#![forbid(unsafe_code)]

//! uniflow: a unidirectional state container for widget toolkits.
//!
//! Actions flow into a [`Store`] through [`Store::dispatch`]; registered
//! [`Reducer`]s fold them into new state; mapping callbacks push that state
//! into connected components; bound component properties route external
//! changes back in as fresh dispatches.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use uniflow::prelude::*;
//! # use uniflow::test_helpers_example::Label;
//!
//! #[derive(Clone, Default)]
//! struct State { count: i32 }
//!
//! enum Msg { Inc }
//!
//! let counter = Reducer::new("counter", |msg, state: &State| match msg {
//!     Msg::Inc => State { count: state.count + 1 },
//! });
//! let store: Store<State, Msg, Label> = Store::new(vec![counter], State::default()).unwrap();
//!
//! let label = Rc::new(Label::default());
//! store.connect(
//!     &label,
//!     Some(Rc::new(|state: &State, label: &Label| {
//!         label.set_property("text", state.count.to_string());
//!     })),
//!     None,
//! );
//!
//! store.dispatch(Msg::Inc);
//! assert_eq!(label.text(), "1");
//! ```

pub use uniflow_core::{ActionSink, Component, MapFn, PropObserver, observer_eq};
pub use uniflow_props::{BindFn, Connector, DispatcherFn, PropDescriptor};
pub use uniflow_store::{Dispatch, Reducer, ReducerFn, ReplaceMode, Store, StoreError};

#[cfg(feature = "test-helpers")]
pub use uniflow_core::test_helpers;

/// Convenient imports for application code.
pub mod prelude {
    pub use uniflow_core::{ActionSink, Component, MapFn, PropObserver};
    pub use uniflow_props::{BindFn, Connector, DispatcherFn, PropDescriptor};
    pub use uniflow_store::{Dispatch, Reducer, ReducerFn, ReplaceMode, Store, StoreError};
}

// Minimal component used by the crate-level doctest.
#[doc(hidden)]
pub mod test_helpers_example {
    use std::cell::RefCell;
    use uniflow_core::{Component, PropObserver};

    #[derive(Default)]
    pub struct Label {
        text: RefCell<String>,
    }

    impl Label {
        pub fn text(&self) -> String {
            self.text.borrow().clone()
        }
    }

    impl Component for Label {
        type Value = String;

        fn set_property(&self, _name: &str, value: String) {
            *self.text.borrow_mut() = value;
        }

        fn bind(&self, _name: &str, _observer: PropObserver<Self>) {}

        fn unbind(&self, _name: &str, _observer: &PropObserver<Self>) {}
    }
}
