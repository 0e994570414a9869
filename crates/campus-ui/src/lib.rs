//! UI state machine for the Campus Life page.
//!
//! The view triggers actions on [`UiStateMachine`] and renders whatever
//! arrives on the status channel. Each widget loads independently.

mod controller;
pub mod deferred;
pub mod error_mapping;
pub mod machine;
pub mod widget;

pub use machine::{SharedRng, UiError, UiStateMachine, HOURS_REFRESH_PERIOD};
pub use widget::{
    FallbackAction, Payload, RequestId, StatusChange, Widget, WidgetError, WidgetStatus,
};
