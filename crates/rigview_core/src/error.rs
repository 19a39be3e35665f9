//! Error types for rigview_core

use std::time::Duration;

use thiserror::Error;

use crate::lifecycle::ToolState;

/// Boxed error produced by a component state handler.
///
/// Handlers can `?` any concrete error type; the standard blanket
/// conversion boxes it at the trait boundary.
pub type ComponentError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for component state handlers
pub type ComponentResult = std::result::Result<(), ComponentError>;

/// Errors that can occur while coordinating the tool lifecycle
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// `Lifecycle::global()` was called before any `Lifecycle::install`
    #[error("lifecycle coordinator not installed yet")]
    NotInitialized,

    /// A component's state handler failed during fan-out
    ///
    /// The transition itself stays committed; the machine remains in the
    /// target state.
    #[error("component `{component}` failed entering {state:?}")]
    HandlerFailure {
        component: String,
        state: ToolState,
        #[source]
        source: ComponentError,
    },

    /// The joint handler fan-out exceeded the caller's deadline
    #[error("entering {state:?} exceeded the {deadline:?} deadline")]
    HandlerTimeout { state: ToolState, deadline: Duration },
}

/// Result type for rigview_core operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
