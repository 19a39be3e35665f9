//! Component contract for lifecycle participation
//!
//! Every visual part of the viewer (viewport, panels, surface bootstrap)
//! implements [`Component`] and registers with the [`Lifecycle`]
//! coordinator. On each accepted transition the coordinator invokes the
//! handler bound to the target state on every registered component and
//! awaits them jointly.
//!
//! Handlers default to no-ops, so components implement only the states
//! they care about:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use rigview_core::{Component, ComponentResult};
//!
//! struct StatusLine;
//!
//! #[async_trait]
//! impl Component for StatusLine {
//!     fn name(&self) -> &str {
//!         "status_line"
//!     }
//!
//!     async fn on_empty_display(&self) -> ComponentResult {
//!         // show the "drop a file" hint
//!         Ok(())
//!     }
//! }
//! ```
//!
//! [`Lifecycle`]: crate::lifecycle::Lifecycle

use async_trait::async_trait;

pub use crate::error::{ComponentError, ComponentResult};

/// A viewer component driven by lifecycle state entry.
///
/// Handlers run concurrently with other components' handlers during a
/// transition. A handler must never await
/// [`Lifecycle::switch_state`](crate::lifecycle::Lifecycle::switch_state)
/// directly (the fan-out gate is held while it runs); use
/// [`Lifecycle::request_state`](crate::lifecycle::Lifecycle::request_state)
/// or [`request_transition`](crate::lifecycle::request_transition) to
/// advance the machine from inside a handler.
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable name used in diagnostics and error reports
    fn name(&self) -> &str;

    /// UI scaffolding exists, widgets can be wired
    async fn on_init_ui(&self) -> ComponentResult {
        Ok(())
    }

    /// No asset mounted; idle hint visible
    async fn on_empty_display(&self) -> ComponentResult {
        Ok(())
    }

    /// An asset bundle is pending and should be mounted
    async fn on_load_asset(&self) -> ComponentResult {
        Ok(())
    }

    /// A mounted asset is displayed and interactive
    async fn on_active_display(&self) -> ComponentResult {
        Ok(())
    }

    /// The mounted asset is being swapped for a newly dropped one
    async fn on_replace_asset(&self) -> ComponentResult {
        Ok(())
    }

    /// The mounted asset is being removed
    async fn on_clear_asset(&self) -> ComponentResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    #[async_trait]
    impl Component for Inert {
        fn name(&self) -> &str {
            "inert"
        }
    }

    #[tokio::test]
    async fn default_handlers_are_noop_ok() {
        let component = Inert;
        assert!(component.on_init_ui().await.is_ok());
        assert!(component.on_empty_display().await.is_ok());
        assert!(component.on_load_asset().await.is_ok());
        assert!(component.on_active_display().await.is_ok());
        assert!(component.on_replace_asset().await.is_ok());
        assert!(component.on_clear_asset().await.is_ok());
    }

    #[tokio::test]
    async fn handlers_box_concrete_errors() {
        struct Failing;

        #[async_trait]
        impl Component for Failing {
            fn name(&self) -> &str {
                "failing"
            }

            async fn on_load_asset(&self) -> ComponentResult {
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no bundle"))?;
                Ok(())
            }
        }

        let err = Failing.on_load_asset().await.unwrap_err();
        assert!(err.to_string().contains("no bundle"));
    }
}
