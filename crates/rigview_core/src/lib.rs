//! rigview Coordination Core
//!
//! Foundational primitives for the rigview skeletal-animation viewer:
//!
//! - **Lifecycle**: the seven-phase tool state machine with joint async
//!   handler fan-out across registered components
//! - **Stores**: single-value reactive containers with synchronous, ordered,
//!   uncoalesced delivery
//! - **Store Registry**: the fixed shared data model the components
//!   coordinate through
//! - **Components**: the state-entry handler contract every visual part of
//!   the viewer implements
//!
//! The crate contains no rendering, no asset parsing and no widget code;
//! those live behind the viewer's collaborator traits. What it does own is
//! the rule set that keeps the viewer's parts in step: which phase follows
//! which, who gets told, and in what order observers hear about data
//! changes.
//!
//! # Example
//!
//! ```ignore
//! use rigview_core::{Lifecycle, StoreRegistry, ToolState};
//!
//! let stores = StoreRegistry::new();
//! let lifecycle = Lifecycle::new(vec![/* components */]);
//!
//! lifecycle.switch_state(ToolState::InitUi).await?;
//! lifecycle.switch_state(ToolState::EmptyDisplay).await?;
//!
//! stores.playing.set(true);
//! ```

pub mod component;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod store;

pub use component::Component;
pub use error::{ComponentError, ComponentResult, LifecycleError, Result};
pub use lifecycle::{request_transition, ComponentId, Lifecycle, ToolState};
pub use registry::{AssetMetadata, StoreRegistry, TimelineEvent};
pub use store::{Store, Subscription, Subscriptions};
