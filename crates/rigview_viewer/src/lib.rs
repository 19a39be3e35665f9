//! rigview Viewer Components
//!
//! The concrete components of the rigview skeletal-animation viewer,
//! wired over `rigview_core`'s lifecycle and store primitives:
//!
//! - [`Surface`] - brings the render surface up during UI init
//! - [`Viewport`] - mounts dropped assets and drives the rig from stores
//! - [`AnimationListPanel`] - animation picker, owns the selection
//! - [`TimelinePanel`] - play/pause and scrubbing transport
//! - [`PlaybackOptionsPanel`] - debug-bounds and loop toggles
//! - [`MetadataPanel`] - render statistics readout
//!
//! Rendering, asset decoding and the real widgets stay outside this crate
//! behind the [`host`] and [`views`] traits; the embedding shell implements
//! them and hands the bindings to [`bootstrap`].
//!
//! # Example
//!
//! ```ignore
//! use rigview_viewer::{bootstrap, HostBindings, ViewerConfig};
//!
//! let viewer = bootstrap(bindings, ViewerConfig::new()).await?;
//!
//! // external events from the shell:
//! viewer.asset_dropped().await?; // a decoded bundle is pending
//! viewer.clear_asset().await?;
//! ```

pub mod animation_list;
pub mod bootstrap;
pub mod error;
pub mod host;
pub mod metadata_panel;
pub mod playback_options;
pub mod surface;
pub mod timeline;
pub mod viewport;
pub mod views;


pub use animation_list::AnimationListPanel;
pub use bootstrap::{bootstrap, HostBindings, Viewer, ViewerConfig};
pub use error::{HostError, HostResult, Result, ViewerError};
pub use host::{AssetSource, PlaybackControl, RigAsset, RigInstance, SceneHost, TimeSink};
pub use metadata_panel::MetadataPanel;
pub use playback_options::PlaybackOptionsPanel;
pub use surface::Surface;
pub use timeline::TimelinePanel;
pub use viewport::Viewport;
pub use views::{
    ListView, OptionCallback, OptionsView, PickCallback, PlaybackOption, PressCallback,
    SeekCallback, StatsView, TransportView,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrap::{bootstrap, HostBindings, Viewer, ViewerConfig};
    pub use crate::error::{HostError, HostResult, ViewerError};
    pub use crate::host::{
        AssetSource, PlaybackControl, RigAsset, RigInstance, SceneHost, TimeSink,
    };
    pub use crate::views::{ListView, OptionsView, PlaybackOption, StatsView, TransportView};
    pub use rigview_core::{
        AssetMetadata, Component, ComponentResult, Lifecycle, StoreRegistry, TimelineEvent,
        ToolState,
    };
}
