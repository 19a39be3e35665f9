//! Collaborator seams for rendering, asset decoding and playback
//!
//! The viewer never draws or parses anything itself. Rendering and asset
//! decoding live behind these traits; the shipped components only hold
//! `Arc<dyn _>` handles. Implementations come from the embedding shell,
//! and from in-memory doubles in the test suite and the headless example.

use std::sync::Arc;

use async_trait::async_trait;

use rigview_core::{AssetMetadata, TimelineEvent};

use crate::error::HostResult;

/// A decoded skeletal-animation asset bundle ready to mount
#[derive(Debug, Clone)]
pub struct RigAsset {
    /// Display name, usually the dropped file's stem
    pub name: String,
    /// Skeleton structure and animation curves
    pub skeleton_json: Vec<u8>,
    /// Texture-region atlas description
    pub atlas: Vec<u8>,
    /// Backing texture pixels
    pub texture: Vec<u8>,
}

impl RigAsset {
    /// Bundle with a name and empty payloads, enough for doubles and demos
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skeleton_json: Vec::new(),
            atlas: Vec::new(),
            texture: Vec::new(),
        }
    }
}

/// Callback receiving playback progress, seconds from the animation start
pub type TimeSink = Box<dyn Fn(f32) + Send + Sync>;

/// A mounted, playable skeleton instance
pub trait RigInstance: Send + Sync {
    /// Names of the animations the asset offers
    fn animation_names(&self) -> Vec<String>;

    /// Start the named animation from its beginning
    fn play(&self, animation: &str, looped: bool) -> HostResult<()>;

    /// Pause or resume without moving the position. No-op until something
    /// was played.
    fn set_playing(&self, playing: bool);

    /// Jump to a position, seconds from the animation start
    fn seek(&self, seconds: f32);

    /// Total duration of the current animation, seconds
    fn duration(&self) -> f32;

    /// Timeline events of the current animation
    fn events(&self) -> Vec<TimelineEvent>;

    /// Toggle the debug skeleton-bounds overlay
    fn set_draw_bounds(&self, enabled: bool);

    /// Toggle looping of the current animation
    fn set_loop(&self, enabled: bool);

    /// Render statistics for the mounted asset
    fn metadata(&self) -> AssetMetadata;

    /// Register the sink that receives playback progress every frame.
    /// Replaces any previously registered sink.
    fn observe_time(&self, sink: TimeSink);
}

/// The rendering side: surface setup and rig mounting
#[async_trait]
pub trait SceneHost: Send + Sync {
    /// Create the render surface. Awaited once while the UI comes up.
    async fn init_surface(&self) -> HostResult<()>;

    /// Mount a decoded bundle into the scene
    async fn mount(&self, asset: &RigAsset) -> HostResult<Arc<dyn RigInstance>>;

    /// Remove the mounted rig from the scene, if any
    fn unmount(&self);
}

/// Hands out the most recently dropped, already decoded bundle
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Take the pending bundle; fails with
    /// [`HostError::AssetUnavailable`](crate::error::HostError::AssetUnavailable)
    /// when none is waiting
    async fn acquire(&self) -> HostResult<RigAsset>;
}

/// Narrow seam the timeline panel uses to reach whatever rig is mounted
pub trait PlaybackControl: Send + Sync {
    /// Jump the current animation to `seconds`. Ignored while nothing is
    /// mounted.
    fn seek(&self, seconds: f32);
}
