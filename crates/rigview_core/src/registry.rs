//! The fixed store set the viewer components coordinate through
//!
//! [`StoreRegistry`] is built once by the application bootstrap and handed
//! to every component as `Arc<StoreRegistry>`. Components communicate only
//! through these stores; by convention each store has exactly one writing
//! component, everyone else subscribes.
//!
//! | store                | writer                 | readers                |
//! |----------------------|------------------------|------------------------|
//! | `playback_time`      | viewport (rig progress)| timeline panel         |
//! | `animation_names`    | viewport (on mount)    | animation list panel   |
//! | `selected_animation` | animation list panel   | viewport               |
//! | `playing`            | timeline panel         | viewport               |
//! | `total_duration`     | viewport               | timeline panel         |
//! | `draw_bounds`        | playback options panel | viewport               |
//! | `loop_playback`      | playback options panel | viewport               |
//! | `metadata`           | viewport               | metadata panel         |
//! | `timeline_events`    | viewport               | timeline panel         |
//!
//! The convention is not enforced at runtime; the viewer's test suite
//! checks that the shipped components honor it.

use std::sync::Arc;

use crate::store::Store;

/// Render statistics for the currently mounted asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssetMetadata {
    pub draw_calls: u32,
    pub vertex_count: u32,
    pub triangle_count: u32,
}

/// A named event placed on the current animation's timeline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineEvent {
    pub name: String,
    /// Seconds from the animation's start
    pub time: f32,
    pub int_value: i32,
    pub float_value: f32,
    pub string_value: String,
}

/// The fixed set of named stores shared across the viewer
#[derive(Debug)]
pub struct StoreRegistry {
    /// Current playback position of the active animation, seconds
    pub playback_time: Store<f32>,
    /// Animation names offered by the mounted asset
    pub animation_names: Store<Vec<String>>,
    /// Name of the animation the user picked, if any
    pub selected_animation: Store<Option<String>>,
    /// Whether playback is running
    pub playing: Store<bool>,
    /// Total duration of the selected animation, seconds
    pub total_duration: Store<f32>,
    /// Debug skeleton-bounds overlay toggle
    pub draw_bounds: Store<bool>,
    /// Loop-playback toggle
    pub loop_playback: Store<bool>,
    /// Render statistics of the mounted asset, if any
    pub metadata: Store<Option<AssetMetadata>>,
    /// Timeline events of the selected animation
    pub timeline_events: Store<Vec<TimelineEvent>>,
}

impl StoreRegistry {
    /// Build the registry with every store at its initial value
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            playback_time: Store::new("playback_time", 0.0),
            animation_names: Store::new("animation_names", Vec::new()),
            selected_animation: Store::new("selected_animation", None),
            playing: Store::new("playing", false),
            total_duration: Store::new("total_duration", 0.0),
            draw_bounds: Store::new("draw_bounds", false),
            // Playback loops by default; the options panel resets it to
            // true as well.
            loop_playback: Store::new("loop_playback", true),
            metadata: Store::new("metadata", None),
            timeline_events: Store::new("timeline_events", Vec::new()),
        })
    }
}
