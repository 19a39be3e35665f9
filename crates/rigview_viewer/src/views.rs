//! Widget seams the panels render through
//!
//! Each trait mirrors one concrete control surface of the tool. The
//! embedding shell implements them over real widgets; the test suite uses
//! plain recording structs. Callback registration replaces any previously
//! registered callback, so re-wiring a panel is idempotent.

use rigview_core::{AssetMetadata, TimelineEvent};

/// Fired when the user picks an entry in the animation list
pub type PickCallback = Box<dyn Fn(String) + Send + Sync>;

/// Fired when the user presses the play/pause button
pub type PressCallback = Box<dyn Fn() + Send + Sync>;

/// Fired when the user scrubs the transport to a position, seconds
pub type SeekCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Fired when the user flips a playback option checkbox
pub type OptionCallback = Box<dyn Fn(PlaybackOption, bool) + Send + Sync>;

/// Options surfaced as checkboxes in the playback options panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackOption {
    /// Debug skeleton-bounds overlay
    DrawBounds,
    /// Loop the current animation
    LoopPlayback,
}

/// The selectable animation-name list
pub trait ListView: Send + Sync {
    /// Replace the displayed entries
    fn set_items(&self, items: &[String]);

    /// Highlight an entry, or none
    fn set_selected(&self, selected: Option<&str>);

    /// Register the pick handler
    fn on_pick(&self, callback: PickCallback);
}

/// The timeline transport: progress readout, play/pause, scrubber
pub trait TransportView: Send + Sync {
    /// Show the playback position within the total duration, seconds
    fn set_progress(&self, seconds: f32, duration: f32);

    /// Reflect the playing flag on the play/pause button
    fn set_playing(&self, playing: bool);

    /// Place event markers along the scrubber
    fn set_event_markers(&self, events: &[TimelineEvent]);

    /// Register the play/pause handler
    fn on_toggle_play(&self, callback: PressCallback);

    /// Register the scrub handler
    fn on_seek(&self, callback: SeekCallback);
}

/// The playback options checkbox group
pub trait OptionsView: Send + Sync {
    /// Reflect an option's state. Must not re-fire `on_toggle`.
    fn set_checked(&self, option: PlaybackOption, checked: bool);

    /// Register the checkbox handler
    fn on_toggle(&self, callback: OptionCallback);
}

/// The asset statistics readout
pub trait StatsView: Send + Sync {
    /// Show the mounted asset's render statistics
    fn show(&self, metadata: &AssetMetadata);

    /// Blank the readout
    fn clear(&self);
}
