//! One-time viewer composition
//!
//! [`bootstrap`] builds the store registry and the six shipped components,
//! installs the lifecycle coordinator and brings the tool up to the idle
//! display. The returned [`Viewer`] handle is what the embedding shell
//! talks to afterwards: it forwards external events (a decoded drop, a
//! clear request) into lifecycle transitions.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use rigview_core::{Component, Lifecycle, StoreRegistry, ToolState};

use crate::animation_list::AnimationListPanel;
use crate::error::{Result, ViewerError};
use crate::host::{AssetSource, PlaybackControl, SceneHost};
use crate::metadata_panel::MetadataPanel;
use crate::playback_options::PlaybackOptionsPanel;
use crate::surface::Surface;
use crate::timeline::TimelinePanel;
use crate::viewport::Viewport;
use crate::views::{ListView, OptionsView, StatsView, TransportView};

/// Collaborator handles the embedding shell provides
pub struct HostBindings {
    pub scene: Arc<dyn SceneHost>,
    pub assets: Arc<dyn AssetSource>,
    pub animation_list: Arc<dyn ListView>,
    pub transport: Arc<dyn TransportView>,
    pub options: Arc<dyn OptionsView>,
    pub stats: Arc<dyn StatsView>,
}

/// Viewer configuration
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Deadline applied to every shell-driven transition; `None` waits
    /// indefinitely
    pub transition_deadline: Option<Duration>,
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transition deadline
    pub fn transition_deadline(mut self, deadline: Duration) -> Self {
        self.transition_deadline = Some(deadline);
        self
    }
}

/// Handle over the running viewer
pub struct Viewer {
    lifecycle: Arc<Lifecycle>,
    stores: Arc<StoreRegistry>,
    config: ViewerConfig,
}

impl Viewer {
    /// The lifecycle coordinator, for direct transitions and registration
    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    /// The shared store registry
    pub fn stores(&self) -> &Arc<StoreRegistry> {
        &self.stores
    }

    /// Current lifecycle phase
    pub fn state(&self) -> ToolState {
        self.lifecycle.current_state()
    }

    async fn switch(&self, next: ToolState) -> Result<bool> {
        let switched = match self.config.transition_deadline {
            Some(deadline) => self.lifecycle.switch_state_within(next, deadline).await?,
            None => self.lifecycle.switch_state(next).await?,
        };
        Ok(switched)
    }

    /// A decoded bundle was dropped on the tool.
    ///
    /// From the idle display this enters the load phase; over an active
    /// asset it enters the replace phase (which tears down and then loads
    /// the pending bundle). In any other phase the drop is ignored with a
    /// warning, matching how stale input is treated everywhere else.
    pub async fn asset_dropped(&self) -> Result<()> {
        let target = match self.state() {
            ToolState::EmptyDisplay => ToolState::LoadAsset,
            ToolState::ActiveDisplay => ToolState::ReplaceAsset,
            state => {
                warn!(?state, "dropped asset ignored in this phase");
                return Ok(());
            }
        };
        if !self.switch(target).await? {
            warn!(to = ?target, "drop transition rejected");
        }
        Ok(())
    }

    /// Remove the mounted asset and return to the idle display
    pub async fn clear_asset(&self) -> Result<()> {
        if !self.switch(ToolState::ClearAsset).await? {
            warn!(state = ?self.state(), "clear ignored in this phase");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer").field("state", &self.state()).finish()
    }
}

/// Build the component set, install the coordinator and bring the tool up
/// to the idle display.
pub async fn bootstrap(bindings: HostBindings, config: ViewerConfig) -> Result<Viewer> {
    let stores = StoreRegistry::new();

    let surface = Surface::new(bindings.scene.clone());
    let viewport = Viewport::new(stores.clone(), bindings.scene, bindings.assets);
    let animation_list = AnimationListPanel::new(stores.clone(), bindings.animation_list);
    let timeline = TimelinePanel::new(
        stores.clone(),
        bindings.transport,
        viewport.clone() as Arc<dyn PlaybackControl>,
    );
    let options = PlaybackOptionsPanel::new(stores.clone(), bindings.options);
    let metadata = MetadataPanel::new(stores.clone(), bindings.stats);

    // Registration order is handler invocation order.
    let lifecycle = Lifecycle::install(vec![
        surface,
        viewport.clone() as Arc<dyn Component>,
        animation_list,
        timeline,
        options,
        metadata,
    ]);
    viewport.attach_lifecycle(&lifecycle);

    let viewer = Viewer {
        lifecycle,
        stores,
        config,
    };
    for state in [ToolState::InitUi, ToolState::EmptyDisplay] {
        if !viewer.switch(state).await? {
            return Err(ViewerError::Bootstrap(format!(
                "transition into {state:?} rejected"
            )));
        }
    }
    info!("viewer ready");
    Ok(viewer)
}
