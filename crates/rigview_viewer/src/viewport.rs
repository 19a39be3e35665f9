//! Viewport component: mounts assets and drives the rig from store changes

use std::sync::{Arc, Mutex, OnceLock, Weak};

use async_trait::async_trait;
use tracing::{info, warn};

use rigview_core::{
    Component, ComponentResult, Lifecycle, StoreRegistry, Subscriptions, ToolState,
};

use crate::host::{AssetSource, PlaybackControl, RigInstance, SceneHost};

/// Owns the mounted rig and publishes its data into the stores.
///
/// Writer of `animation_names`, `metadata`, `total_duration`,
/// `timeline_events` and `playback_time` (the last fed by the rig's
/// progress sink). Observes `selected_animation`, `playing`, `draw_bounds`
/// and `loop_playback` while an asset is active and forwards them to the
/// rig.
pub struct Viewport {
    stores: Arc<StoreRegistry>,
    scene: Arc<dyn SceneHost>,
    assets: Arc<dyn AssetSource>,
    rig: Mutex<Option<Arc<dyn RigInstance>>>,
    subs: Subscriptions,
    self_ref: Weak<Viewport>,
    /// Filled by bootstrap once the coordinator exists; Weak because the
    /// coordinator also holds this component.
    lifecycle: OnceLock<Weak<Lifecycle>>,
}

impl Viewport {
    pub fn new(
        stores: Arc<StoreRegistry>,
        scene: Arc<dyn SceneHost>,
        assets: Arc<dyn AssetSource>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            stores,
            scene,
            assets,
            rig: Mutex::new(None),
            subs: Subscriptions::new(),
            self_ref: self_ref.clone(),
            lifecycle: OnceLock::new(),
        })
    }

    /// Wire the coordinator handle used for auto-advancing after a mount
    /// or teardown. Called once by bootstrap.
    pub fn attach_lifecycle(&self, lifecycle: &Arc<Lifecycle>) {
        if self.lifecycle.set(Arc::downgrade(lifecycle)).is_err() {
            warn!("viewport already has a coordinator attached");
        }
    }

    fn advance(&self, next: ToolState) {
        match self.lifecycle.get().and_then(Weak::upgrade) {
            Some(lifecycle) => lifecycle.request_state(next),
            None => warn!(to = ?next, "no coordinator attached, transition dropped"),
        }
    }

    fn current_rig(&self) -> Option<Arc<dyn RigInstance>> {
        self.rig.lock().unwrap().clone()
    }

    /// Start the picked animation and republish its duration and events
    fn play_selected(&self, animation: &str) {
        let Some(rig) = self.current_rig() else {
            return;
        };
        let looped = self.stores.loop_playback.get();
        match rig.play(animation, looped) {
            Ok(()) => {
                info!(animation, looped, "animation started");
                self.stores.total_duration.set(rig.duration());
                self.stores.timeline_events.set(rig.events());
                self.stores.playback_time.set(0.0);
            }
            Err(err) => warn!(animation, error = %err, "failed to start animation"),
        }
    }

    fn reset_owned_stores(&self) {
        self.stores.animation_names.set(Vec::new());
        self.stores.metadata.set(None);
        self.stores.total_duration.set(0.0);
        self.stores.timeline_events.set(Vec::new());
        self.stores.playback_time.set(0.0);
    }

    fn teardown(&self) {
        self.subs.dispose_all();
        if self.rig.lock().unwrap().take().is_some() {
            self.scene.unmount();
        }
        self.reset_owned_stores();
    }
}

impl PlaybackControl for Viewport {
    fn seek(&self, seconds: f32) {
        if let Some(rig) = self.current_rig() {
            rig.seek(seconds);
        }
    }
}

#[async_trait]
impl Component for Viewport {
    fn name(&self) -> &str {
        "viewport"
    }

    async fn on_load_asset(&self) -> ComponentResult {
        let asset = self.assets.acquire().await?;
        info!(asset = %asset.name, "mounting asset");
        let rig = self.scene.mount(&asset).await?;

        let names = rig.animation_names();
        let metadata = rig.metadata();

        // Progress flows from the rig into the playback_time store; the
        // timeline panel only displays it.
        let stores = self.stores.clone();
        rig.observe_time(Box::new(move |seconds| {
            stores.playback_time.set(seconds);
        }));

        *self.rig.lock().unwrap() = Some(rig);

        self.stores.playback_time.set(0.0);
        self.stores.total_duration.set(0.0);
        self.stores.timeline_events.set(Vec::new());
        self.stores.metadata.set(Some(metadata));
        self.stores.animation_names.set(names);

        // Mount finished; bring the tool into the interactive phase.
        self.advance(ToolState::ActiveDisplay);
        Ok(())
    }

    async fn on_active_display(&self) -> ComponentResult {
        // Fresh subscription set per activation; replace/clear cycles must
        // not accumulate callbacks.
        self.subs.dispose_all();

        let me = self.self_ref.clone();
        self.subs.track(self.stores.selected_animation.subscribe(
            move |selected: &Option<String>| {
                let Some(viewport) = me.upgrade() else { return };
                let Some(animation) = selected.as_deref() else { return };
                viewport.play_selected(animation);
            },
        ));

        let me = self.self_ref.clone();
        self.subs
            .track(self.stores.playing.subscribe(move |playing: &bool| {
                if let Some(rig) = me.upgrade().and_then(|viewport| viewport.current_rig()) {
                    rig.set_playing(*playing);
                }
            }));

        let me = self.self_ref.clone();
        self.subs
            .track(self.stores.draw_bounds.subscribe(move |enabled: &bool| {
                if let Some(rig) = me.upgrade().and_then(|viewport| viewport.current_rig()) {
                    rig.set_draw_bounds(*enabled);
                }
            }));

        let me = self.self_ref.clone();
        self.subs
            .track(self.stores.loop_playback.subscribe(move |enabled: &bool| {
                if let Some(rig) = me.upgrade().and_then(|viewport| viewport.current_rig()) {
                    rig.set_loop(*enabled);
                }
            }));

        Ok(())
    }

    async fn on_replace_asset(&self) -> ComponentResult {
        info!("replacing mounted asset");
        self.teardown();
        // The new bundle is already pending; head straight back into load.
        self.advance(ToolState::LoadAsset);
        Ok(())
    }

    async fn on_clear_asset(&self) -> ComponentResult {
        info!("clearing mounted asset");
        self.teardown();
        self.advance(ToolState::EmptyDisplay);
        Ok(())
    }
}
