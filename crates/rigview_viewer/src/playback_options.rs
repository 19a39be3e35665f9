//! Playback options panel

use std::sync::Arc;

use async_trait::async_trait;

use rigview_core::{Component, ComponentResult, StoreRegistry, Subscriptions};

use crate::views::{OptionsView, PlaybackOption};

/// Checkbox group for the debug-bounds and loop toggles; owns the
/// `draw_bounds` and `loop_playback` stores.
///
/// The stores are also subscribed back into the view, so a programmatic
/// reset is reflected on the checkboxes without extra wiring.
pub struct PlaybackOptionsPanel {
    stores: Arc<StoreRegistry>,
    view: Arc<dyn OptionsView>,
    subs: Subscriptions,
}

impl PlaybackOptionsPanel {
    pub fn new(stores: Arc<StoreRegistry>, view: Arc<dyn OptionsView>) -> Arc<Self> {
        Arc::new(Self {
            stores,
            view,
            subs: Subscriptions::new(),
        })
    }

    fn reset_defaults(&self) {
        // Bounds overlay off, looping on.
        self.stores.draw_bounds.set(false);
        self.stores.loop_playback.set(true);
    }
}

#[async_trait]
impl Component for PlaybackOptionsPanel {
    fn name(&self) -> &str {
        "playback_options"
    }

    async fn on_init_ui(&self) -> ComponentResult {
        self.subs.dispose_all();

        let stores = self.stores.clone();
        self.view.on_toggle(Box::new(move |option, checked| match option {
            PlaybackOption::DrawBounds => stores.draw_bounds.set(checked),
            PlaybackOption::LoopPlayback => stores.loop_playback.set(checked),
        }));

        let view = self.view.clone();
        self.subs
            .track(self.stores.draw_bounds.subscribe(move |checked: &bool| {
                view.set_checked(PlaybackOption::DrawBounds, *checked);
            }));

        let view = self.view.clone();
        self.subs
            .track(self.stores.loop_playback.subscribe(move |checked: &bool| {
                view.set_checked(PlaybackOption::LoopPlayback, *checked);
            }));

        self.reset_defaults();
        Ok(())
    }

    async fn on_empty_display(&self) -> ComponentResult {
        self.reset_defaults();
        Ok(())
    }

    async fn on_clear_asset(&self) -> ComponentResult {
        self.reset_defaults();
        Ok(())
    }
}
