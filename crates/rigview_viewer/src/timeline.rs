//! Timeline transport panel

use std::sync::Arc;

use async_trait::async_trait;

use rigview_core::{Component, ComponentResult, StoreRegistry, Subscriptions, TimelineEvent};

use crate::host::PlaybackControl;
use crate::views::TransportView;

/// Play/pause and scrub control; owns the `playing` store.
///
/// Display data (position, duration, event markers) is read-only here: it
/// flows from the rig through the viewport's stores. Scrubbing goes the
/// other way, through [`PlaybackControl`] straight to the rig, and comes
/// back as progress; routing it through `playback_time` instead would echo
/// every displayed frame back into the rig.
pub struct TimelinePanel {
    stores: Arc<StoreRegistry>,
    view: Arc<dyn TransportView>,
    playback: Arc<dyn PlaybackControl>,
    subs: Subscriptions,
}

impl TimelinePanel {
    pub fn new(
        stores: Arc<StoreRegistry>,
        view: Arc<dyn TransportView>,
        playback: Arc<dyn PlaybackControl>,
    ) -> Arc<Self> {
        Arc::new(Self {
            stores,
            view,
            playback,
            subs: Subscriptions::new(),
        })
    }

    fn stop(&self) {
        self.stores.playing.set(false);
    }
}

#[async_trait]
impl Component for TimelinePanel {
    fn name(&self) -> &str {
        "timeline"
    }

    async fn on_init_ui(&self) -> ComponentResult {
        self.subs.dispose_all();

        let stores = self.stores.clone();
        self.view.on_toggle_play(Box::new(move || {
            let playing = !stores.playing.get();
            stores.playing.set(playing);
        }));

        let playback = self.playback.clone();
        self.view.on_seek(Box::new(move |seconds| {
            playback.seek(seconds);
        }));

        let view = self.view.clone();
        let stores = self.stores.clone();
        self.subs
            .track(self.stores.playback_time.subscribe(move |seconds: &f32| {
                view.set_progress(*seconds, stores.total_duration.get());
            }));

        let view = self.view.clone();
        let stores = self.stores.clone();
        self.subs
            .track(self.stores.total_duration.subscribe(move |duration: &f32| {
                view.set_progress(stores.playback_time.get(), *duration);
            }));

        let view = self.view.clone();
        self.subs
            .track(self.stores.playing.subscribe(move |playing: &bool| {
                view.set_playing(*playing);
            }));

        let view = self.view.clone();
        self.subs.track(self.stores.timeline_events.subscribe(
            move |events: &Vec<TimelineEvent>| {
                view.set_event_markers(events);
            },
        ));

        self.stop();
        Ok(())
    }

    async fn on_empty_display(&self) -> ComponentResult {
        self.stop();
        Ok(())
    }

    async fn on_load_asset(&self) -> ComponentResult {
        self.stop();
        Ok(())
    }

    async fn on_active_display(&self) -> ComponentResult {
        // Arm the transport as soon as the asset is interactive; the rig
        // starts moving once an animation is picked.
        self.stores.playing.set(true);
        Ok(())
    }

    async fn on_replace_asset(&self) -> ComponentResult {
        self.stop();
        Ok(())
    }

    async fn on_clear_asset(&self) -> ComponentResult {
        self.stop();
        Ok(())
    }
}
