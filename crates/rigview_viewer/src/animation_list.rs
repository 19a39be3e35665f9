//! Animation list panel

use std::sync::Arc;

use async_trait::async_trait;

use rigview_core::{Component, ComponentResult, StoreRegistry, Subscriptions};

use crate::views::ListView;

/// Lists the mounted asset's animations and owns the selection store.
///
/// The displayed entries follow `animation_names`, so the list empties
/// itself when the viewport resets that store on teardown; this panel only
/// has to drop the stale selection.
pub struct AnimationListPanel {
    stores: Arc<StoreRegistry>,
    view: Arc<dyn ListView>,
    subs: Subscriptions,
}

impl AnimationListPanel {
    pub fn new(stores: Arc<StoreRegistry>, view: Arc<dyn ListView>) -> Arc<Self> {
        Arc::new(Self {
            stores,
            view,
            subs: Subscriptions::new(),
        })
    }

    fn clear_selection(&self) {
        self.stores.selected_animation.set(None);
    }
}

#[async_trait]
impl Component for AnimationListPanel {
    fn name(&self) -> &str {
        "animation_list"
    }

    async fn on_init_ui(&self) -> ComponentResult {
        self.subs.dispose_all();

        // Picks flow from the widget into the selection store.
        let stores = self.stores.clone();
        self.view.on_pick(Box::new(move |animation| {
            stores.selected_animation.set(Some(animation));
        }));

        let view = self.view.clone();
        self.subs
            .track(self.stores.animation_names.subscribe(move |names: &Vec<String>| {
                view.set_items(names);
            }));

        let view = self.view.clone();
        self.subs.track(self.stores.selected_animation.subscribe(
            move |selected: &Option<String>| {
                view.set_selected(selected.as_deref());
            },
        ));

        Ok(())
    }

    async fn on_empty_display(&self) -> ComponentResult {
        self.clear_selection();
        Ok(())
    }

    async fn on_replace_asset(&self) -> ComponentResult {
        // The incoming asset has its own animation set; a carried-over
        // selection would point at nothing.
        self.clear_selection();
        Ok(())
    }

    async fn on_clear_asset(&self) -> ComponentResult {
        self.clear_selection();
        Ok(())
    }
}
