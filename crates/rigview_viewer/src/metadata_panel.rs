//! Asset statistics panel

use std::sync::Arc;

use async_trait::async_trait;

use rigview_core::{AssetMetadata, Component, ComponentResult, StoreRegistry, Subscriptions};

use crate::views::StatsView;

/// Read-only readout of the mounted asset's render statistics.
///
/// Writes no store; the display follows `metadata` and blanks itself when
/// the viewport resets it to `None`.
pub struct MetadataPanel {
    stores: Arc<StoreRegistry>,
    view: Arc<dyn StatsView>,
    subs: Subscriptions,
}

impl MetadataPanel {
    pub fn new(stores: Arc<StoreRegistry>, view: Arc<dyn StatsView>) -> Arc<Self> {
        Arc::new(Self {
            stores,
            view,
            subs: Subscriptions::new(),
        })
    }
}

#[async_trait]
impl Component for MetadataPanel {
    fn name(&self) -> &str {
        "metadata_panel"
    }

    async fn on_init_ui(&self) -> ComponentResult {
        self.subs.dispose_all();

        let view = self.view.clone();
        self.subs.track(self.stores.metadata.subscribe(
            move |metadata: &Option<AssetMetadata>| match metadata {
                Some(metadata) => view.show(metadata),
                None => view.clear(),
            },
        ));

        Ok(())
    }
}
