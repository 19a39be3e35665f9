//! Render-surface bootstrap component

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use rigview_core::{Component, ComponentResult};

use crate::host::SceneHost;

/// Brings the render surface up when the UI scaffolding is wired.
///
/// This is the canonical slow handler of the init phase: surface creation
/// suspends, and the coordinator waits for it together with the other
/// components' handlers.
pub struct Surface {
    scene: Arc<dyn SceneHost>,
}

impl Surface {
    pub fn new(scene: Arc<dyn SceneHost>) -> Arc<Self> {
        Arc::new(Self { scene })
    }
}

#[async_trait]
impl Component for Surface {
    fn name(&self) -> &str {
        "surface"
    }

    async fn on_init_ui(&self) -> ComponentResult {
        self.scene.init_surface().await?;
        info!("render surface ready");
        Ok(())
    }
}
