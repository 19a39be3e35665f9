//! Headless Viewer Demo
//!
//! Drives the full coordination stack against in-memory stand-ins for the
//! renderer, the asset pipe and the widgets, then walks a drop / pick /
//! replace / clear session and prints what each panel would display.
//!
//! Run with: cargo run -p rigview_viewer --example headless

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use rigview_viewer::prelude::*;
use rigview_viewer::{OptionCallback, PickCallback, PressCallback, SeekCallback};

struct DemoRig {
    names: Vec<String>,
    current: Mutex<Option<String>>,
    sink: Mutex<Option<TimeSink>>,
}

impl DemoRig {
    fn new(names: &[String]) -> Arc<Self> {
        Arc::new(Self {
            names: names.to_vec(),
            current: Mutex::new(None),
            sink: Mutex::new(None),
        })
    }

    fn duration_of(&self, animation: &str) -> f32 {
        self.names
            .iter()
            .position(|name| name == animation)
            .map(|index| (index as f32 + 1.0) * 0.4)
            .unwrap_or(0.0)
    }

    /// What a real runtime would report once per rendered frame
    fn tick(&self, seconds: f32) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink(seconds);
        }
    }
}

impl RigInstance for DemoRig {
    fn animation_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn play(&self, animation: &str, looped: bool) -> HostResult<()> {
        println!("[rig] play `{animation}` (looped: {looped})");
        *self.current.lock().unwrap() = Some(animation.to_string());
        Ok(())
    }

    fn set_playing(&self, playing: bool) {
        println!("[rig] playing: {playing}");
    }

    fn seek(&self, seconds: f32) {
        println!("[rig] seek to {seconds:.2}s");
        self.tick(seconds);
    }

    fn duration(&self) -> f32 {
        self.current
            .lock()
            .unwrap()
            .as_deref()
            .map(|animation| self.duration_of(animation))
            .unwrap_or(0.0)
    }

    fn events(&self) -> Vec<TimelineEvent> {
        let Some(animation) = self.current.lock().unwrap().clone() else {
            return Vec::new();
        };
        vec![TimelineEvent {
            name: format!("{animation}_footstep"),
            time: self.duration_of(&animation) * 0.5,
            int_value: 0,
            float_value: 0.0,
            string_value: String::new(),
        }]
    }

    fn set_draw_bounds(&self, enabled: bool) {
        println!("[rig] draw bounds: {enabled}");
    }

    fn set_loop(&self, enabled: bool) {
        println!("[rig] loop: {enabled}");
    }

    fn metadata(&self) -> AssetMetadata {
        AssetMetadata {
            draw_calls: 2,
            vertex_count: 1_204,
            triangle_count: 602,
        }
    }

    fn observe_time(&self, sink: TimeSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }
}

struct DemoScene {
    catalog: HashMap<String, Vec<String>>,
    rig: Mutex<Option<Arc<DemoRig>>>,
}

impl DemoScene {
    fn new() -> Arc<Self> {
        let mut catalog = HashMap::new();
        catalog.insert(
            "swordsman".to_string(),
            vec!["idle".to_string(), "run".to_string(), "slash".to_string()],
        );
        catalog.insert(
            "archer".to_string(),
            vec!["aim".to_string(), "loose".to_string()],
        );
        Arc::new(Self {
            catalog,
            rig: Mutex::new(None),
        })
    }

    fn rig(&self) -> Option<Arc<DemoRig>> {
        self.rig.lock().unwrap().clone()
    }
}

#[async_trait]
impl SceneHost for DemoScene {
    async fn init_surface(&self) -> HostResult<()> {
        // Stands in for adapter and swapchain setup.
        tokio::time::sleep(Duration::from_millis(10)).await;
        println!("[scene] surface up");
        Ok(())
    }

    async fn mount(&self, asset: &RigAsset) -> HostResult<Arc<dyn RigInstance>> {
        let names = self.catalog.get(&asset.name).ok_or_else(|| HostError::Mount {
            name: asset.name.clone(),
            reason: "unknown bundle".into(),
        })?;
        println!("[scene] mounted `{}`", asset.name);
        let rig = DemoRig::new(names);
        *self.rig.lock().unwrap() = Some(rig.clone());
        Ok(rig)
    }

    fn unmount(&self) {
        if self.rig.lock().unwrap().take().is_some() {
            println!("[scene] unmounted");
        }
    }
}

#[derive(Default)]
struct DemoSource {
    staged: Mutex<Vec<RigAsset>>,
}

impl DemoSource {
    fn stage(&self, asset: RigAsset) {
        self.staged.lock().unwrap().push(asset);
    }
}

#[async_trait]
impl AssetSource for DemoSource {
    async fn acquire(&self) -> HostResult<RigAsset> {
        let mut staged = self.staged.lock().unwrap();
        if staged.is_empty() {
            return Err(HostError::AssetUnavailable);
        }
        Ok(staged.remove(0))
    }
}

#[derive(Default)]
struct ConsoleList {
    pick: Mutex<Option<PickCallback>>,
}

impl ConsoleList {
    fn pick(&self, animation: &str) {
        if let Some(callback) = self.pick.lock().unwrap().as_ref() {
            callback(animation.to_string());
        }
    }
}

impl ListView for ConsoleList {
    fn set_items(&self, items: &[String]) {
        println!("[list] {items:?}");
    }

    fn set_selected(&self, selected: Option<&str>) {
        println!("[list] selected: {selected:?}");
    }

    fn on_pick(&self, callback: PickCallback) {
        *self.pick.lock().unwrap() = Some(callback);
    }
}

#[derive(Default)]
struct ConsoleTransport {
    toggle: Mutex<Option<PressCallback>>,
    seek: Mutex<Option<SeekCallback>>,
}

impl ConsoleTransport {
    fn press_play(&self) {
        if let Some(callback) = self.toggle.lock().unwrap().as_ref() {
            callback();
        }
    }

    fn scrub(&self, seconds: f32) {
        if let Some(callback) = self.seek.lock().unwrap().as_ref() {
            callback(seconds);
        }
    }
}

impl TransportView for ConsoleTransport {
    fn set_progress(&self, seconds: f32, duration: f32) {
        println!("[transport] {seconds:.2}s / {duration:.2}s");
    }

    fn set_playing(&self, playing: bool) {
        println!("[transport] playing: {playing}");
    }

    fn set_event_markers(&self, events: &[TimelineEvent]) {
        let names: Vec<&str> = events.iter().map(|event| event.name.as_str()).collect();
        println!("[transport] markers: {names:?}");
    }

    fn on_toggle_play(&self, callback: PressCallback) {
        *self.toggle.lock().unwrap() = Some(callback);
    }

    fn on_seek(&self, callback: SeekCallback) {
        *self.seek.lock().unwrap() = Some(callback);
    }
}

#[derive(Default)]
struct ConsoleOptions {
    toggle: Mutex<Option<OptionCallback>>,
}

impl ConsoleOptions {
    fn flip(&self, option: PlaybackOption, checked: bool) {
        if let Some(callback) = self.toggle.lock().unwrap().as_ref() {
            callback(option, checked);
        }
    }
}

impl OptionsView for ConsoleOptions {
    fn set_checked(&self, option: PlaybackOption, checked: bool) {
        println!("[options] {option:?}: {checked}");
    }

    fn on_toggle(&self, callback: OptionCallback) {
        *self.toggle.lock().unwrap() = Some(callback);
    }
}

struct ConsoleStats;

impl StatsView for ConsoleStats {
    fn show(&self, metadata: &AssetMetadata) {
        println!(
            "[stats] {} draw calls, {} vertices, {} triangles",
            metadata.draw_calls, metadata.vertex_count, metadata.triangle_count
        );
    }

    fn clear(&self) {
        println!("[stats] -");
    }
}

/// Wait out the deferred transitions the viewport requests after a mount
/// or teardown
async fn settle(viewer: &Viewer, state: ToolState) {
    for _ in 0..100 {
        if viewer.state() == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("viewer stuck in {:?}", viewer.state());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    let scene = DemoScene::new();
    let source = Arc::new(DemoSource::default());
    let list = Arc::new(ConsoleList::default());
    let transport = Arc::new(ConsoleTransport::default());
    let options = Arc::new(ConsoleOptions::default());

    let bindings = HostBindings {
        scene: scene.clone(),
        assets: source.clone(),
        animation_list: list.clone(),
        transport: transport.clone(),
        options: options.clone(),
        stats: Arc::new(ConsoleStats),
    };
    let viewer = bootstrap(bindings, ViewerConfig::new()).await?;

    println!("-- drop `swordsman` --");
    source.stage(RigAsset::named("swordsman"));
    viewer.asset_dropped().await?;
    settle(&viewer, ToolState::ActiveDisplay).await;

    println!("-- pick `run` and let it play --");
    list.pick("run");
    let rig = scene.rig().expect("rig mounted");
    for frame in 1..=3 {
        rig.tick(frame as f32 * 0.1);
    }

    println!("-- pause, scrub, tweak options --");
    transport.press_play();
    transport.scrub(0.2);
    options.flip(PlaybackOption::DrawBounds, true);
    options.flip(PlaybackOption::LoopPlayback, false);

    println!("-- replace with `archer` --");
    source.stage(RigAsset::named("archer"));
    viewer.asset_dropped().await?;
    settle(&viewer, ToolState::ActiveDisplay).await;
    list.pick("aim");

    println!("-- clear --");
    viewer.clear_asset().await?;
    settle(&viewer, ToolState::EmptyDisplay).await;

    println!("final state: {:?}", viewer.state());
    Ok(())
}
