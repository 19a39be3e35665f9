//! Tool lifecycle state machine and handler fan-out
//!
//! The viewer moves through a fixed set of phases:
//!
//! ```text
//! RunTool -> InitUi -> EmptyDisplay -> LoadAsset -> ActiveDisplay
//!                           ^                            |
//!                           |                            +-> ClearAsset -> EmptyDisplay
//!                           |                            +-> ReplaceAsset -> LoadAsset
//! ```
//!
//! [`Lifecycle`] owns the current state and the registered components. An
//! accepted transition commits the new state first, then invokes the
//! handler bound to that state on every registered component and awaits
//! them jointly; a rejected transition is not an error, it returns
//! `Ok(false)` and leaves the machine untouched.
//!
//! Construction returns an `Arc<Lifecycle>` meant to be threaded through
//! the application explicitly. [`Lifecycle::install`] additionally
//! publishes the handle process-wide for code without access to the
//! context (the original tool grew around that global; new code should
//! prefer the explicit handle).
//!
//! # Example
//!
//! ```ignore
//! use rigview_core::{Component, Lifecycle, ToolState};
//!
//! let lifecycle = Lifecycle::new(vec![viewport, timeline]);
//! assert_eq!(lifecycle.current_state(), ToolState::RunTool);
//!
//! lifecycle.switch_state(ToolState::InitUi).await?;
//! assert!(!lifecycle.switch_state(ToolState::ActiveDisplay).await?); // rejected
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error, warn};

use crate::component::Component;
use crate::error::{ComponentResult, LifecycleError, Result};

/// Phases of the viewer tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolState {
    /// Process entry; nothing is built yet
    RunTool,
    /// UI scaffolding is being wired
    InitUi,
    /// No asset mounted, idle hint visible
    EmptyDisplay,
    /// A pending asset bundle is being mounted
    LoadAsset,
    /// A mounted asset is displayed and interactive
    ActiveDisplay,
    /// The mounted asset is being removed
    ClearAsset,
    /// The mounted asset is being swapped for a new bundle
    ReplaceAsset,
}

impl ToolState {
    /// Every state, in declaration order
    pub const ALL: [ToolState; 7] = [
        ToolState::RunTool,
        ToolState::InitUi,
        ToolState::EmptyDisplay,
        ToolState::LoadAsset,
        ToolState::ActiveDisplay,
        ToolState::ClearAsset,
        ToolState::ReplaceAsset,
    ];

    /// States reachable from `self` in a single transition
    pub fn reachable(self) -> &'static [ToolState] {
        use ToolState::*;
        match self {
            RunTool => &[InitUi],
            InitUi => &[EmptyDisplay],
            EmptyDisplay => &[LoadAsset],
            LoadAsset => &[ActiveDisplay],
            ActiveDisplay => &[ClearAsset, ReplaceAsset],
            ClearAsset => &[EmptyDisplay],
            ReplaceAsset => &[LoadAsset],
        }
    }

    /// Whether `next` is a legal single transition from `self`
    pub fn can_reach(self, next: ToolState) -> bool {
        self.reachable().contains(&next)
    }
}

/// Identifier handed out at registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

struct Registration {
    id: ComponentId,
    component: Arc<dyn Component>,
}

impl Clone for Registration {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            component: self.component.clone(),
        }
    }
}

/// Invoke the handler bound to `state` on one component.
///
/// `RunTool` has no entry handler; dispatching it is a no-op, which also
/// makes the registration replay of a not-yet-started machine a no-op.
async fn dispatch(component: Arc<dyn Component>, state: ToolState) -> ComponentResult {
    match state {
        ToolState::RunTool => Ok(()),
        ToolState::InitUi => component.on_init_ui().await,
        ToolState::EmptyDisplay => component.on_empty_display().await,
        ToolState::LoadAsset => component.on_load_asset().await,
        ToolState::ActiveDisplay => component.on_active_display().await,
        ToolState::ReplaceAsset => component.on_replace_asset().await,
        ToolState::ClearAsset => component.on_clear_asset().await,
    }
}

/// Coordinates lifecycle transitions across the registered components
pub struct Lifecycle {
    state: Mutex<ToolState>,
    components: Mutex<Vec<Registration>>,
    next_component_id: AtomicU64,
    /// Fair async mutex serializing handler phases; queued transitions run
    /// in arrival order
    gate: tokio::sync::Mutex<()>,
}

/// The process-wide handle published by `Lifecycle::install`
static INSTALLED: RwLock<Option<Arc<Lifecycle>>> = RwLock::new(None);

impl Lifecycle {
    /// Build a coordinator in `RunTool` with the given ordered components.
    ///
    /// Registration order is also handler invocation order and the order
    /// failures are reported in. The global handle is not touched; see
    /// [`Lifecycle::install`].
    pub fn new(components: Vec<Arc<dyn Component>>) -> Arc<Self> {
        let lifecycle = Self {
            state: Mutex::new(ToolState::RunTool),
            components: Mutex::new(Vec::new()),
            next_component_id: AtomicU64::new(0),
            gate: tokio::sync::Mutex::new(()),
        };
        {
            let mut registrations = lifecycle.components.lock().unwrap();
            for component in components {
                let id = ComponentId(lifecycle.next_component_id.fetch_add(1, Ordering::Relaxed));
                registrations.push(Registration { id, component });
            }
        }
        Arc::new(lifecycle)
    }

    /// [`Lifecycle::new`] plus publishing the handle process-wide.
    ///
    /// Installing again replaces the previous handle (last writer wins);
    /// the application is expected to install exactly once at bootstrap.
    pub fn install(components: Vec<Arc<dyn Component>>) -> Arc<Self> {
        let lifecycle = Self::new(components);
        let mut slot = INSTALLED.write().unwrap();
        if slot.is_some() {
            warn!("replacing previously installed lifecycle coordinator");
        }
        *slot = Some(lifecycle.clone());
        lifecycle
    }

    /// The installed process-wide handle.
    ///
    /// Fails with [`LifecycleError::NotInitialized`] before any `install`.
    pub fn global() -> Result<Arc<Self>> {
        Self::try_global().ok_or(LifecycleError::NotInitialized)
    }

    /// Non-erroring variant of [`Lifecycle::global`]
    pub fn try_global() -> Option<Arc<Self>> {
        INSTALLED.read().unwrap().clone()
    }

    /// The state the machine is currently in
    pub fn current_state(&self) -> ToolState {
        *self.state.lock().unwrap()
    }

    /// Number of registered components
    pub fn component_count(&self) -> usize {
        self.components.lock().unwrap().len()
    }

    /// Ids of the registered components, in registration order
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components
            .lock()
            .unwrap()
            .iter()
            .map(|registration| registration.id)
            .collect()
    }

    /// Attempt a transition into `next`.
    ///
    /// Returns `Ok(false)` without side effects when `next` is not
    /// reachable from the current state (expected for stale user input).
    /// Otherwise the state is committed, every registered component's
    /// handler for `next` runs, and the call resolves once all of them
    /// completed. If any failed, the first failure in registration order is
    /// returned after the others finished; the state stays committed.
    ///
    /// Must not be awaited from inside a component handler; the phase gate
    /// is held while handlers run. Use [`Lifecycle::request_state`] there.
    pub async fn switch_state(&self, next: ToolState) -> Result<bool> {
        self.switch_state_inner(next, None).await
    }

    /// [`Lifecycle::switch_state`] with a deadline on the handler fan-out.
    ///
    /// On expiry the joint fan-out future is dropped, cancelling in-flight
    /// handlers at their next suspension point, and
    /// [`LifecycleError::HandlerTimeout`] is returned. The machine stays in
    /// the committed target state and accepts further transitions.
    pub async fn switch_state_within(&self, next: ToolState, deadline: Duration) -> Result<bool> {
        self.switch_state_inner(next, Some(deadline)).await
    }

    async fn switch_state_inner(&self, next: ToolState, deadline: Option<Duration>) -> Result<bool> {
        let _phase = self.gate.lock().await;

        let current = *self.state.lock().unwrap();
        if !current.can_reach(next) {
            warn!(from = ?current, to = ?next, "transition rejected");
            return Ok(false);
        }

        // Committed before the fan-out; handler failures do not roll back.
        *self.state.lock().unwrap() = next;
        debug!(from = ?current, to = ?next, "transition");

        let snapshot: Vec<Registration> = self.components.lock().unwrap().clone();
        let fanout = join_all(
            snapshot
                .iter()
                .map(|registration| dispatch(registration.component.clone(), next)),
        );
        let results = match deadline {
            None => fanout.await,
            Some(limit) => match tokio::time::timeout(limit, fanout).await {
                Ok(results) => results,
                Err(_) => {
                    error!(state = ?next, deadline = ?limit, "handler fan-out abandoned at deadline");
                    return Err(LifecycleError::HandlerTimeout {
                        state: next,
                        deadline: limit,
                    });
                }
            },
        };

        let mut first_failure = None;
        for (registration, result) in snapshot.iter().zip(results) {
            if let Err(source) = result {
                error!(
                    component = registration.component.name(),
                    state = ?next,
                    error = %source,
                    "state handler failed"
                );
                if first_failure.is_none() {
                    first_failure = Some(LifecycleError::HandlerFailure {
                        component: registration.component.name().to_string(),
                        state: next,
                        source,
                    });
                }
            }
        }
        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(true),
        }
    }

    /// Register an additional component.
    ///
    /// The newcomer is appended to the invocation order and caught up by a
    /// synthetic replay of the current state's entry handler, run on it
    /// alone under the phase gate (so the replay never interleaves with a
    /// fan-out). A replay failure is reported as [`HandlerFailure`] but the
    /// registration stands; unregister if the component is unusable.
    ///
    /// Like `switch_state`, must not be awaited from inside a handler.
    ///
    /// [`HandlerFailure`]: LifecycleError::HandlerFailure
    pub async fn register(&self, component: Arc<dyn Component>) -> Result<ComponentId> {
        let _phase = self.gate.lock().await;

        let id = ComponentId(self.next_component_id.fetch_add(1, Ordering::Relaxed));
        self.components.lock().unwrap().push(Registration {
            id,
            component: component.clone(),
        });
        let current = *self.state.lock().unwrap();
        debug!(component = component.name(), state = ?current, "component registered");

        if let Err(source) = dispatch(component.clone(), current).await {
            error!(
                component = component.name(),
                state = ?current,
                error = %source,
                "registration replay failed"
            );
            return Err(LifecycleError::HandlerFailure {
                component: component.name().to_string(),
                state: current,
                source,
            });
        }
        Ok(id)
    }

    /// Remove a registration; returns whether it was present.
    ///
    /// A fan-out already in flight runs against its snapshot and is not
    /// affected; the component simply stops participating afterwards.
    pub fn unregister(&self, id: ComponentId) -> bool {
        let mut components = self.components.lock().unwrap();
        let before = components.len();
        components.retain(|registration| registration.id != id);
        let removed = components.len() != before;
        if removed {
            debug!(?id, "component unregistered");
        } else {
            warn!(?id, "unregister of unknown component ignored");
        }
        removed
    }

    /// Request a transition without waiting for it.
    ///
    /// Spawns `switch_state` onto the current runtime and logs its outcome.
    /// This is the safe way to advance the machine from inside a component
    /// handler, where awaiting `switch_state` would deadlock on the phase
    /// gate. Outside a runtime the request is dropped with a warning.
    pub fn request_state(self: Arc<Self>, next: ToolState) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match self.switch_state(next).await {
                        Ok(true) => {}
                        Ok(false) => warn!(to = ?next, "requested transition rejected"),
                        Err(err) => error!(to = ?next, error = %err, "requested transition failed"),
                    }
                });
            }
            Err(_) => warn!(to = ?next, "transition request dropped outside async runtime"),
        }
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("state", &self.current_state())
            .field("components", &self.component_count())
            .finish()
    }
}

/// Request a transition on the installed coordinator.
///
/// Convenience for component code reacting to user actions without access
/// to the lifecycle handle. Drops the request with a warning when no
/// coordinator is installed.
pub fn request_transition(next: ToolState) {
    match Lifecycle::try_global() {
        Some(lifecycle) => lifecycle.request_state(next),
        None => warn!(to = ?next, "transition request dropped, no coordinator installed"),
    }
}
