//! Error types for rigview_viewer

use thiserror::Error;

use rigview_core::LifecycleError;

/// Errors produced by the scene-host, asset-source and rig collaborators
#[derive(Error, Debug)]
pub enum HostError {
    /// The render surface could not be created
    #[error("render surface initialization failed: {0}")]
    SurfaceInit(String),

    /// No decoded bundle is waiting to be mounted
    #[error("no asset bundle is pending")]
    AssetUnavailable,

    /// Mounting a decoded bundle into the scene failed
    #[error("mounting asset `{name}` failed: {reason}")]
    Mount { name: String, reason: String },

    /// A playback operation on the mounted rig failed
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Result type for collaborator operations
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Errors that can occur while bootstrapping or driving the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A lifecycle transition failed
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The composition root could not bring the tool up
    #[error("viewer bootstrap failed: {0}")]
    Bootstrap(String),
}

/// Result type for rigview_viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
