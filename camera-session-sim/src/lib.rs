//! # camera-session-sim
//!
//! Simulated host backend for camera-session-core.
//!
//! Provides:
//! - `SimulatedCamera`: `CameraHardware` on the tokio clock with scripted failures
//! - `ScriptedPermissions`: `PermissionProvider` with queued prompt answers
//! - `CollectingComposer`: `PostComposer` that keeps every submission
//! - `EventRecorder`: `SessionDelegate` that logs and records notifications
//!
//! ## Usage
//! ```ignore
//! use camera_session_core::{CaptureSession, SessionOptions};
//! use camera_session_sim::{CollectingComposer, ScriptedPermissions, SimulatedCamera};
//!
//! let session = CaptureSession::mount(
//!     SimulatedCamera::new(),
//!     ScriptedPermissions::granted(),
//!     CollectingComposer::new(),
//!     SessionOptions::default(),
//! )
//! .await?;
//! session.capture_photo().await?;
//! session.share()?;
//! ```

pub mod composer;
pub mod event_recorder;
pub mod scripted_permissions;
pub mod simulated_camera;

pub use composer::CollectingComposer;
pub use event_recorder::{EventRecorder, SessionEvent};
pub use scripted_permissions::ScriptedPermissions;
pub use simulated_camera::SimulatedCamera;
