//! # camera-session-core
//!
//! Platform-agnostic camera capture session.
//!
//! Coordinates one camera across mutually exclusive operations (still photo,
//! time-bounded video recording), tracks capture settings, and holds the
//! result for a review / discard / share decision. Platform backends
//! implement `CameraHardware` and `PermissionProvider` and plug into the
//! generic `CaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! camera-session-core (this crate)
//! ├── traits/    ← CameraHardware, PermissionProvider, PostComposer, SessionDelegate
//! ├── models/    ← CaptureError, SessionState, CaptureConfiguration, CapturedMedia, etc.
//! └── session/   ← CaptureSession (state machine), PermissionGate, ReviewHandoff
//! ```

pub mod models;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{
    CameraFacing, CaptureConfiguration, CaptureMode, FlashMode, PhotoOptions, RecordingOptions,
    SessionOptions, VideoQuality,
};
pub use models::error::CaptureError;
pub use models::media::{CapturedMedia, MediaKind};
pub use models::permission::{PermissionResponse, PermissionStatus};
pub use models::state::{OperationId, SessionState};
pub use session::controller::CaptureSession;
pub use session::gate::PermissionGate;
pub use session::review::ReviewHandoff;
pub use traits::camera_hardware::{CameraHardware, PhotoOutput, RecordingRequest, VideoOutput};
pub use traits::permission_provider::PermissionProvider;
pub use traits::post_composer::PostComposer;
pub use traits::session_delegate::SessionDelegate;
