pub mod camera_hardware;
pub mod permission_provider;
pub mod post_composer;
pub mod session_delegate;
