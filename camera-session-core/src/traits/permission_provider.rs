use async_trait::async_trait;

use crate::models::permission::PermissionResponse;

/// Host platform camera permission API.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Current permission without prompting the user.
    async fn check_permission(&self) -> Result<PermissionResponse, String>;

    /// Prompt the user. Resolves once they answer; `Ok(false)` is a denial.
    async fn request_permission(&self) -> Result<bool, String>;
}
