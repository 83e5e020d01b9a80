use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::models::permission::PermissionStatus;
use crate::traits::permission_provider::PermissionProvider;

/// Tracks camera permission on behalf of a session.
///
/// Reports `Loading` until the first check resolves. Never retries on its
/// own; every prompt is an explicit `request` from the caller.
pub struct PermissionGate<P: PermissionProvider> {
    provider: P,
    status: Mutex<PermissionStatus>,
}

impl<P: PermissionProvider> PermissionGate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            status: Mutex::new(PermissionStatus::Loading),
        }
    }

    pub fn status(&self) -> PermissionStatus {
        *self.status.lock()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Query the platform without prompting.
    ///
    /// On a platform error the status stays as it was.
    pub async fn check(&self) -> Result<PermissionStatus, CaptureError> {
        let response = self
            .provider
            .check_permission()
            .await
            .map_err(CaptureError::PermissionUnavailable)?;
        let status = PermissionStatus::from(response);
        *self.status.lock() = status;
        Ok(status)
    }

    /// Prompt the user. A denial is a normal `Ok(false)`.
    pub async fn request(&self) -> Result<bool, CaptureError> {
        let granted = self
            .provider
            .request_permission()
            .await
            .map_err(CaptureError::PermissionUnavailable)?;

        *self.status.lock() = if granted {
            PermissionStatus::Granted
        } else {
            log::info!("camera permission denied");
            PermissionStatus::Denied { can_request: true }
        };
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;

    use super::*;
    use crate::models::permission::PermissionResponse;

    struct Answers {
        check: Result<PermissionResponse, String>,
        requests: Mutex<VecDeque<Result<bool, String>>>,
    }

    #[async_trait]
    impl PermissionProvider for Answers {
        async fn check_permission(&self) -> Result<PermissionResponse, String> {
            self.check.clone()
        }

        async fn request_permission(&self) -> Result<bool, String> {
            self.requests.lock().pop_front().unwrap_or(Ok(false))
        }
    }

    fn gate(
        check: Result<PermissionResponse, String>,
        requests: Vec<Result<bool, String>>,
    ) -> PermissionGate<Answers> {
        PermissionGate::new(Answers {
            check,
            requests: Mutex::new(requests.into()),
        })
    }

    #[tokio::test]
    async fn loading_until_first_check() {
        let gate = gate(Ok(PermissionResponse::granted()), vec![]);
        assert!(gate.status().is_loading());

        assert_eq!(gate.check().await, Ok(PermissionStatus::Granted));
        assert!(gate.status().is_granted());
    }

    #[tokio::test]
    async fn repeated_denial_is_a_steady_state() {
        let gate = gate(
            Ok(PermissionResponse::denied(true)),
            vec![Ok(false), Ok(false), Ok(true)],
        );
        gate.check().await.unwrap();

        assert_eq!(gate.request().await, Ok(false));
        assert_eq!(gate.request().await, Ok(false));
        assert_eq!(gate.status(), PermissionStatus::Denied { can_request: true });

        assert_eq!(gate.request().await, Ok(true));
        assert!(gate.status().is_granted());
    }

    #[tokio::test]
    async fn platform_error_keeps_previous_status() {
        let gate = gate(Err("service down".into()), vec![]);
        let err = gate.check().await.unwrap_err();
        assert_eq!(err, CaptureError::PermissionUnavailable("service down".into()));
        assert!(gate.status().is_loading());
    }
}
