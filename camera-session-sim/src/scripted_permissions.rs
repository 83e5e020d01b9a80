//! Scripted host permission prompt.
//!
//! The initial check answer is fixed at construction; each prompt consumes
//! the next scripted answer. Once the script runs out the user keeps saying
//! no, which mirrors a platform that has stopped showing the dialog.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use camera_session_core::models::permission::PermissionResponse;
use camera_session_core::traits::permission_provider::PermissionProvider;

pub struct ScriptedPermissions {
    current: Mutex<Result<PermissionResponse, String>>,
    answers: Mutex<VecDeque<Result<bool, String>>>,
    prompt_latency: Duration,
    prompts: AtomicUsize,
}

impl ScriptedPermissions {
    fn with_check(check: Result<PermissionResponse, String>) -> Self {
        Self {
            current: Mutex::new(check),
            answers: Mutex::new(VecDeque::new()),
            prompt_latency: Duration::from_millis(500),
            prompts: AtomicUsize::new(0),
        }
    }

    /// Access was granted on a previous run.
    pub fn granted() -> Self {
        Self::with_check(Ok(PermissionResponse::granted()))
    }

    /// Access not yet granted; the platform can still prompt.
    pub fn undetermined() -> Self {
        Self::with_check(Ok(PermissionResponse::denied(true)))
    }

    /// The platform cannot answer at all.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::with_check(Err(reason.into()))
    }

    /// Queue answers for successive prompts.
    pub fn answering(self, answers: impl IntoIterator<Item = Result<bool, String>>) -> Self {
        self.answers.lock().extend(answers);
        self
    }

    /// Number of prompts shown so far.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Change what the next check reports.
    pub fn set_check(&self, check: Result<PermissionResponse, String>) {
        *self.current.lock() = check;
    }
}

#[async_trait]
impl PermissionProvider for ScriptedPermissions {
    async fn check_permission(&self) -> Result<PermissionResponse, String> {
        self.current.lock().clone()
    }

    async fn request_permission(&self) -> Result<bool, String> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.prompt_latency).await;

        let answer = self.answers.lock().pop_front().unwrap_or(Ok(false));
        match answer {
            Ok(true) => *self.current.lock() = Ok(PermissionResponse::granted()),
            Ok(false) => *self.current.lock() = Ok(PermissionResponse::denied(true)),
            Err(_) => {}
        }
        answer
    }
}
