use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use super::error::CaptureError;

/// Identifies one in-flight photo capture or recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(uuid::Uuid);

impl OperationId {
    pub(crate) fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable capture session state.
///
/// State transitions:
/// ```text
/// unauthorized → requesting → idle ─→ capturing-photo ─┐
///      ↑              │         ↑  └→ recording ────────┤
///      └──────────────┘         │                      ↓
///   failed (platform error)     └──── reviewing ←──────┘
/// ```
/// Hardware failures while capturing or recording fall straight back to idle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthorized,
    Requesting,
    Idle,
    CapturingPhoto {
        operation: OperationId,
    },
    Recording {
        operation: OperationId,
        started_at: Instant,
        deadline: Instant,
    },
    Reviewing,
    Failed(CaptureError),
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_reviewing(&self) -> bool {
        matches!(self, Self::Reviewing)
    }

    /// Operation currently holding the camera, if any.
    pub fn active_operation(&self) -> Option<OperationId> {
        match self {
            Self::CapturingPhoto { operation } | Self::Recording { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }

    /// Time left before the recording is force-stopped.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Recording { deadline, .. } => {
                Some(deadline.saturating_duration_since(Instant::now()))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Requesting => "requesting",
            Self::Idle => "idle",
            Self::CapturingPhoto { .. } => "capturing-photo",
            Self::Recording { .. } => "recording",
            Self::Reviewing => "reviewing",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_capturing_states_carry_an_operation() {
        let operation = OperationId::new();
        let now = Instant::now();

        assert_eq!(
            SessionState::CapturingPhoto { operation }.active_operation(),
            Some(operation)
        );
        assert_eq!(
            SessionState::Recording {
                operation,
                started_at: now,
                deadline: now + Duration::from_secs(30),
            }
            .active_operation(),
            Some(operation)
        );
        for state in [
            SessionState::Unauthorized,
            SessionState::Requesting,
            SessionState::Idle,
            SessionState::Reviewing,
            SessionState::Failed(CaptureError::PermissionDenied),
        ] {
            assert_eq!(state.active_operation(), None, "{state}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_counts_down_to_deadline() {
        let now = Instant::now();
        let state = SessionState::Recording {
            operation: OperationId::new(),
            started_at: now,
            deadline: now + Duration::from_secs(30),
        };
        tokio::time::advance(Duration::from_secs(12)).await;
        assert_eq!(state.remaining(), Some(Duration::from_secs(18)));
        assert_eq!(SessionState::Idle.remaining(), None);
    }
}
