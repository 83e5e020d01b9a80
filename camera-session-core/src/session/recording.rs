use std::sync::Arc;

use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;

use crate::models::error::CaptureError;
use crate::models::state::OperationId;
use crate::traits::camera_hardware::CameraHardware;

/// What ended a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopOrigin {
    /// `stop_recording` from the user.
    Manual,
    /// The session's deadline timer fired.
    Deadline,
    /// The hardware finished without being asked.
    Hardware,
}

/// Timing of a recording once its completion has been accepted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FinishedRecording {
    pub origin: StopOrigin,
    pub started_at: Instant,
    pub ended_at: Instant,
}

/// Exclusive hold on the camera for one recording.
///
/// Owns the deadline timer and the task awaiting the hardware. Dropping it
/// without `finish` (session torn down, state replaced) cancels the timer,
/// asks the hardware to stop and abandons the pending result.
///
/// The hardware only hears about stops once it is armed, i.e. once the
/// capture task has handed it the recording. A stop requested earlier is
/// delivered by the capture task when it arms.
pub(crate) struct ActiveRecording<H: CameraHardware> {
    pub operation: OperationId,
    pub started_at: Instant,
    pub deadline: Instant,
    stop: Option<(StopOrigin, Instant)>,
    armed: bool,
    deadline_timer: Option<AbortHandle>,
    capture_task: Option<AbortHandle>,
    completion: Option<JoinHandle<Result<(), CaptureError>>>,
    hardware: Arc<H>,
}

impl<H: CameraHardware> ActiveRecording<H> {
    pub fn new(
        operation: OperationId,
        started_at: Instant,
        deadline: Instant,
        capture_task: JoinHandle<Result<(), CaptureError>>,
        deadline_timer: AbortHandle,
        hardware: Arc<H>,
    ) -> Self {
        Self {
            operation,
            started_at,
            deadline,
            stop: None,
            armed: false,
            deadline_timer: Some(deadline_timer),
            capture_task: Some(capture_task.abort_handle()),
            completion: Some(capture_task),
            hardware,
        }
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Mark the hardware as recording. Returns whether a stop is already
    /// waiting to be delivered.
    pub fn arm(&mut self) -> bool {
        self.armed = true;
        self.stop.is_some()
    }

    /// Hand out the capture task's result, once.
    pub fn take_completion(&mut self) -> Option<JoinHandle<Result<(), CaptureError>>> {
        self.completion.take()
    }

    /// Record the first stop request. Later requests lose and return `false`.
    ///
    /// The caller issues the hardware stop when this returns `true` and the
    /// recording is armed.
    pub fn request_stop(&mut self, origin: StopOrigin) -> bool {
        if self.stop.is_some() {
            return false;
        }
        self.stop = Some((origin, Instant::now()));
        if let Some(timer) = self.deadline_timer.take() {
            // A firing timer is the caller itself; leave it to finish.
            if origin != StopOrigin::Deadline {
                timer.abort();
            }
        }
        true
    }

    /// Accept the hardware's completion and disarm the guard.
    pub fn finish(mut self) -> FinishedRecording {
        if let Some(timer) = self.deadline_timer.take() {
            timer.abort();
        }
        // Completion runs on the capture task itself.
        self.capture_task = None;

        let (origin, ended_at) = self
            .stop
            .unwrap_or_else(|| (StopOrigin::Hardware, Instant::now()));
        FinishedRecording {
            origin,
            started_at: self.started_at,
            ended_at,
        }
    }
}

impl<H: CameraHardware> Drop for ActiveRecording<H> {
    fn drop(&mut self) {
        if let Some(timer) = self.deadline_timer.take() {
            timer.abort();
        }
        if let Some(task) = self.capture_task.take() {
            log::info!("abandoning recording {}", self.operation);
            if self.armed && self.stop.is_none() {
                self.hardware.stop_recording();
            }
            task.abort();
        }
    }
}
