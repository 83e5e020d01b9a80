use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::models::config::{CameraFacing, CaptureConfiguration, CaptureMode, FlashMode, SessionOptions};
use crate::models::error::CaptureError;
use crate::models::media::CapturedMedia;
use crate::models::permission::PermissionStatus;
use crate::models::state::{OperationId, SessionState};
use crate::session::gate::PermissionGate;
use crate::session::recording::{ActiveRecording, StopOrigin};
use crate::session::review::ReviewHandoff;
use crate::traits::camera_hardware::{CameraHardware, PhotoOutput, RecordingRequest, VideoOutput};
use crate::traits::permission_provider::PermissionProvider;
use crate::traits::post_composer::PostComposer;
use crate::traits::session_delegate::SessionDelegate;

/// Lifecycle phase. Mirrors `SessionState` but owns the recording guard.
enum Phase<H: CameraHardware> {
    Unauthorized,
    Requesting,
    Idle,
    CapturingPhoto { operation: OperationId },
    Recording(ActiveRecording<H>),
    Reviewing,
    Failed(CaptureError),
}

impl<H: CameraHardware> Phase<H> {
    fn snapshot(&self) -> SessionState {
        match self {
            Self::Unauthorized => SessionState::Unauthorized,
            Self::Requesting => SessionState::Requesting,
            Self::Idle => SessionState::Idle,
            Self::CapturingPhoto { operation } => SessionState::CapturingPhoto {
                operation: *operation,
            },
            Self::Recording(active) => SessionState::Recording {
                operation: active.operation,
                started_at: active.started_at,
                deadline: active.deadline,
            },
            Self::Reviewing => SessionState::Reviewing,
            Self::Failed(error) => SessionState::Failed(error.clone()),
        }
    }

    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Error for a command refused in this phase.
    fn rejection(&self, command: &'static str) -> CaptureError {
        let error = match self {
            Self::Unauthorized => CaptureError::PermissionDenied,
            other => CaptureError::InvalidCommand {
                command,
                state: other.snapshot().name(),
            },
        };
        log::debug!("ignoring {}: {}", command, error);
        error
    }
}

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionInner<H: CameraHardware> {
    phase: Phase<H>,
    config: CaptureConfiguration,
    review: ReviewHandoff,
    last_error: Option<CaptureError>,
}

/// Outcome of a hardware completion, announced once the lock is released.
enum Completion {
    Captured(CapturedMedia),
    Failed(CaptureError),
    /// The operation is no longer current (session released).
    Stale,
}

/// State shared between the session handle and its spawned tasks.
struct Shared<H: CameraHardware> {
    hardware: Arc<H>,
    options: SessionOptions,
    inner: Mutex<SessionInner<H>>,
    state_tx: watch::Sender<SessionState>,
    delegate: Mutex<Option<Arc<dyn SessionDelegate>>>,
}

impl<H: CameraHardware + 'static> Shared<H> {
    fn delegate(&self) -> Option<Arc<dyn SessionDelegate>> {
        self.delegate.lock().clone()
    }

    /// Run `f` under the lock, then publish the new state if it changed.
    fn update<R>(&self, f: impl FnOnce(&mut SessionInner<H>) -> R) -> R {
        let (result, changed) = {
            let mut inner = self.inner.lock();
            let before = inner.phase.snapshot();
            let result = f(&mut inner);
            let after = inner.phase.snapshot();
            let changed = if before != after {
                self.state_tx.send_replace(after.clone());
                Some(after)
            } else {
                None
            };
            (result, changed)
        };

        if let Some(state) = changed {
            log::debug!("capture session is now {}", state);
            if let Some(delegate) = self.delegate() {
                delegate.on_state_changed(&state);
            }
        }
        result
    }

    fn announce(&self, completion: Completion) -> Result<(), CaptureError> {
        match completion {
            Completion::Captured(media) => {
                if let Some(delegate) = self.delegate() {
                    delegate.on_media_captured(&media);
                }
                Ok(())
            }
            Completion::Failed(error) => {
                log::warn!("{}", error);
                if let Some(delegate) = self.delegate() {
                    delegate.on_error(&error);
                }
                Err(error)
            }
            Completion::Stale => Ok(()),
        }
    }

    fn fail(&self, error: CaptureError) -> CaptureError {
        self.update(|inner| {
            inner.last_error = Some(error.clone());
            inner.phase = Phase::Failed(error.clone());
        });
        let _ = self.announce(Completion::Failed(error.clone()));
        error
    }

    async fn run_photo(
        &self,
        operation: OperationId,
        config: CaptureConfiguration,
    ) -> Result<(), CaptureError> {
        let outcome = self.hardware.take_photo(&config, &self.options.photo).await;
        let completion = self.complete_photo(operation, &config, outcome);
        self.announce(completion)
    }

    fn complete_photo(
        &self,
        operation: OperationId,
        config: &CaptureConfiguration,
        outcome: Result<PhotoOutput, String>,
    ) -> Completion {
        self.update(|inner| {
            match inner.phase {
                Phase::CapturingPhoto { operation: current } if current == operation => {}
                _ => {
                    log::debug!("dropping result of released photo {}", operation);
                    return Completion::Stale;
                }
            }

            inner.phase = Phase::Idle;
            match outcome {
                Ok(output) => {
                    log::info!("photo {} captured: {}", operation, output.uri);
                    let media = CapturedMedia::photo(output.uri, config);
                    inner.review.hold(media.clone());
                    inner.phase = Phase::Reviewing;
                    Completion::Captured(media)
                }
                Err(reason) => {
                    let error = CaptureError::CaptureFailure(reason);
                    inner.last_error = Some(error.clone());
                    Completion::Failed(error)
                }
            }
        })
    }

    /// Enter `Recording` and spawn the hardware call and the deadline timer.
    ///
    /// Both tasks are spawned while the lock is held, so neither can observe
    /// the session before the guard is in place.
    fn begin_recording(self: &Arc<Self>) -> Result<OperationId, CaptureError> {
        let request = RecordingRequest {
            quality: self.options.recording.quality,
            max_duration: self.options.recording.max_duration,
        };

        self.update(|inner| {
            if !inner.phase.is_idle() {
                return Err(inner.phase.rejection("start_recording"));
            }

            let operation = OperationId::new();
            let started_at = Instant::now();
            let deadline = started_at + request.max_duration;
            let config = inner.config;

            let capture_task = tokio::spawn(Arc::clone(self).run_recording(operation, config, request));
            let deadline_timer = tokio::spawn(Arc::clone(self).run_deadline(operation, deadline));

            inner.phase = Phase::Recording(ActiveRecording::new(
                operation,
                started_at,
                deadline,
                capture_task,
                deadline_timer.abort_handle(),
                Arc::clone(&self.hardware),
            ));
            log::info!(
                "recording {} started, deadline in {:?}",
                operation,
                request.max_duration
            );
            Ok(operation)
        })
    }

    async fn run_recording(
        self: Arc<Self>,
        operation: OperationId,
        config: CaptureConfiguration,
        request: RecordingRequest,
    ) -> Result<(), CaptureError> {
        let mut recording = self.hardware.start_recording(&config, &request);
        // Give the hardware one poll to begin before arming, so a stop is
        // never sent to a camera that is not yet recording.
        let outcome = tokio::select! {
            biased;
            outcome = &mut recording => outcome,
            _ = std::future::ready(()) => {
                if self.arm(operation) {
                    self.hardware.stop_recording();
                }
                recording.await
            }
        };
        let completion = self.complete_recording(operation, &config, outcome);
        self.announce(completion)
    }

    /// Returns whether a stop was requested before the hardware began.
    fn arm(&self, operation: OperationId) -> bool {
        let mut inner = self.inner.lock();
        match &mut inner.phase {
            Phase::Recording(active) if active.operation == operation => active.arm(),
            _ => false,
        }
    }

    async fn run_deadline(self: Arc<Self>, operation: OperationId, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
        if self.request_stop(operation, StopOrigin::Deadline) {
            log::info!("recording {} reached its deadline", operation);
        }
    }

    /// Single entry point for ending a recording, whoever asks first.
    fn request_stop(&self, operation: OperationId, origin: StopOrigin) -> bool {
        let (accepted, armed) = self.update(|inner| match &mut inner.phase {
            Phase::Recording(active) if active.operation == operation => {
                (active.request_stop(origin), active.is_armed())
            }
            _ => (false, false),
        });
        if accepted && armed {
            self.hardware.stop_recording();
        }
        accepted
    }

    fn complete_recording(
        &self,
        operation: OperationId,
        config: &CaptureConfiguration,
        outcome: Result<VideoOutput, String>,
    ) -> Completion {
        let max_duration = self.options.recording.max_duration;

        self.update(|inner| {
            let active = match std::mem::replace(&mut inner.phase, Phase::Idle) {
                Phase::Recording(active) if active.operation == operation => active,
                other => {
                    inner.phase = other;
                    log::debug!("dropping result of released recording {}", operation);
                    return Completion::Stale;
                }
            };
            let finished = active.finish();

            match outcome {
                Ok(output) => {
                    let elapsed = finished
                        .ended_at
                        .saturating_duration_since(finished.started_at)
                        .min(max_duration);
                    let duration_ms = elapsed.as_millis() as u64;
                    if output.duration_ms.abs_diff(duration_ms) > 1000 {
                        log::debug!(
                            "hardware reported {}ms for recording {}, session measured {}ms",
                            output.duration_ms,
                            operation,
                            duration_ms
                        );
                    }
                    log::info!(
                        "recording {} finished ({:?}) after {}ms: {}",
                        operation,
                        finished.origin,
                        duration_ms,
                        output.uri
                    );

                    let media = CapturedMedia::video(output.uri, duration_ms, config);
                    inner.review.hold(media.clone());
                    inner.phase = Phase::Reviewing;
                    Completion::Captured(media)
                }
                Err(reason) => {
                    let error = CaptureError::RecordingFailure(reason);
                    inner.last_error = Some(error.clone());
                    Completion::Failed(error)
                }
            }
        })
    }

    /// Tear down on unmount: drop pending media and abandon any recording.
    fn release(&self) {
        let previous = {
            let mut inner = self.inner.lock();
            inner.review.discard();
            std::mem::replace(&mut inner.phase, Phase::Idle)
        };
        // Dropped outside the lock: the guard calls into the hardware.
        if let Phase::Recording(active) = previous {
            log::info!("camera released during recording {}", active.operation);
        }
    }
}

/// Capture session controller for one camera screen.
///
/// Owns the camera for its lifetime. Commands are refused (never queued)
/// when the session is not in the state they require; refusals are logged
/// and returned as `CaptureError::InvalidCommand` or
/// `CaptureError::PermissionDenied` without changing any state.
///
/// ```text
/// [PermissionGate] ─ granted ─→ [Phase machine] ─ media ─→ [ReviewHandoff] ─ share ─→ [PostComposer]
///                                      │
///                               [CameraHardware]
/// ```
///
/// Spawns tasks for recordings, so it must be driven from inside a tokio
/// runtime. Dropping the session cancels any recording in flight.
pub struct CaptureSession<H, P, C>
where
    H: CameraHardware + 'static,
    P: PermissionProvider,
    C: PostComposer,
{
    shared: Arc<Shared<H>>,
    gate: PermissionGate<P>,
    composer: C,
}

impl<H, P, C> CaptureSession<H, P, C>
where
    H: CameraHardware + 'static,
    P: PermissionProvider,
    C: PostComposer,
{
    /// Create a session whose permission is still loading.
    ///
    /// Call `initialize` (or use `mount`) before issuing commands.
    pub fn new(
        hardware: H,
        permissions: P,
        composer: C,
        options: SessionOptions,
    ) -> Result<Self, CaptureError> {
        options.validate().map_err(CaptureError::ConfigurationFailed)?;

        let (state_tx, _) = watch::channel(SessionState::Unauthorized);
        Ok(Self {
            shared: Arc::new(Shared {
                hardware: Arc::new(hardware),
                options,
                inner: Mutex::new(SessionInner {
                    phase: Phase::Unauthorized,
                    config: CaptureConfiguration::default(),
                    review: ReviewHandoff::new(),
                    last_error: None,
                }),
                state_tx,
                delegate: Mutex::new(None),
            }),
            gate: PermissionGate::new(permissions),
            composer,
        })
    }

    /// Create a session and run the initial permission check.
    pub async fn mount(
        hardware: H,
        permissions: P,
        composer: C,
        options: SessionOptions,
    ) -> Result<Self, CaptureError> {
        let session = Self::new(hardware, permissions, composer, options)?;
        session.initialize().await?;
        Ok(session)
    }

    pub fn set_delegate(&self, delegate: Arc<dyn SessionDelegate>) {
        *self.shared.delegate.lock() = Some(delegate);
    }

    /// Resolve the initial permission check: idle if granted, unauthorized
    /// otherwise. A platform error leaves the gate loading and moves the
    /// session to `Failed`; call again to retry.
    pub async fn initialize(&self) -> Result<PermissionStatus, CaptureError> {
        let status = self.gate.status();
        if !status.is_loading() {
            return Ok(status);
        }

        match self.gate.check().await {
            Ok(status) => {
                self.shared.update(|inner| {
                    if matches!(inner.phase, Phase::Unauthorized | Phase::Failed(_)) {
                        inner.phase = if status.is_granted() {
                            Phase::Idle
                        } else {
                            Phase::Unauthorized
                        };
                    }
                });
                log::info!("camera permission resolved: {:?}", status);
                Ok(status)
            }
            Err(error) => Err(self.shared.fail(error)),
        }
    }

    // --- Queries ---

    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().phase.snapshot()
    }

    /// Watch state transitions. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    pub fn permission_status(&self) -> PermissionStatus {
        self.gate.status()
    }

    pub fn configuration(&self) -> CaptureConfiguration {
        self.shared.inner.lock().config
    }

    pub fn options(&self) -> &SessionOptions {
        &self.shared.options
    }

    pub fn active_operation(&self) -> Option<OperationId> {
        self.state().active_operation()
    }

    /// Media awaiting discard or share.
    pub fn current_media(&self) -> Option<CapturedMedia> {
        self.shared.inner.lock().review.current().cloned()
    }

    /// Most recent failure, kept until acknowledged.
    pub fn last_error(&self) -> Option<CaptureError> {
        self.shared.inner.lock().last_error.clone()
    }

    pub fn permissions(&self) -> &P {
        self.gate.provider()
    }

    pub fn hardware(&self) -> &H {
        &self.shared.hardware
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }

    // --- Permission ---

    /// Prompt for camera access. Valid from `Unauthorized` or `Failed`.
    ///
    /// Returns `Ok(false)` on denial; the session stays unauthorized.
    pub async fn request_permission(&self) -> Result<bool, CaptureError> {
        self.ensure_resolved("request_permission")?;
        self.shared.update(|inner| {
            if !matches!(inner.phase, Phase::Unauthorized | Phase::Failed(_)) {
                return Err(inner.phase.rejection("request_permission"));
            }
            inner.phase = Phase::Requesting;
            Ok(())
        })?;

        match self.gate.request().await {
            Ok(granted) => {
                self.shared.update(|inner| {
                    if matches!(inner.phase, Phase::Requesting) {
                        inner.phase = if granted {
                            Phase::Idle
                        } else {
                            Phase::Unauthorized
                        };
                    }
                });
                Ok(granted)
            }
            Err(error) => Err(self.shared.fail(error)),
        }
    }

    /// Clear `last_error`. From `Failed` the session returns to
    /// `Unauthorized` so permission can be requested again.
    pub fn acknowledge_error(&self) -> Option<CaptureError> {
        self.shared.update(|inner| {
            if matches!(inner.phase, Phase::Failed(_)) {
                inner.phase = Phase::Unauthorized;
            }
            inner.last_error.take()
        })
    }

    // --- Configuration ---

    pub fn set_facing(&self, facing: CameraFacing) -> Result<(), CaptureError> {
        self.configure("set_facing", |config| config.facing = facing)
    }

    pub fn set_flash(&self, flash: FlashMode) -> Result<(), CaptureError> {
        self.configure("set_flash", |config| config.flash = flash)
    }

    pub fn set_mode(&self, mode: CaptureMode) -> Result<(), CaptureError> {
        self.configure("set_mode", |config| config.mode = mode)
    }

    pub fn toggle_facing(&self) -> Result<(), CaptureError> {
        self.configure("toggle_facing", |config| config.facing = config.facing.toggled())
    }

    pub fn toggle_flash(&self) -> Result<(), CaptureError> {
        self.configure("toggle_flash", |config| config.flash = config.flash.toggled())
    }

    pub fn toggle_mode(&self) -> Result<(), CaptureError> {
        self.configure("toggle_mode", |config| config.mode = config.mode.toggled())
    }

    fn configure(
        &self,
        command: &'static str,
        apply: impl FnOnce(&mut CaptureConfiguration),
    ) -> Result<(), CaptureError> {
        self.ensure_resolved(command)?;
        self.shared.update(|inner| {
            if !inner.phase.is_idle() {
                return Err(inner.phase.rejection(command));
            }
            apply(&mut inner.config);
            Ok(())
        })
    }

    // --- Capture ---

    /// Take a photo. Transitions: idle → capturing-photo → reviewing / idle.
    ///
    /// The camera is claimed before the first await, so a concurrent
    /// capture command is refused immediately. The hardware call runs on
    /// its own task and completes even if this future is dropped.
    pub async fn capture_photo(&self) -> Result<(), CaptureError> {
        self.ensure_resolved("capture_photo")?;
        let (operation, config) = self.shared.update(|inner| {
            if !inner.phase.is_idle() {
                return Err(inner.phase.rejection("capture_photo"));
            }
            let operation = OperationId::new();
            inner.phase = Phase::CapturingPhoto { operation };
            Ok((operation, inner.config))
        })?;
        log::debug!("photo {} requested", operation);

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move { shared.run_photo(operation, config).await });
        match task.await {
            Ok(result) => result,
            Err(join_error) => {
                let completion = self.shared.complete_photo(
                    operation,
                    &config,
                    Err(format!("photo task ended abnormally: {}", join_error)),
                );
                self.shared.announce(completion)
            }
        }
    }

    /// Start recording. Transitions: idle → recording.
    ///
    /// Returns once the camera is claimed; the recording completes in the
    /// background on `stop_recording` or when the deadline elapses.
    pub fn start_recording(&self) -> Result<OperationId, CaptureError> {
        self.ensure_resolved("start_recording")?;
        self.shared.begin_recording()
    }

    /// Stop the current recording and wait for it to settle.
    /// Transitions: recording → reviewing (or idle if the hardware failed,
    /// in which case the failure is returned).
    ///
    /// Only the first stop is honored; a repeat, or a stop after the
    /// deadline already fired, is refused without side effects.
    pub async fn stop_recording(&self) -> Result<(), CaptureError> {
        self.ensure_resolved("stop_recording")?;
        let (operation, completion) = self.shared.update(|inner| match &mut inner.phase {
            Phase::Recording(active) if !active.is_stopping() => {
                Ok((active.operation, active.take_completion()))
            }
            phase => Err(phase.rejection("stop_recording")),
        })?;

        if !self.shared.request_stop(operation, StopOrigin::Manual) {
            log::debug!("ignoring stop_recording: recording {} already stopping", operation);
            return Err(CaptureError::InvalidCommand {
                command: "stop_recording",
                state: "stopping",
            });
        }

        let Some(task) = completion else {
            return Ok(());
        };
        match task.await {
            Ok(result) => result,
            Err(join_error) => {
                let config = self.configuration();
                let completion = self.shared.complete_recording(
                    operation,
                    &config,
                    Err(format!("recording task ended abnormally: {}", join_error)),
                );
                self.shared.announce(completion)
            }
        }
    }

    /// Route the single shutter gesture by capture mode.
    pub async fn press_shutter(&self) -> Result<(), CaptureError> {
        let mode = self.configuration().mode;
        match mode {
            CaptureMode::Photo => self.capture_photo().await,
            CaptureMode::Video if self.state().is_recording() => self.stop_recording().await,
            CaptureMode::Video => self.start_recording().map(|_| ()),
        }
    }

    // --- Review ---

    /// Throw away the media under review. Transitions: reviewing → idle.
    pub fn discard(&self) -> Result<(), CaptureError> {
        self.ensure_resolved("discard")?;
        self.shared.update(|inner| {
            if !matches!(inner.phase, Phase::Reviewing) {
                return Err(inner.phase.rejection("discard"));
            }
            inner.review.discard();
            inner.phase = Phase::Idle;
            Ok(())
        })
    }

    /// Hand the media under review to the composer. Transitions: reviewing → idle.
    pub fn share(&self) -> Result<(), CaptureError> {
        self.ensure_resolved("share")?;
        let media = self.shared.update(|inner| {
            if !matches!(inner.phase, Phase::Reviewing) {
                return Err(inner.phase.rejection("share"));
            }
            let media = inner.review.take_for_share();
            inner.phase = Phase::Idle;
            Ok(media)
        })?;

        if let Some(media) = media {
            log::info!("sharing {:?} {}", media.kind(), media.uri());
            if let Some(delegate) = self.shared.delegate() {
                delegate.on_media_shared(&media);
            }
            self.composer.submit(media);
        }
        Ok(())
    }

    fn ensure_resolved(&self, command: &'static str) -> Result<(), CaptureError> {
        if self.gate.status().is_loading() {
            log::debug!("ignoring {}: permission still loading", command);
            return Err(CaptureError::InvalidCommand {
                command,
                state: "loading",
            });
        }
        Ok(())
    }
}

impl<H, P, C> Drop for CaptureSession<H, P, C>
where
    H: CameraHardware + 'static,
    P: PermissionProvider,
    C: PostComposer,
{
    fn drop(&mut self) {
        self.shared.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::models::config::PhotoOptions;
    use crate::models::media::MediaKind;
    use crate::models::permission::PermissionResponse;

    /// Camera whose photos resolve instantly and whose recordings run
    /// until stopped or capped.
    #[derive(Default)]
    struct BenchCamera {
        stops: AtomicUsize,
        stop_signal: tokio::sync::Notify,
    }

    #[async_trait]
    impl CameraHardware for BenchCamera {
        async fn take_photo(
            &self,
            _config: &CaptureConfiguration,
            _options: &PhotoOptions,
        ) -> Result<PhotoOutput, String> {
            Ok(PhotoOutput { uri: "bench://photo".into() })
        }

        async fn start_recording(
            &self,
            _config: &CaptureConfiguration,
            request: &RecordingRequest,
        ) -> Result<VideoOutput, String> {
            let started = Instant::now();
            tokio::select! {
                _ = self.stop_signal.notified() => {}
                _ = tokio::time::sleep(request.max_duration) => {}
            }
            Ok(VideoOutput {
                uri: "bench://video".into(),
                duration_ms: started.elapsed().as_millis() as u64,
            })
        }

        fn stop_recording(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.stop_signal.notify_one();
        }
    }

    struct Granted;

    #[async_trait]
    impl PermissionProvider for Granted {
        async fn check_permission(&self) -> Result<PermissionResponse, String> {
            Ok(PermissionResponse::granted())
        }

        async fn request_permission(&self) -> Result<bool, String> {
            Ok(true)
        }
    }

    #[derive(Default)]
    struct Outbox(Mutex<Vec<CapturedMedia>>);

    impl PostComposer for Outbox {
        fn submit(&self, media: CapturedMedia) {
            self.0.lock().push(media);
        }
    }

    type BenchSession = CaptureSession<BenchCamera, Granted, Outbox>;

    async fn mounted() -> BenchSession {
        CaptureSession::mount(
            BenchCamera::default(),
            Granted,
            Outbox::default(),
            SessionOptions::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn commands_refused_while_permission_loading() {
        let session = BenchSession::new(
            BenchCamera::default(),
            Granted,
            Outbox::default(),
            SessionOptions::default(),
        )
        .unwrap();

        assert!(session.permission_status().is_loading());
        let err = session.request_permission().await.unwrap_err();
        assert_eq!(
            err,
            CaptureError::InvalidCommand {
                command: "request_permission",
                state: "loading"
            }
        );
        assert!(session.capture_photo().await.is_err());
        assert!(session.set_flash(FlashMode::On).is_err());
        assert_eq!(session.state(), SessionState::Unauthorized);
    }

    #[tokio::test]
    async fn invalid_options_are_rejected() {
        let mut options = SessionOptions::default();
        options.recording.max_duration = Duration::ZERO;
        let result = BenchSession::new(BenchCamera::default(), Granted, Outbox::default(), options);
        assert!(matches!(result, Err(CaptureError::ConfigurationFailed(_))));
    }

    #[tokio::test]
    async fn photo_lands_in_review() {
        let session = mounted().await;
        assert!(session.state().is_idle());

        session.capture_photo().await.unwrap();

        assert!(session.state().is_reviewing());
        assert_eq!(session.active_operation(), None);
        let media = session.current_media().unwrap();
        assert_eq!(media.kind(), MediaKind::Photo);
        assert_eq!(media.uri(), "bench://photo");
    }

    #[tokio::test(start_paused = true)]
    async fn configuration_frozen_while_recording() {
        let session = mounted().await;
        let before = session.configuration();

        let operation = session.start_recording().unwrap();
        assert!(session.set_facing(CameraFacing::Front).is_err());
        assert!(session.toggle_flash().is_err());
        assert!(session.set_mode(CaptureMode::Video).is_err());
        assert_eq!(session.configuration(), before);
        assert_eq!(session.active_operation(), Some(operation));

        session.stop_recording().await.unwrap();
        assert_eq!(session.hardware().stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_stops_recording() {
        let session = mounted().await;
        session.start_recording().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let hardware = Arc::clone(&session.shared.hardware);
        drop(session);
        assert_eq!(hardware.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recording_dropped_before_camera_starts_sends_no_stop() {
        let session = mounted().await;
        session.start_recording().unwrap();

        let hardware = Arc::clone(&session.shared.hardware);
        drop(session);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(hardware.stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_camera_starts_is_delivered_once_armed() {
        let session = mounted().await;
        session.start_recording().unwrap();
        session.stop_recording().await.unwrap();

        assert!(session.state().is_reviewing());
        assert_eq!(session.current_media().unwrap().duration_ms(), Some(0));
        assert_eq!(session.hardware().stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn share_submits_once() {
        let session = mounted().await;
        session.capture_photo().await.unwrap();

        session.share().unwrap();
        assert!(session.share().is_err());
        assert!(session.discard().is_err());
        assert_eq!(session.composer().0.lock().len(), 1);
        assert!(session.state().is_idle());
    }
}
