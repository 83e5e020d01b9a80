//! Simulated camera hardware.
//!
//! Photos resolve after a configurable latency. Recordings run on the tokio
//! clock until stopped or capped, so tests can drive them with paused time.
//! Failures are scripted per call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;

use camera_session_core::models::config::{CameraFacing, CaptureConfiguration, PhotoOptions};
use camera_session_core::traits::camera_hardware::{
    CameraHardware, PhotoOutput, RecordingRequest, VideoOutput,
};

/// A recording that will break partway through, or when it is finalized
/// if `after` is `None`.
#[derive(Debug, Clone)]
struct ScriptedRecordingFailure {
    after: Option<Duration>,
    reason: String,
}

#[derive(Debug, Default)]
struct CameraScript {
    photo_failures: VecDeque<String>,
    recording_failures: VecDeque<ScriptedRecordingFailure>,
}

/// Stop bookkeeping for the recording in progress, if any.
#[derive(Debug, Default)]
struct RecordingLatch {
    generation: u64,
    live: bool,
    stop_pending: bool,
}

/// Clears the latch when a recording ends, including when its future is
/// dropped before completion. A newer recording's latch is left alone.
struct LiveRecording<'a> {
    latch: &'a Mutex<RecordingLatch>,
    generation: u64,
}

impl<'a> LiveRecording<'a> {
    fn begin(latch: &'a Mutex<RecordingLatch>) -> Self {
        let mut state = latch.lock();
        state.generation += 1;
        state.live = true;
        state.stop_pending = false;
        Self {
            latch,
            generation: state.generation,
        }
    }
}

impl Drop for LiveRecording<'_> {
    fn drop(&mut self) {
        let mut state = self.latch.lock();
        if state.generation == self.generation {
            state.live = false;
            state.stop_pending = false;
        }
    }
}

/// In-memory camera implementing `CameraHardware`.
pub struct SimulatedCamera {
    photo_latency: Duration,
    script: Mutex<CameraScript>,
    latch: Mutex<RecordingLatch>,
    stop_signal: Notify,
    photos_requested: AtomicUsize,
    recordings_started: AtomicUsize,
    stop_requests: AtomicUsize,
    sequence: AtomicUsize,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::with_photo_latency(Duration::from_millis(150))
    }

    pub fn with_photo_latency(photo_latency: Duration) -> Self {
        Self {
            photo_latency,
            script: Mutex::new(CameraScript::default()),
            latch: Mutex::new(RecordingLatch::default()),
            stop_signal: Notify::new(),
            photos_requested: AtomicUsize::new(0),
            recordings_started: AtomicUsize::new(0),
            stop_requests: AtomicUsize::new(0),
            sequence: AtomicUsize::new(0),
        }
    }

    /// Make the next photo fail with `reason`.
    pub fn fail_next_photo(&self, reason: impl Into<String>) {
        self.script.lock().photo_failures.push_back(reason.into());
    }

    /// Make the next recording fail with `reason` once it has run for `after`.
    /// A stop that arrives first lets it finish normally.
    pub fn fail_next_recording_after(&self, after: Duration, reason: impl Into<String>) {
        self.script
            .lock()
            .recording_failures
            .push_back(ScriptedRecordingFailure {
                after: Some(after),
                reason: reason.into(),
            });
    }

    /// Make the next recording fail when it is finalized, whether stopped
    /// or capped.
    pub fn fail_next_recording(&self, reason: impl Into<String>) {
        self.script
            .lock()
            .recording_failures
            .push_back(ScriptedRecordingFailure {
                after: None,
                reason: reason.into(),
            });
    }

    pub fn photos_requested(&self) -> usize {
        self.photos_requested.load(Ordering::SeqCst)
    }

    pub fn recordings_started(&self) -> usize {
        self.recordings_started.load(Ordering::SeqCst)
    }

    /// Number of `stop_recording` calls received.
    pub fn stop_requests(&self) -> usize {
        self.stop_requests.load(Ordering::SeqCst)
    }

    fn next_uri(&self, facing: CameraFacing, extension: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let lens = match facing {
            CameraFacing::Front => "front",
            CameraFacing::Back => "back",
        };
        format!("sim://{}/capture-{}.{}", lens, n, extension)
    }

    /// Resolve once a stop has been requested for the live recording.
    async fn stopped(&self) {
        loop {
            let notified = self.stop_signal.notified();
            if self.latch.lock().stop_pending {
                return;
            }
            notified.await;
        }
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CameraHardware for SimulatedCamera {
    async fn take_photo(
        &self,
        config: &CaptureConfiguration,
        options: &PhotoOptions,
    ) -> Result<PhotoOutput, String> {
        self.photos_requested.fetch_add(1, Ordering::SeqCst);
        log::debug!(
            "simulated photo: facing {:?}, flash {:?}, quality {}",
            config.facing,
            config.flash,
            options.quality
        );
        tokio::time::sleep(self.photo_latency).await;

        if let Some(reason) = self.script.lock().photo_failures.pop_front() {
            return Err(reason);
        }
        Ok(PhotoOutput {
            uri: self.next_uri(config.facing, "jpg"),
        })
    }

    async fn start_recording(
        &self,
        config: &CaptureConfiguration,
        request: &RecordingRequest,
    ) -> Result<VideoOutput, String> {
        self.recordings_started.fetch_add(1, Ordering::SeqCst);
        let _live = LiveRecording::begin(&self.latch);

        let failure = self.script.lock().recording_failures.pop_front();
        let cutoff = failure
            .as_ref()
            .and_then(|f| f.after)
            .map_or(request.max_duration, |after| after.min(request.max_duration));
        log::debug!(
            "simulated recording: {:?} at {:?}, cutoff {:?}",
            config.facing,
            request.quality,
            cutoff
        );

        let started = Instant::now();
        let stopped = tokio::select! {
            _ = self.stopped() => true,
            _ = tokio::time::sleep(cutoff) => false,
        };

        if let Some(failure) = failure {
            if !stopped || failure.after.is_none() {
                return Err(failure.reason);
            }
        }
        Ok(VideoOutput {
            uri: self.next_uri(config.facing, "mp4"),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn stop_recording(&self) {
        self.stop_requests.fetch_add(1, Ordering::SeqCst);
        let mut latch = self.latch.lock();
        if !latch.live {
            log::debug!("simulated stop ignored: nothing recording");
            return;
        }
        latch.stop_pending = true;
        drop(latch);
        self.stop_signal.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use camera_session_core::models::config::VideoQuality;

    use super::*;

    fn request(max_secs: u64) -> RecordingRequest {
        RecordingRequest {
            quality: VideoQuality::Hd1080,
            max_duration: Duration::from_secs(max_secs),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn photo_uris_follow_facing() {
        let camera = SimulatedCamera::new();
        let config = CaptureConfiguration {
            facing: CameraFacing::Front,
            ..Default::default()
        };
        let photo = camera
            .take_photo(&config, &PhotoOptions::default())
            .await
            .unwrap();
        assert_eq!(photo.uri, "sim://front/capture-1.jpg");
        assert_eq!(camera.photos_requested(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_photo_failure_is_used_once() {
        let camera = SimulatedCamera::new();
        camera.fail_next_photo("sensor busy");
        let config = CaptureConfiguration::default();
        let options = PhotoOptions::default();

        assert_eq!(
            camera.take_photo(&config, &options).await,
            Err("sensor busy".to_string())
        );
        assert!(camera.take_photo(&config, &options).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn recording_runs_to_its_cap() {
        let camera = SimulatedCamera::new();
        let video = camera
            .start_recording(&CaptureConfiguration::default(), &request(30))
            .await
            .unwrap();
        assert_eq!(video.duration_ms, 30_000);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_live_recording() {
        let camera = SimulatedCamera::new();
        let config = CaptureConfiguration::default();
        let req = request(30);
        let (video, _) = tokio::join!(
            camera.start_recording(&config, &req),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                camera.stop_recording();
            }
        );
        assert_eq!(video.unwrap().duration_ms, 5_000);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_with_nothing_recording_is_ignored() {
        let camera = SimulatedCamera::new();
        camera.stop_recording();
        let video = camera
            .start_recording(&CaptureConfiguration::default(), &request(30))
            .await
            .unwrap();
        assert_eq!(video.duration_ms, 30_000);
        assert_eq!(camera.stop_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_for_abandoned_recording_does_not_carry_over() {
        let camera = SimulatedCamera::new();
        let config = CaptureConfiguration::default();
        let req = request(30);

        tokio::select! {
            biased;
            _ = async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                camera.stop_recording();
            } => {}
            _ = camera.start_recording(&config, &req) => panic!("recording should be abandoned"),
        }

        let video = camera.start_recording(&config, &request(30)).await.unwrap();
        assert_eq!(video.duration_ms, 30_000);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_on_finalize_survives_stop() {
        let camera = SimulatedCamera::new();
        camera.fail_next_recording("encoder lost");
        let config = CaptureConfiguration::default();
        let req = request(30);
        let (video, _) = tokio::join!(
            camera.start_recording(&config, &req),
            async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                camera.stop_recording();
            }
        );
        assert_eq!(video, Err("encoder lost".to_string()));
    }
}
