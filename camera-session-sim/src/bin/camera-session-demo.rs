//! Drive a capture session against the simulated backend and print every
//! session notification as a JSON line.

use std::error::Error;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use camera_session_core::{
    CameraFacing, CaptureMode, CaptureSession, FlashMode, SessionOptions,
};
use camera_session_sim::{CollectingComposer, EventRecorder, ScriptedPermissions, SimulatedCamera};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Photo,
    Video,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Facing {
    Front,
    Back,
}

#[derive(Parser, Debug)]
#[command(about = "Run one capture through a simulated camera session")]
struct Args {
    /// Capture mode to switch to before pressing the shutter.
    #[arg(long, value_enum, default_value_t = Mode::Photo)]
    mode: Mode,

    #[arg(long, value_enum, default_value_t = Facing::Back)]
    facing: Facing,

    #[arg(long)]
    flash: bool,

    /// Seconds to record before pressing the shutter again (video mode).
    #[arg(long, default_value_t = 3)]
    record_secs: u64,

    /// Recording cap in seconds.
    #[arg(long, default_value_t = 30)]
    max_secs: u64,

    /// Start without camera access and grant it on the first prompt.
    #[arg(long)]
    prompt: bool,

    /// Discard the capture instead of sharing it.
    #[arg(long)]
    discard: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let permissions = if args.prompt {
        ScriptedPermissions::undetermined().answering([Ok(true)])
    } else {
        ScriptedPermissions::granted()
    };

    let mut options = SessionOptions::default();
    options.recording.max_duration = Duration::from_secs(args.max_secs);

    let composer = CollectingComposer::new();
    let recorder = EventRecorder::new();
    let session = CaptureSession::new(SimulatedCamera::new(), permissions, composer.clone(), options)?;
    session.set_delegate(recorder.clone());

    session.initialize().await?;
    if !session.permission_status().is_granted() && !session.request_permission().await? {
        return Err("camera permission denied".into());
    }

    session.set_facing(match args.facing {
        Facing::Front => CameraFacing::Front,
        Facing::Back => CameraFacing::Back,
    })?;
    if args.flash {
        session.set_flash(FlashMode::On)?;
    }
    session.set_mode(match args.mode {
        Mode::Photo => CaptureMode::Photo,
        Mode::Video => CaptureMode::Video,
    })?;

    if let Mode::Video = args.mode {
        log::info!(
            "recording for {}s, capped at {:?}",
            args.record_secs,
            session.options().recording.max_duration
        );
    }
    session.press_shutter().await?;
    if let Mode::Video = args.mode {
        let mut states = session.subscribe();
        let still_recording = tokio::time::timeout(
            Duration::from_secs(args.record_secs),
            states.wait_for(|state| !state.is_recording()),
        )
        .await
        .is_err();
        if still_recording {
            session.press_shutter().await?;
        }
    }

    if let Some(error) = session.last_error().filter(|e| e.is_hardware_failure()) {
        log::warn!("camera failed, nothing to review: {}", error);
    } else if args.discard {
        session.discard()?;
    } else {
        session.share()?;
    }

    for event in recorder.events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    log::info!("composer holds {} item(s)", composer.len());
    Ok(())
}
