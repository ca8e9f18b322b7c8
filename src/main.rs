// SPDX-License-Identifier: MPL-2.0
use media_element::application::port::{MediaPlayer, MediaSource};
use media_element::config::{self, PlayerConfig};
use media_element::domain::PlaybackState;
use media_element::element::{MediaElement, MediaEvent};
use media_element::infrastructure::{SimulatedMedia, SimulatedPlayer, SIMULATED_SCHEME};
use media_element::logging;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const HELP: &str = "\
media-element: drive a media control over a simulated engine

USAGE:
  media-element [OPTIONS] [SOURCE]

ARGS:
  SOURCE               File path or sim:// URI [default: sim://demo]

OPTIONS:
  --duration <SECS>    Length of the simulated media [default: 5]
  --state <NAME>       State to apply after opening (play, pause, stop,
                       close, manual); repeatable, applied in order
  --step-ms <MS>       Time spent processing notifications after each state
                       [default: 1000]
  --audio-only         Simulate media without a video stream
  --config <PATH>      Read settings from this TOML file
  -v, --verbose        Debug logging
  -h, --help           Print this help
";

struct Args {
    source: MediaSource,
    duration: Duration,
    states: Vec<PlaybackState>,
    step: Duration,
    audio_only: bool,
    config: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(None);
    }

    let duration_secs: f64 = args.opt_value_from_str("--duration")?.unwrap_or(5.0);
    let step_ms: u64 = args.opt_value_from_str("--step-ms")?.unwrap_or(1000);
    let parsed = Args {
        duration: Duration::try_from_secs_f64(duration_secs.max(0.0))
            .unwrap_or(Duration::from_secs(5)),
        states: args.values_from_str("--state")?,
        step: Duration::from_millis(step_ms),
        audio_only: args.contains("--audio-only"),
        config: args.opt_value_from_str("--config")?,
        verbose: args.contains(["-v", "--verbose"]),
        source: match args.opt_free_from_str::<String>()? {
            Some(raw) if raw.contains("://") => MediaSource::Uri(raw),
            Some(raw) => MediaSource::File(PathBuf::from(raw)),
            None => MediaSource::Uri(format!("{SIMULATED_SCHEME}demo")),
        },
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("warning: ignoring extra arguments: {rest:?}");
    }
    Ok(Some(parsed))
}

fn log_event(event: &MediaEvent) {
    match event {
        MediaEvent::PositionChanged {
            position,
            was_external,
        } => tracing::debug!(
            position_secs = position.as_secs_f64(),
            was_external,
            "position changed"
        ),
        MediaEvent::FrameReady => tracing::trace!("frame ready"),
        MediaEvent::Failed(failure) => {
            tracing::warn!(code = ?failure.code, "media failed: {failure}");
        }
        other => tracing::info!(event = ?other, "media event"),
    }
}

async fn drive(args: Args, config: PlayerConfig) -> media_element::error::Result<()> {
    let media = SimulatedMedia {
        duration: args.duration,
        has_video: !args.audio_only,
        ..SimulatedMedia::default()
    };
    let mut element = MediaElement::with_seeking(config, move || {
        Some(Box::new(SimulatedPlayer::new(media)) as Box<dyn MediaPlayer>)
    })?;
    element.subscribe(log_event);

    tracing::info!(source = %args.source, "opening");
    element.open(args.source);
    element.on_load();
    element.run_for(args.step).await;

    if args.states.is_empty() {
        // Let the media play through to the end.
        element.run_for(args.duration).await;
    }
    for state in args.states {
        tracing::info!(%state, "applying state");
        element.request_state(state);
        element.run_for(args.step).await;
    }

    tracing::info!(
        lifecycle = ?element.lifecycle(),
        position_secs = element.position().as_secs_f64(),
        duration_secs = element.duration().as_secs_f64(),
        frames = element.frames_presented(),
        "finished"
    );
    element.on_unload();
    if !element.settle(Duration::from_secs(2)).await {
        tracing::warn!("engine did not settle before shutdown");
    }
    element.shutdown();
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };
    logging::init(args.verbose);

    let loaded = match &args.config {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("cannot load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("cannot start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(drive(args, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
