use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use approach_track_rs::config::{LogFormat, RunConfig};
use approach_track_rs::video::{open_sink, open_source};
use approach_track_rs::{AnnotationRenderer, FramePipeline, LabelMap, ReplayDetector, SortTracker};

fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(env_filter)
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    let config = RunConfig::parse();
    init_tracing(config.log_format);

    let labels = match &config.labels {
        Some(path) => LabelMap::load(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "could not read labels, using class ids");
            LabelMap::new()
        }),
        None => LabelMap::new(),
    };

    let renderer = match &config.font {
        Some(path) => AnnotationRenderer::from_font_file(path)?,
        None => AnnotationRenderer::default(),
    };

    let mut detector = ReplayDetector::open(&config.model, config.threshold)?;

    // Nothing is written unless the source opens.
    let mut source = open_source(&config.input, config.fps)
        .with_context(|| format!("opening {}", config.input.display()))?;
    let (width, height) = source.dimensions();
    info!(
        input = %config.input.display(),
        width,
        height,
        fps = source.frame_rate(),
        frames = ?source.frame_count(),
        tracking = config.tracking_enabled(),
        "opened source"
    );

    let mut sink = match open_sink(&config.output, source.frame_rate(), (width, height)) {
        Ok(sink) => sink,
        Err(err) => {
            source.release()?;
            return Err(err).with_context(|| format!("opening {}", config.output.display()));
        }
    };

    let mut pipeline = FramePipeline::new(
        SortTracker::new(config.sort_config()),
        config.classifier(),
        renderer,
        labels,
        config.tracking_enabled(),
    );

    let summary = pipeline.run(source.as_mut(), sink.as_mut(), &mut detector)?;
    info!(
        frames = summary.frames,
        alert_frames = summary.alert_frames,
        tracks = summary.tracks_seen,
        history_entries = summary.history_entries,
        live_tracks = pipeline.associator().live_tracks(),
        "finished"
    );

    Ok(())
}
