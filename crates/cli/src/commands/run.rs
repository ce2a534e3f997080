//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::StereoBlueprint;
use std::time::Duration;
use tracing::{info, warn};

use super::validate::collect_warnings;
use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    apply_overrides(&mut blueprint, args)?;

    info!(
        geometry = %blueprint.combiner.geometry,
        sync_tolerance_ns = blueprint.combiner.sync_tolerance_ns,
        frame_rate_hz = blueprint.capture.frame_rate_hz,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );
    for warning in collect_warnings(&blueprint) {
        warn!("{}", warning);
    }

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline = Pipeline::new(build_pipeline_config(blueprint, args));
    let shutdown_signal = shutdown_signal();

    info!("Starting pipeline...");

    tokio::select! {
        result = pipeline.run() => {
            let stats = result.context("Pipeline execution failed")?;
            info!(
                pairs = stats.pairs,
                duration_secs = stats.duration.as_secs_f64(),
                fps = format!("{:.2}", stats.fps()),
                "Pipeline completed successfully"
            );
            stats.print_summary();
            println!("{}", stats.metrics);
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Stereo combiner finished");
    Ok(())
}

/// Apply CLI overrides and re-validate
fn apply_overrides(blueprint: &mut StereoBlueprint, args: &RunArgs) -> Result<()> {
    if let Some(eye) = args.eye {
        info!(eye = %eye.channel(), "Single camera mode, forwarding eye frames");
        blueprint.combiner.forward_eye_frames = true;
    }
    if let Some(tolerance_ns) = args.tolerance_ns {
        info!(tolerance_ns, "Overriding sync tolerance from CLI");
        blueprint.combiner.sync_tolerance_ns = tolerance_ns;
        config_loader::ConfigLoader::validate(blueprint)
            .context("Invalid configuration after CLI overrides")?;
    }
    Ok(())
}

fn build_pipeline_config(blueprint: StereoBlueprint, args: &RunArgs) -> PipelineConfig {
    PipelineConfig {
        blueprint,
        max_pairs: (args.max_pairs > 0).then_some(args.max_pairs),
        frames_per_channel: (args.frames > 0).then_some(args.frames),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
        eye: args.eye.map(|eye| eye.channel()),
    }
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A handler that fails to install never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &StereoBlueprint) {
    let combiner = &blueprint.combiner;
    let capture = &blueprint.capture;

    println!("\n=== Configuration Summary ===\n");
    println!("Combiner:");
    println!(
        "  Per eye: {} -> combined {}x{}",
        combiner.geometry,
        combiner.geometry.combined_width(),
        combiner.geometry.height
    );
    println!("  Sync tolerance: {} ns", combiner.sync_tolerance_ns);
    println!("  Buffer pool: {}", combiner.pool_capacity);

    println!("\nCapture:");
    println!("  Rate: {} Hz", capture.frame_rate_hz);
    println!("  Right offset: {} ns", capture.right_offset_ns);
    println!("  Jitter: {} ns", capture.jitter_ns);

    if !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}
