//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::StereoBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    combiner: CombinerInfo,
    capture: CaptureInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct CombinerInfo {
    eye_width: u32,
    eye_height: u32,
    eye_bytes: usize,
    combined_width: u32,
    combined_bytes: usize,
    sync_tolerance_ns: u64,
    pool_capacity: usize,
    forward_eye_frames: bool,
}

#[derive(Serialize)]
struct CaptureInfo {
    frame_rate_hz: f64,
    frame_interval_ns: u64,
    right_offset_ns: i64,
    jitter_ns: u64,
    baseline_m: f32,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    queue_capacity: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &StereoBlueprint, args: &InfoArgs) -> ConfigInfo {
    let combiner = &blueprint.combiner;
    let geometry = combiner.geometry;
    let capture = &blueprint.capture;

    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
                queue_capacity: s.queue_capacity,
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        combiner: CombinerInfo {
            eye_width: geometry.width,
            eye_height: geometry.height,
            eye_bytes: geometry.eye_len(),
            combined_width: geometry.combined_width(),
            combined_bytes: geometry.combined_len(),
            sync_tolerance_ns: combiner.sync_tolerance_ns,
            pool_capacity: combiner.pool_capacity,
            forward_eye_frames: combiner.forward_eye_frames,
        },
        capture: CaptureInfo {
            frame_rate_hz: capture.frame_rate_hz,
            frame_interval_ns: capture.frame_interval_ns(),
            right_offset_ns: capture.right_offset_ns,
            jitter_ns: capture.jitter_ns,
            baseline_m: capture.baseline_m,
        },
        sinks,
    }
}

fn print_config_info(blueprint: &StereoBlueprint, args: &InfoArgs) {
    let combiner = &blueprint.combiner;
    let geometry = combiner.geometry;
    let capture = &blueprint.capture;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Stereo Combiner Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🖼  Combiner");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!(
        "   ├─ Per eye: {} ({} bytes, YUV 4:2:0)",
        geometry,
        geometry.eye_len()
    );
    println!(
        "   ├─ Combined: {}x{} ({} bytes)",
        geometry.combined_width(),
        geometry.height,
        geometry.combined_len()
    );
    println!(
        "   ├─ Sync tolerance: {:.3} ms",
        combiner.sync_tolerance_ns as f64 / 1e6
    );
    println!("   ├─ Buffer pool: {} buffers", combiner.pool_capacity);
    println!(
        "   └─ Eye frame forwarding: {}",
        if combiner.forward_eye_frames { "on" } else { "off" }
    );

    println!("\n📷 Synthetic Capture");
    println!(
        "   ├─ Rate: {} Hz ({:.3} ms interval)",
        capture.frame_rate_hz,
        capture.frame_interval_ns() as f64 / 1e6
    );
    println!(
        "   ├─ Right clock offset: {:.3} ms",
        capture.right_offset_ns as f64 / 1e6
    );
    println!("   ├─ Jitter: ±{:.3} ms", capture.jitter_ns as f64 / 1e6);
    println!("   └─ Baseline: {} m", capture.baseline_m);

    if blueprint.sinks.is_empty() {
        println!("\n📤 Sinks: none");
    } else if args.sinks {
        println!("\n📤 Sinks ({})", blueprint.sinks.len());
        for (i, sink) in blueprint.sinks.iter().enumerate() {
            let is_last = i == blueprint.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!(
                "   {} {} ({:?}, queue {})",
                prefix, sink.name, sink.sink_type, sink.queue_capacity
            );
        }
    } else {
        println!(
            "\n📤 Sinks: {} (use --sinks for details)",
            blueprint.sinks.len()
        );
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FrameGeometry, SinkConfig, SinkType};

    #[test]
    fn test_build_config_info_sizes() {
        let mut bp = StereoBlueprint::default();
        bp.combiner.geometry = FrameGeometry::new(640, 480);
        bp.sinks.push(SinkConfig {
            name: "log".into(),
            sink_type: SinkType::Log,
            queue_capacity: 8,
        });

        let args = InfoArgs {
            config: "unused.toml".into(),
            json: true,
            sinks: true,
        };
        let info = build_config_info(&bp, &args);

        assert_eq!(info.combiner.eye_bytes, 640 * 480 * 3 / 2);
        assert_eq!(info.combiner.combined_width, 1280);
        assert_eq!(info.combiner.combined_bytes, 640 * 480 * 3);
        assert_eq!(info.sinks.len(), 1);
    }
}
