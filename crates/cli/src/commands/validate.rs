//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{SinkType, StereoBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    geometry: String,
    sync_tolerance_ms: f64,
    frame_rate_hz: f64,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: Vec::new(),
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(&blueprint),
            summary: Some(ConfigSummary {
                version: format!("{:?}", blueprint.version),
                geometry: blueprint.combiner.geometry.to_string(),
                sync_tolerance_ms: blueprint.combiner.sync_tolerance_ns as f64 / 1e6,
                frame_rate_hz: blueprint.capture.frame_rate_hz,
                sink_count: blueprint.sinks.len(),
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        },
    }
}

/// Non-fatal configuration issues
pub fn collect_warnings(blueprint: &StereoBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let combiner = &blueprint.combiner;
    let capture = &blueprint.capture;

    if blueprint.sinks.is_empty() {
        warnings.push("No sinks configured - combined frames will be discarded".to_string());
    }

    let worst_gap = capture.right_offset_ns.unsigned_abs() + 2 * capture.jitter_ns;
    if worst_gap >= combiner.sync_tolerance_ns {
        warnings.push(format!(
            "right_offset_ns +/- jitter can reach {worst_gap} ns, not below sync_tolerance_ns \
             ({}) - some frames will never pair",
            combiner.sync_tolerance_ns
        ));
    }

    if combiner.sync_tolerance_ns >= capture.frame_interval_ns() / 2 {
        warnings.push(format!(
            "sync_tolerance_ns ({}) is at least half the frame interval - frames from \
             different capture cycles may pair",
            combiner.sync_tolerance_ns
        ));
    }

    let all_channel_sinks = !blueprint.sinks.is_empty()
        && blueprint
            .sinks
            .iter()
            .all(|sink| sink.sink_type == SinkType::Channel);
    if combiner.forward_eye_frames && all_channel_sinks {
        warnings.push(
            "forward_eye_frames is set but channel sinks only carry combined frames".to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Geometry (per eye): {}", summary.geometry);
            println!("  Sync tolerance: {:.3} ms", summary.sync_tolerance_ms);
            println!("  Capture rate: {} Hz", summary.frame_rate_hz);
            println!("  Sinks: {}", summary.sink_count);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkConfig;
    use std::io::Write;

    fn sink(name: &str, sink_type: SinkType) -> SinkConfig {
        SinkConfig {
            name: name.to_string(),
            sink_type,
            queue_capacity: 8,
        }
    }

    #[test]
    fn test_default_blueprint_warns_only_about_sinks() {
        let warnings = collect_warnings(&StereoBlueprint::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("No sinks"));
    }

    #[test]
    fn test_offset_beyond_tolerance_warns() {
        let mut bp = StereoBlueprint::default();
        bp.sinks.push(sink("log", SinkType::Log));
        bp.capture.right_offset_ns = 6_000_000;

        let warnings = collect_warnings(&bp);
        assert!(warnings.iter().any(|w| w.contains("never pair")));
    }

    #[test]
    fn test_eye_forwarding_to_channel_only_warns() {
        let mut bp = StereoBlueprint::default();
        bp.combiner.forward_eye_frames = true;
        bp.sinks.push(sink("queue", SinkType::Channel));

        let warnings = collect_warnings(&bp);
        assert!(warnings.iter().any(|w| w.contains("forward_eye_frames")));
    }

    #[test]
    fn test_validate_config_reports_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[combiner]\nwidth = 3\nheight = 2").unwrap();

        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("combiner.width"));
    }

    #[test]
    fn test_validate_missing_file() {
        let result = validate_config(&ValidateArgs {
            config: "/nonexistent/stereo.toml".into(),
            json: false,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }
}
