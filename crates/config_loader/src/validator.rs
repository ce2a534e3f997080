//! Configuration validation
//!
//! Rules:
//! - per-eye width and height > 0, both even (4:2:0 chroma subsampling)
//! - sync_tolerance_ns > 0
//! - pool_capacity > 0
//! - capture.frame_rate_hz finite and > 0
//! - capture.jitter_ns below half the frame interval
//! - sink names non-empty and unique
//! - channel sinks have queue_capacity > 0

use std::collections::HashSet;

use contracts::{ContractError, SinkType, StereoBlueprint};

/// Validate a StereoBlueprint
///
/// Returns the first error encountered.
pub fn validate(blueprint: &StereoBlueprint) -> Result<(), ContractError> {
    validate_geometry(blueprint)?;
    validate_combiner(blueprint)?;
    validate_capture(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_geometry(blueprint: &StereoBlueprint) -> Result<(), ContractError> {
    let geometry = blueprint.combiner.geometry;
    for (field, value) in [
        ("combiner.width", geometry.width),
        ("combiner.height", geometry.height),
    ] {
        if value == 0 {
            return Err(ContractError::config_validation(field, "must be > 0"));
        }
        if value % 2 != 0 {
            return Err(ContractError::config_validation(
                field,
                format!("must be even for 4:2:0 frames, got {value}"),
            ));
        }
    }
    Ok(())
}

fn validate_combiner(blueprint: &StereoBlueprint) -> Result<(), ContractError> {
    let combiner = &blueprint.combiner;
    if combiner.sync_tolerance_ns == 0 {
        return Err(ContractError::config_validation(
            "combiner.sync_tolerance_ns",
            "sync_tolerance_ns must be > 0",
        ));
    }
    if combiner.pool_capacity == 0 {
        return Err(ContractError::config_validation(
            "combiner.pool_capacity",
            "pool_capacity must be > 0",
        ));
    }
    Ok(())
}

fn validate_capture(blueprint: &StereoBlueprint) -> Result<(), ContractError> {
    let capture = &blueprint.capture;
    if !capture.frame_rate_hz.is_finite() || capture.frame_rate_hz <= 0.0 {
        return Err(ContractError::config_validation(
            "capture.frame_rate_hz",
            format!("frame_rate_hz must be > 0, got {}", capture.frame_rate_hz),
        ));
    }

    let half_interval = capture.frame_interval_ns() / 2;
    if capture.jitter_ns >= half_interval {
        return Err(ContractError::config_validation(
            "capture.jitter_ns",
            format!(
                "jitter_ns ({}) must be below half the frame interval ({})",
                capture.jitter_ns, half_interval
            ),
        ));
    }
    Ok(())
}

fn validate_sinks(blueprint: &StereoBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.sink_type == SinkType::Channel && sink.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].queue_capacity", sink.name),
                "queue_capacity must be > 0",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CombinerConfig, FrameGeometry, SinkConfig};

    fn minimal_blueprint() -> StereoBlueprint {
        StereoBlueprint {
            combiner: CombinerConfig::new(FrameGeometry::new(640, 480)),
            sinks: vec![SinkConfig {
                name: "log".into(),
                sink_type: SinkType::Log,
                queue_capacity: 8,
            }],
            ..Default::default()
        }
    }

    fn error_of(bp: &StereoBlueprint) -> String {
        validate(bp).unwrap_err().to_string()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_blueprint()).is_ok());
        assert!(validate(&StereoBlueprint::default()).is_ok());
    }

    #[test]
    fn test_odd_height() {
        let mut bp = minimal_blueprint();
        bp.combiner.geometry.height = 481;
        let err = error_of(&bp);
        assert!(err.contains("combiner.height"), "got: {err}");
        assert!(err.contains("even"), "got: {err}");
    }

    #[test]
    fn test_zero_width() {
        let mut bp = minimal_blueprint();
        bp.combiner.geometry.width = 0;
        assert!(error_of(&bp).contains("combiner.width"));
    }

    #[test]
    fn test_zero_tolerance() {
        let mut bp = minimal_blueprint();
        bp.combiner.sync_tolerance_ns = 0;
        assert!(error_of(&bp).contains("sync_tolerance_ns must be > 0"));
    }

    #[test]
    fn test_zero_pool_capacity() {
        let mut bp = minimal_blueprint();
        bp.combiner.pool_capacity = 0;
        assert!(error_of(&bp).contains("pool_capacity"));
    }

    #[test]
    fn test_invalid_frame_rate() {
        let mut bp = minimal_blueprint();
        bp.capture.frame_rate_hz = -5.0;
        let err = error_of(&bp);
        assert!(err.contains("frame_rate_hz must be > 0"), "got: {err}");
    }

    #[test]
    fn test_excessive_jitter() {
        let mut bp = minimal_blueprint();
        bp.capture.frame_rate_hz = 100.0;
        bp.capture.jitter_ns = 5_000_000;
        let err = error_of(&bp);
        assert!(err.contains("capture.jitter_ns"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].name = String::new();
        assert!(error_of(&bp).contains("cannot be empty"));
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(bp.sinks[0].clone());
        assert!(error_of(&bp).contains("duplicate sink name"));
    }

    #[test]
    fn test_channel_sink_zero_queue() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(SinkConfig {
            name: "queue".into(),
            sink_type: SinkType::Channel,
            queue_capacity: 0,
        });
        assert!(error_of(&bp).contains("queue_capacity must be > 0"));
    }
}
