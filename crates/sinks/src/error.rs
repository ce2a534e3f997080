//! Sink error types

use thiserror::Error;

/// Sink-specific errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Queue full - frame dropped
    #[error("queue full for sink '{sink_name}', frame {frame_id} dropped")]
    QueueFull { sink_name: String, frame_id: u64 },

    /// Receiving side of a channel sink is gone
    #[error("sink '{sink_name}' receiver closed")]
    Closed { sink_name: String },

    /// Delivery error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl SinkError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Name of the sink involved, if known
    pub fn sink_name(&self) -> &str {
        match self {
            Self::SinkCreation { name, .. } => name,
            Self::QueueFull { sink_name, .. } | Self::Closed { sink_name } => sink_name,
            Self::Contract(contracts::ContractError::SinkDelivery { sink_name, .. }) => sink_name,
            Self::Contract(_) => "unknown",
        }
    }
}

impl From<SinkError> for contracts::ContractError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Contract(inner) => inner,
            other => contracts::ContractError::sink_delivery(
                other.sink_name().to_string(),
                other.to_string(),
            ),
        }
    }
}
