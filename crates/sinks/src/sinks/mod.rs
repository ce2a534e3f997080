//! Sink implementations
//!
//! Contains LogSink, ChannelSink, FanoutSink and NullSink.

mod channel;
mod fanout;
mod log;
mod null;

pub use self::channel::{spawn_drain, ChannelSink, FrameReceiver};
pub use self::fanout::FanoutSink;
pub use self::log::LogSink;
pub use self::null::NullSink;
