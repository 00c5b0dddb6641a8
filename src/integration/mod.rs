//! Wiring between the interface and the session worker.

pub mod pipeline;

pub use pipeline::{
    null_sink_factory, RecognizerFactory, SessionCommand, SessionEvent, SessionPipeline,
    SinkFactory,
};

#[cfg(feature = "audio-io")]
pub use pipeline::platform_sink_factory;
