pub mod output;
pub mod pcm;
pub mod playback;
pub mod resampler;

pub use output::{AudioSink, NullSink};
pub use pcm::{decode_pcm16, AudioData, TTS_SAMPLE_RATE};
pub use playback::{PlaybackController, PlaybackState};
