//! PCM decoding for synthesized speech
//!
//! The synthesis endpoint returns 16-bit little-endian linear PCM, mono, at
//! a fixed 24 kHz. Decoding normalizes each sample into [-1.0, 1.0] before
//! the audio output stage.

use crate::{Error, Result};

/// Sample rate of the synthesis endpoint's PCM output
pub const TTS_SAMPLE_RATE: u32 = 24_000;

/// Decoded audio ready for playback
#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    /// Normalized samples in [-1.0, 1.0], mono
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decode 16-bit little-endian mono PCM into normalized floats
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32) -> Result<AudioData> {
    if bytes.len() % 2 != 0 {
        return Err(Error::AudioProcessing(format!(
            "PCM payload has odd length: {} bytes",
            bytes.len()
        )));
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    Ok(AudioData {
        samples,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_normalizes_range() {
        let bytes: Vec<u8> = [i16::MIN, 0, i16::MAX]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();

        let audio = decode_pcm16(&bytes, TTS_SAMPLE_RATE).unwrap();
        assert_eq!(audio.samples.len(), 3);
        assert_eq!(audio.samples[0], -1.0);
        assert_eq!(audio.samples[1], 0.0);
        assert_eq!(audio.samples[2], 32767.0 / 32768.0);
    }

    #[test]
    fn test_decode_is_little_endian() {
        // 0x0100 little-endian = 256
        let audio = decode_pcm16(&[0x00, 0x01], TTS_SAMPLE_RATE).unwrap();
        assert!((audio.samples[0] - 256.0 / 32768.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_odd_length_rejected() {
        assert!(decode_pcm16(&[0x00, 0x01, 0x02], TTS_SAMPLE_RATE).is_err());
    }

    #[test]
    fn test_duration() {
        let bytes = vec![0u8; 24_000 * 2];
        let audio = decode_pcm16(&bytes, TTS_SAMPLE_RATE).unwrap();
        assert!((audio.duration_secs() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_payload() {
        let audio = decode_pcm16(&[], TTS_SAMPLE_RATE).unwrap();
        assert!(audio.is_empty());
    }
}
