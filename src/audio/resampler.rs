//! Sample-rate conversion for the playback path
//!
//! Synthesized speech arrives at a fixed 24 kHz while output devices run at
//! whatever rate the platform picked, so the mono playback buffer is
//! resampled once, up front, before it is handed to the sink.

use crate::{Error, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

const CHUNK_FRAMES: usize = 1024;

/// Resample a mono buffer from `input_rate` to `output_rate`.
///
/// Returns the input unchanged when the rates already match.
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == 0 || output_rate == 0 {
        return Err(Error::AudioProcessing(
            "Sample rates must be greater than 0".into(),
        ));
    }
    if input_rate == output_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = output_rate as f64 / input_rate as f64;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1)
        .map_err(|e| Error::AudioProcessing(format!("Failed to create resampler: {}", e)))?;

    let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);
    let mut offset = 0;

    while offset < input.len() {
        let remaining = input.len() - offset;
        let take = remaining.min(CHUNK_FRAMES);

        // SincFixedIn wants exactly CHUNK_FRAMES per call; the tail of the
        // last chunk is zero-padded and the surplus output trimmed below.
        let mut chunk = vec![0.0f32; CHUNK_FRAMES];
        chunk[..take].copy_from_slice(&input[offset..offset + take]);

        let processed = resampler
            .process(&[chunk], None)
            .map_err(|e| Error::AudioProcessing(format!("Resampling failed: {}", e)))?;

        let produced = processed[0].len();
        let wanted = if take < CHUNK_FRAMES {
            ((take as f64) * ratio).ceil() as usize
        } else {
            produced
        };
        output.extend_from_slice(&processed[0][..wanted.min(produced)]);

        offset += take;
    }

    debug!(
        "Resampled {} frames at {} Hz to {} frames at {} Hz",
        input.len(),
        input_rate,
        output.len(),
        output_rate
    );

    Ok(output)
}
