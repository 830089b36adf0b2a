//! Maps audio samples into the 8-bit channel domain and back.
//!
//! The mapping is linear, truncating on the way in and rounding up on the way out:
//!
//! - `quantize(s) = floor((s - min) * 255 / span)`
//! - `dequantize(q) = min + ceil(q * span / 255)`
//!
//! where `span = max - min = 2^bits - 1`. Because `span >= 255` for every supported
//! bit depth, `quantize(dequantize(q)) == q` holds for all `q`. For bit depths that
//! are multiples of 8 the span divides by 255 and both directions are exact steps.

use crate::error::ConcealError;
use crate::media::{AudioFormat, Waveform, MAX_BITS_PER_SAMPLE, MIN_BITS_PER_SAMPLE};
use crate::result::Result;

const CHANNEL_MAX: i64 = u8::MAX as i64;

/// The closed numeric domain of signed samples of one bit depth
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SampleRange {
    min: i64,
    max: i64,
}

impl SampleRange {
    /// domain of signed integer samples with the given bit depth (8 to 32)
    pub fn for_bits(bits_per_sample: u16) -> Result<Self> {
        if !(MIN_BITS_PER_SAMPLE..=MAX_BITS_PER_SAMPLE).contains(&bits_per_sample) {
            return Err(ConcealError::UnsupportedAudioFormat);
        }
        let half = 1_i64 << (bits_per_sample - 1);

        Ok(Self {
            min: -half,
            max: half - 1,
        })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    fn span(&self) -> i64 {
        self.max - self.min
    }
}

impl TryFrom<AudioFormat> for SampleRange {
    type Error = ConcealError;

    fn try_from(value: AudioFormat) -> Result<Self> {
        value.validate()?;
        Self::for_bits(value.bits_per_sample)
    }
}

/// Maps a sample onto `0..=255`, samples outside of the range are clamped.
pub fn quantize(sample: i32, range: SampleRange) -> u8 {
    let s = (sample as i64).clamp(range.min, range.max);
    ((s - range.min) * CHANNEL_MAX / range.span()) as u8
}

/// Maps a channel value back into the sample domain, lossy.
pub fn dequantize(value: u8, range: SampleRange) -> i32 {
    (range.min + (value as i64 * range.span() + CHANNEL_MAX - 1) / CHANNEL_MAX) as i32
}

/// Turns a waveform into its byte shadow, one byte per sample
pub fn quantize_waveform(waveform: &Waveform) -> Result<Vec<u8>> {
    let range = SampleRange::try_from(waveform.format())?;

    Ok(waveform
        .samples()
        .iter()
        .map(|s| quantize(*s, range))
        .collect())
}

/// Rebuilds playable samples out of a byte shadow
pub fn dequantize_waveform(shadow: &[u8], format: AudioFormat) -> Result<Waveform> {
    let range = SampleRange::try_from(format)?;
    let samples = shadow.iter().map(|q| dequantize(*q, range)).collect();

    Waveform::new(format, samples)
}
