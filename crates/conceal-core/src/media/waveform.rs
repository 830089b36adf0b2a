use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::error;

use crate::error::ConcealError;
use crate::result::Result;

pub const MIN_BITS_PER_SAMPLE: u16 = 8;
pub const MAX_BITS_PER_SAMPLE: u16 = 32;

/// Metadata needed to play back a waveform
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ConcealError::InvalidWaveform(
                "sample rate must be positive".to_string(),
            ));
        }
        if self.channels == 0 {
            return Err(ConcealError::InvalidWaveform(
                "at least one channel is required".to_string(),
            ));
        }
        if !(MIN_BITS_PER_SAMPLE..=MAX_BITS_PER_SAMPLE).contains(&self.bits_per_sample) {
            return Err(ConcealError::UnsupportedAudioFormat);
        }

        Ok(())
    }
}

impl From<AudioFormat> for WavSpec {
    fn from(value: AudioFormat) -> Self {
        WavSpec {
            channels: value.channels,
            sample_rate: value.sample_rate,
            bits_per_sample: value.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

impl TryFrom<WavSpec> for AudioFormat {
    type Error = ConcealError;

    fn try_from(spec: WavSpec) -> Result<Self> {
        if spec.sample_format != SampleFormat::Int {
            return Err(ConcealError::UnsupportedAudioFormat);
        }
        let format = Self::new(spec.sample_rate, spec.channels, spec.bits_per_sample);
        format.validate()?;

        Ok(format)
    }
}

/// Interleaved integer samples of one recording plus its format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Waveform {
    format: AudioFormat,
    samples: Vec<i32>,
}

impl Waveform {
    /// all samples must share the one format, so the count has to fill whole frames
    pub fn new(format: AudioFormat, samples: Vec<i32>) -> Result<Self> {
        format.validate()?;
        if samples.len() % format.channels as usize != 0 {
            return Err(ConcealError::InvalidWaveform(format!(
                "{} samples do not fill whole frames of {} channels",
                samples.len(),
                format.channels
            )));
        }

        Ok(Self { format, samples })
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.format.channels as usize
    }

    pub fn from_wav_reader<R: Read>(mut reader: WavReader<R>) -> Result<Self> {
        let format = AudioFormat::try_from(reader.spec())?;
        let samples = reader
            .samples::<i32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Error reading audio samples: {e}");
                ConcealError::InvalidAudioMedia
            })?;

        Self::new(format, samples)
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let reader = WavReader::open(file).map_err(|e| {
            error!("Error opening audio file {file:?}: {e}");
            ConcealError::InvalidAudioMedia
        })?;

        Self::from_wav_reader(reader)
    }

    pub fn write_wav<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut wav_writer = WavWriter::new(writer, self.format.into())
            .map_err(|_| ConcealError::AudioEncodingError)?;
        for s in self.samples.iter() {
            wav_writer
                .write_sample(*s)
                .map_err(|_| ConcealError::AudioEncodingError)?;
        }
        wav_writer
            .finalize()
            .map_err(|_| ConcealError::AudioEncodingError)
    }

    pub fn save_as(&self, file: &Path) -> Result<()> {
        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            ConcealError::WriteError { source: e }
        })?;

        self.write_wav(std::io::BufWriter::new(f))
    }
}

/// reads just the header of a wav file, without touching the samples
pub fn probe_wav(file: &Path) -> Result<(AudioFormat, usize)> {
    let f = File::open(file).map_err(|source| ConcealError::ReadError { source })?;
    let reader = WavReader::new(BufReader::new(f)).map_err(|e| {
        error!("Error reading audio header of {file:?}: {e}");
        ConcealError::InvalidAudioMedia
    })?;
    let samples = reader.len() as usize;

    Ok((AudioFormat::try_from(reader.spec())?, samples))
}
