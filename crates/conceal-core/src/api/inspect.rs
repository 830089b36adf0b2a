use std::path::Path;

use super::shared::load_image;
use crate::codec::capacity::{available_units, check_capacity, max_payload_bytes, CapacityOverflow};
use crate::codec::header::{Header, HEADER_UNITS};
use crate::extract::read_header;
use crate::media::{probe_wav, AudioFormat};
use crate::result::Result;

/// What an image can take and what it already carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInspection {
    pub width: u32,
    pub height: u32,
    pub available_units: usize,
    pub max_payload_bytes: usize,
    /// header of audio that is already embedded, if any
    pub embedded: Option<Header>,
    pub audio: Option<AudioInspection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInspection {
    pub format: AudioFormat,
    pub sample_count: usize,
    /// `None` when the audio fits into the image
    pub overflow: Option<CapacityOverflow>,
}

impl AudioInspection {
    pub fn fits(&self) -> bool {
        self.overflow.is_none()
    }
}

/// Inspects an image and optionally checks whether a WAV file would fit in
pub fn inspect(image: &Path, audio: Option<&Path>) -> Result<ImageInspection> {
    let carrier = load_image(image)?;
    let (width, height) = carrier.dimensions();
    let pixel_count = width as usize * height as usize;

    let audio = match audio {
        Some(audio) => {
            let (format, sample_count) = probe_wav(audio)?;
            Some(AudioInspection {
                format,
                sample_count,
                overflow: check_capacity(pixel_count, HEADER_UNITS, sample_count).err(),
            })
        }
        None => None,
    };

    Ok(ImageInspection {
        width,
        height,
        available_units: available_units(pixel_count),
        max_payload_bytes: max_payload_bytes(pixel_count),
        embedded: read_header(&carrier).ok(),
        audio,
    })
}
