use std::path::{Path, PathBuf};

use log::info;

use super::shared::load_image;
use crate::error::ConcealError;
use crate::extract::extract;
use crate::media::AudioFormat;
use crate::result::Result;

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Default, Debug)]
pub struct UnveilApi {
    secret_image: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl UnveilApi {
    pub fn with_secret_image<A: AsRef<Path>>(mut self, secret_image: A) -> Self {
        self.secret_image = Some(secret_image.as_ref().to_path_buf());
        self
    }

    /// The WAV file the unveiled audio is written to
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<AudioFormat> {
        let Some(secret_image) = self.secret_image else {
            return Err(ConcealError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(ConcealError::TargetNotSet);
        };

        let wave = extract(&load_image(&secret_image)?)?;
        wave.save_as(&output)?;
        info!(
            "unveiled {} samples at {} Hz into {output:?}",
            wave.sample_count(),
            wave.format().sample_rate
        );

        Ok(wave.format())
    }
}
