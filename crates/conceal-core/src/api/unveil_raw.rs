use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::shared::load_image;
use crate::error::ConcealError;
use crate::extract::extract_payload;
use crate::result::Result;

pub fn prepare() -> UnveilRawApi {
    UnveilRawApi::default()
}

/// Dumps the quantized payload bytes as they are, no dequantization is happening.
#[derive(Default, Debug)]
pub struct UnveilRawApi {
    secret_image: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

impl UnveilRawApi {
    pub fn with_secret_image<A: AsRef<Path>>(mut self, secret_image: A) -> Self {
        self.secret_image = Some(secret_image.as_ref().to_path_buf());
        self
    }

    pub fn with_output_file<A: AsRef<Path>>(mut self, output_file: A) -> Self {
        self.output_file = Some(output_file.as_ref().to_path_buf());
        self
    }

    /// returns the number of bytes written
    pub fn execute(self) -> Result<usize> {
        let Some(secret_image) = self.secret_image else {
            return Err(ConcealError::CarrierNotSet);
        };
        let Some(output_file) = self.output_file else {
            return Err(ConcealError::TargetNotSet);
        };

        let (_, payload) = extract_payload(&load_image(&secret_image)?)?;
        let mut destination =
            File::create(output_file).map_err(|source| ConcealError::WriteError { source })?;
        destination
            .write_all(&payload)
            .map_err(|source| ConcealError::WriteError { source })?;

        Ok(payload.len())
    }
}
