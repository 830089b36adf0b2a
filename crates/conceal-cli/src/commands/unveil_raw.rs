use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::CliResult;

/// Unveils the raw quantized payload bytes of an image
#[derive(Args, Debug)]
pub struct UnveilRawArgs {
    /// Source image that contains a recording
    #[arg(
        short = 'i',
        long = "in",
        value_name = "image source file",
        required = true
    )]
    pub image: PathBuf,

    /// Raw data will be stored as binary file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub output_file: PathBuf,
}

impl UnveilRawArgs {
    pub fn run(self) -> CliResult<()> {
        let written = conceal_core::api::unveil_raw::prepare()
            .with_secret_image(&self.image)
            .with_output_file(&self.output_file)
            .execute()?;
        info!("{written} bytes written to {:?}", self.output_file);

        Ok(())
    }
}
