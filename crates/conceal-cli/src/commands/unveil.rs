use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Unveils a recording from an image and writes it as WAV
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source image that contains a recording
    #[arg(
        short = 'i',
        long = "in",
        value_name = "image source file",
        required = true
    )]
    pub image: PathBuf,

    /// Unveiled recording will be stored as WAV file
    #[arg(short = 'o', long = "out", value_name = "output wav file", required = true)]
    pub output_file: PathBuf,
}

impl UnveilArgs {
    pub fn run(self) -> CliResult<()> {
        conceal_core::api::unveil::prepare()
            .with_secret_image(&self.image)
            .with_output(&self.output_file)
            .execute()
            .map(|_| ())
    }
}
