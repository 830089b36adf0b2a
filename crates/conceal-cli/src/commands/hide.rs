use std::path::PathBuf;

use clap::Args;
use conceal_core::{ConcealError, EmbedOptions, EmbedOutcome};
use log::{error, info};

use crate::CliResult;

/// Hides a WAV recording in an image, the result is always a PNG
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier image such as PNG or JPEG, used readonly.
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub image: PathBuf,

    /// WAV recording with integer samples that will be hidden
    #[arg(short = 'a', long = "audio", value_name = "wav file", required = true)]
    pub audio: PathBuf,

    /// Final image will be stored as PNG file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output png file",
        required = true
    )]
    pub write_to_file: PathBuf,

    /// Reads the header back from the written image to make sure it survived
    #[arg(long)]
    pub verify: bool,
}

impl HideArgs {
    pub fn run(self, options: EmbedOptions) -> CliResult<()> {
        let mut next_report = 0.0;
        let result = conceal_core::api::hide::prepare()
            .with_image(&self.image)
            .with_audio(&self.audio)
            .with_output(&self.write_to_file)
            .with_options(options)
            .with_verification(self.verify)
            .on_progress(move |p| {
                if p.percent >= next_report && !p.done {
                    info!("hiding audio: {:.0}%", p.percent);
                    next_report = (p.percent / 10.0).floor() * 10.0 + 10.0;
                }
            })
            .execute();

        match result {
            Ok(EmbedOutcome::Completed) => {
                info!("done, written to {:?}", self.write_to_file);
                Ok(())
            }
            Ok(EmbedOutcome::Cancelled) => Ok(()),
            Err(e @ ConcealError::CapacityOverflow { unit_index, .. }) => {
                error!(
                    "the audio exceeds the image at unit {unit_index}, please choose a smaller audio file or a larger image"
                );
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
