use std::path::PathBuf;

use clap::Args;
use conceal_core::api::inspect::inspect;

use crate::CliResult;

/// Shows the capacity of an image, and whether a recording would fit in
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Image to inspect
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub image: PathBuf,

    /// WAV recording to check against the capacity
    #[arg(short = 'a', long = "audio", value_name = "wav file")]
    pub audio: Option<PathBuf>,
}

impl InspectArgs {
    pub fn run(self) -> CliResult<()> {
        let report = inspect(&self.image, self.audio.as_deref())?;

        println!("image:       {}x{}", report.width, report.height);
        println!("capacity:    {} units", report.available_units);
        println!("max payload: {} samples", report.max_payload_bytes);
        match report.embedded {
            Some(header) => println!(
                "embedded:    {} samples, {} Hz, {} channel(s), {} bit",
                header.payload_len,
                header.format.sample_rate,
                header.format.channels,
                header.format.bits_per_sample
            ),
            None => println!("embedded:    nothing"),
        }
        if let Some(audio) = report.audio {
            println!(
                "audio:       {} samples, {} Hz, {} channel(s), {} bit",
                audio.sample_count,
                audio.format.sample_rate,
                audio.format.channels,
                audio.format.bits_per_sample
            );
            match audio.overflow {
                None => println!("fits:        yes"),
                Some(overflow) => println!(
                    "fits:        no, data exceeds at unit {} ({} of {} units required)",
                    overflow.unit_index, overflow.required, overflow.available
                ),
            }
        }

        Ok(())
    }
}
