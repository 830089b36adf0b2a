use std::path::{Path, PathBuf};

use log::info;

use super::shared::{check_png_target, load_image, save_png};
use crate::embed::{CancellationToken, ConcealPercentage, EmbedOptions, EmbedOutcome, Embedder};
use crate::error::ConcealError;
use crate::extract::read_header;
use crate::media::Waveform;
use crate::result::Result;

pub fn prepare() -> HideApi {
    HideApi::default()
}

type ProgressCallback = Box<dyn FnMut(&ConcealPercentage)>;

#[derive(Default)]
pub struct HideApi {
    image: Option<PathBuf>,
    audio: Option<PathBuf>,
    output: Option<PathBuf>,
    options: EmbedOptions,
    cancel: CancellationToken,
    on_progress: Option<ProgressCallback>,
    verify: bool,
}

impl HideApi {
    pub fn with_options(mut self, options: EmbedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// The WAV file to hide
    pub fn with_audio<A: AsRef<Path>>(mut self, audio: A) -> Self {
        self.audio = Some(audio.as_ref().to_path_buf());
        self
    }

    /// Must be a `.png` file
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn on_progress<F: FnMut(&ConcealPercentage) + 'static>(mut self, callback: F) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Reads the header back from the written image and compares it
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn execute(self) -> Result<EmbedOutcome> {
        let Some(image) = self.image else {
            return Err(ConcealError::CarrierNotSet);
        };
        let Some(audio) = self.audio else {
            return Err(ConcealError::MissingAudio);
        };
        let Some(output) = self.output else {
            return Err(ConcealError::TargetNotSet);
        };
        check_png_target(&output)?;

        let carrier = load_image(&image)?;
        let wave = Waveform::from_file(&audio)?;
        let mut on_progress = self.on_progress;
        let mut secret_image = None;

        let outcome = Embedder::with_options(self.options).run(&carrier, &wave, &self.cancel, |p| {
            if let Some(cb) = on_progress.as_mut() {
                cb(&p);
            }
            if p.done {
                secret_image = p.data;
            }
        })?;

        if let Some(secret_image) = secret_image {
            save_png(&secret_image, &output)?;
            info!("audio hidden in {output:?}");

            if self.verify {
                let written = load_image(&output)?;
                let header = read_header(&written)?;
                if header.payload_len != wave.sample_count() || header.format != wave.format() {
                    return Err(ConcealError::MalformedHeader(format!(
                        "written image announces {header:?}"
                    )));
                }
            }
        }

        Ok(outcome)
    }
}
