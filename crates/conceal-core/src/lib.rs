//! # Conceal Core API
//!
//! Hides a digitized audio waveform in the 3 least significant bits of every color
//! channel of an RGB image, and unveils it again. The pieces are
//! - [`media`] for pixels and waveforms
//! - [`codec`] for quantization, bit packing, the header and the capacity check
//! - [`embed`] for the cancellable, progress reporting embedding engine
//! - [`extract`] for reading a waveform back out of an image
//! - [`api`] for working with PNG and WAV files directly
//!
//! # Usage Examples
//!
//! ## Hide an audio recording inside an image
//!
//! ```rust
//! use conceal_core::media::{AudioFormat, Waveform};
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let image_file = temp_dir.path().join("carrier.png");
//! let audio_file = temp_dir.path().join("recording.wav");
//!
//! image::RgbImage::from_pixel(80, 60, image::Rgb([200, 120, 40]))
//!     .save(&image_file)
//!     .expect("Failed to write carrier image");
//! Waveform::new(AudioFormat::new(8000, 1, 16), (0..1000).map(|i| i * 30 - 15000).collect())
//!     .expect("Failed to create waveform")
//!     .save_as(&audio_file)
//!     .expect("Failed to write recording");
//!
//! conceal_core::api::hide::prepare()
//!     .with_image(&image_file)
//!     .with_audio(&audio_file)
//!     .with_output(temp_dir.path().join("image-with-audio.png"))
//!     .execute()
//!     .expect("Failed to hide audio in image");
//! ```
//!
//! ## Unveil the recording from an image
//!
//! ```rust,no_run
//! conceal_core::api::unveil::prepare()
//!     .with_secret_image("image-with-audio.png")
//!     .with_output("unveiled.wav")
//!     .execute()
//!     .expect("Failed to unveil audio from image");
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod codec;
pub mod embed;
pub mod error;
pub mod extract;
pub mod media;
pub mod result;

pub use crate::embed::{
    CancellationToken, ConcealPercentage, EmbedJob, EmbedOptions, EmbedOutcome, EmbedState,
    Embedder,
};
pub use crate::error::ConcealError;
pub use crate::extract::extract;
pub use crate::media::{AudioFormat, Pixel, PixelSequence, Waveform};
pub use crate::result::Result;
