mod pixel;
mod waveform;

pub use pixel::*;
pub use waveform::*;
