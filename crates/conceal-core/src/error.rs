use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcealError {
    /// Represents a payload that does not fit into the carrier image.
    /// `unit_index` is the first channel slot that would be written out of bounds.
    #[error(
        "Capacity Error: data exceeds the image at unit {unit_index}, {required} units are required but only {available} are available"
    )]
    CapacityOverflow {
        unit_index: usize,
        required: usize,
        available: usize,
    },

    /// Represents an image that does not carry a valid header, e.g. it never had audio embedded
    /// or the low bits were destroyed by lossy recompression
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Represents a pixel sequence whose length does not match the declared dimensions
    #[error("Dimension mismatch: {len} pixels cannot form a {width}x{height} image")]
    DimensionMismatch { width: u32, height: u32, len: usize },

    /// Represents an image with zero width or height
    #[error("Image has no pixels")]
    EmptyImage,

    /// Represents a waveform with inconsistent metadata
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(String),

    /// Represents an audio format that cannot be quantized, for example float samples
    #[error("Audio format is not supported, only integer PCM with 8 to 32 bits per sample")]
    UnsupportedAudioFormat,

    /// Represents an unsupported media file. For example, a text file given as image
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents an invalid image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents an invalid audio media. For example, a broken WAV file
    #[error("Audio media is invalid")]
    InvalidAudioMedia,

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents a failure when encoding an audio file.
    #[error("Audio encoding error")]
    AudioEncodingError,

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Represents a background embedding thread that died before reporting its outcome
    #[error("Embedding worker panicked")]
    EmbedWorkerPanicked,

    #[error("No carrier image set")]
    CarrierNotSet,

    #[error("No target file set")]
    TargetNotSet,

    #[error("API Error: Missing audio")]
    MissingAudio,
}
