//! The inverse of [`crate::embed`]: header first, then exactly the announced payload.

use image::RgbImage;
use log::debug;

use crate::codec::bit_packer;
use crate::codec::header::{decode_header, Header, HEADER_UNITS};
use crate::codec::quantizer::dequantize_waveform;
use crate::media::{PixelSequence, Waveform};
use crate::result::Result;

/// Reads only the header of an image
pub fn read_header(image: &RgbImage) -> Result<Header> {
    let pixels = PixelSequence::from_image(image)?;
    decode_header(pixels.pixels())
}

/// Reads the header and the quantized payload bytes, one byte per sample
pub fn extract_payload(image: &RgbImage) -> Result<(Header, Vec<u8>)> {
    let pixels = PixelSequence::from_image(image)?;
    let header = decode_header(pixels.pixels())?;
    let payload = bit_packer::unpack(pixels.pixels(), HEADER_UNITS, header.payload_len)?;
    debug!("extracted {} payload bytes", payload.len());

    Ok((header, payload))
}

/// Unveils the waveform hidden in an image
pub fn extract(image: &RgbImage) -> Result<Waveform> {
    let (header, payload) = extract_payload(image)?;
    dequantize_waveform(&payload, header.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::quantizer::{quantize_waveform, SampleRange};
    use crate::embed::Embedder;
    use crate::error::ConcealError;
    use crate::media::AudioFormat;
    use crate::test_utils::{prepare_image, prepare_waveform};

    #[test]
    fn should_unveil_5000_samples_from_100x100() {
        let image = prepare_image(100, 100);
        let wave = prepare_waveform(5_000);
        let output = Embedder::new().embed(&image, &wave).unwrap();

        let unveiled = extract(&output).unwrap();

        assert_eq!(unveiled.sample_count(), 5_000);
        assert_eq!(unveiled.format(), wave.format());
        assert_eq!(
            quantize_waveform(&unveiled).unwrap(),
            quantize_waveform(&wave).unwrap()
        );
    }

    #[test]
    fn should_stay_close_to_the_original_samples() {
        let image = prepare_image(64, 64);
        let wave = prepare_waveform(1_000);
        let output = Embedder::new().embed(&image, &wave).unwrap();

        let unveiled = extract(&output).unwrap();
        let range = SampleRange::for_bits(16).unwrap();
        let step = (range.max() - range.min()) / 255;
        for (given, original) in unveiled.samples().iter().zip(wave.samples()) {
            assert!(
                (*given as i64 - *original as i64).abs() <= step,
                "{given} is too far away from {original}"
            );
        }
    }

    #[test]
    fn should_recover_the_header_exactly() {
        let format = AudioFormat::new(11025, 2, 24);
        let wave = Waveform::new(format, (0..300).map(|i| i * 20_000 - 3_000_000).collect())
            .unwrap();
        let output = Embedder::new()
            .embed(&prepare_image(50, 50), &wave)
            .unwrap();

        let header = read_header(&output).unwrap();
        assert_eq!(header, Header::new(300, format));
    }

    #[test]
    fn should_handle_empty_waveforms() {
        let wave = Waveform::new(AudioFormat::new(8000, 1, 8), vec![]).unwrap();
        let output = Embedder::new()
            .embed(&prepare_image(4, 4), &wave)
            .unwrap();

        let unveiled = extract(&output).unwrap();
        assert_eq!(unveiled.sample_count(), 0);
    }

    #[test]
    fn should_refuse_plain_images() {
        let plain = RgbImage::from_pixel(30, 30, image::Rgb([0, 0, 0]));
        assert!(matches!(
            extract(&plain),
            Err(ConcealError::MalformedHeader(_))
        ));
    }
}
