use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{ImageBuffer, RgbImage};
use tempfile::TempDir;

use conceal_core::api::{hide, inspect, unveil, unveil_raw};
use conceal_core::codec::quantizer::quantize_waveform;
use conceal_core::*;

fn write_carrier(dir: &Path, width: u32, height: u32) -> PathBuf {
    let file = dir.join(format!("carrier-{width}x{height}.png"));
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        image::Rgb([(x * 3) as u8, (y * 5) as u8, (x + y) as u8])
    });
    img.save(&file).expect("Cannot write carrier image");
    file
}

fn write_recording(dir: &Path, format: AudioFormat, samples: usize) -> (PathBuf, Waveform) {
    let file = dir.join(format!("recording-{samples}.wav"));
    let half = 1_i64 << (format.bits_per_sample - 1);
    let wave = Waveform::new(
        format,
        (0..samples as i64)
            .map(|i| ((i * 104_729) % (2 * half) - half) as i32)
            .collect(),
    )
    .expect("Cannot create waveform");
    wave.save_as(&file).expect("Cannot write recording");
    (file, wave)
}

#[test]
fn should_hide_and_unveil_a_recording() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 100, 100);
    let (recording, wave) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 16), 5_000);
    let secret_image = out_dir.path().join("secret.png");
    let unveiled_file = out_dir.path().join("unveiled.wav");

    let outcome = hide::prepare()
        .with_image(&carrier)
        .with_audio(&recording)
        .with_output(&secret_image)
        .with_verification(true)
        .execute()
        .expect("Cannot hide recording");
    assert_eq!(outcome, EmbedOutcome::Completed);

    let format = unveil::prepare()
        .with_secret_image(&secret_image)
        .with_output(&unveiled_file)
        .execute()
        .expect("Cannot unveil recording");
    assert_eq!(format, wave.format());

    let unveiled = Waveform::from_file(&unveiled_file).expect("Cannot read unveiled recording");
    assert_eq!(unveiled.sample_count(), 5_000);
    assert_eq!(
        quantize_waveform(&unveiled).unwrap(),
        quantize_waveform(&wave).unwrap()
    );
}

#[test]
fn should_hide_stereo_24_bit_recordings() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 60, 40);
    let (recording, wave) = write_recording(out_dir.path(), AudioFormat::new(48000, 2, 24), 600);
    let secret_image = out_dir.path().join("secret.png");

    hide::prepare()
        .with_image(&carrier)
        .with_audio(&recording)
        .with_output(&secret_image)
        .execute()
        .expect("Cannot hide recording");

    let secret = image::open(&secret_image).unwrap().to_rgb8();
    let unveiled = extract(&secret).expect("Cannot extract");
    assert_eq!(unveiled.format(), wave.format());
    assert_eq!(unveiled.frame_count(), 300);
    assert_eq!(
        quantize_waveform(&unveiled).unwrap(),
        quantize_waveform(&wave).unwrap()
    );
}

#[test]
fn should_not_write_anything_when_data_exceeds() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 100, 100);
    let (recording, _) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 16), 20_000);
    let secret_image = out_dir.path().join("secret.png");

    let result = hide::prepare()
        .with_image(&carrier)
        .with_audio(&recording)
        .with_output(&secret_image)
        .execute();

    match result {
        Err(ConcealError::CapacityOverflow { unit_index, .. }) => assert_eq!(unit_index, 30_000),
        other => panic!("unexpected result {other:?}"),
    }
    assert!(!secret_image.exists(), "no image should have been written");
}

#[test]
fn should_not_write_anything_when_cancelled() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 100, 100);
    let (recording, _) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 16), 5_000);
    let secret_image = out_dir.path().join("secret.png");
    let cancel = CancellationToken::new();
    let cancel_on_first = cancel.clone();

    let outcome = hide::prepare()
        .with_image(&carrier)
        .with_audio(&recording)
        .with_output(&secret_image)
        .with_options(EmbedOptions {
            progress_interval: 30,
        })
        .with_cancellation(cancel)
        .on_progress(move |_| cancel_on_first.cancel())
        .execute()
        .expect("Cancellation is not an error");

    assert_eq!(outcome, EmbedOutcome::Cancelled);
    assert!(!secret_image.exists(), "no image should have been written");
}

#[test]
fn should_refuse_lossy_targets_before_embedding() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 100, 100);
    let (recording, _) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 16), 5_000);
    let secret_image = out_dir.path().join("out.jpg");
    let reported_done = Arc::new(AtomicBool::new(false));
    let done_flag = reported_done.clone();

    let result = hide::prepare()
        .with_image(&carrier)
        .with_audio(&recording)
        .with_output(&secret_image)
        .on_progress(move |p| {
            if p.done {
                done_flag.store(true, Ordering::SeqCst);
            }
        })
        .execute();

    assert!(matches!(result, Err(ConcealError::UnsupportedMedia)));
    assert!(
        !reported_done.load(Ordering::SeqCst),
        "no done record for a target that cannot be written"
    );
    assert!(!secret_image.exists(), "no image should have been written");
}

#[test]
fn should_unveil_the_raw_payload() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 50, 50);
    let (recording, wave) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 8), 256);
    let secret_image = out_dir.path().join("secret.png");
    let raw_file = out_dir.path().join("payload.bin");

    hide::prepare()
        .with_image(&carrier)
        .with_audio(&recording)
        .with_output(&secret_image)
        .execute()
        .unwrap();
    let written = unveil_raw::prepare()
        .with_secret_image(&secret_image)
        .with_output_file(&raw_file)
        .execute()
        .unwrap();

    assert_eq!(written, 256);
    assert_eq!(fs::read(&raw_file).unwrap(), quantize_waveform(&wave).unwrap());
}

#[test]
fn should_inspect_capacity_and_embedded_audio() {
    let out_dir = TempDir::new().unwrap();
    let carrier = write_carrier(out_dir.path(), 100, 100);
    let (small, _) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 16), 5_000);
    let (big, _) = write_recording(out_dir.path(), AudioFormat::new(8000, 1, 16), 20_000);

    let plain = inspect::inspect(&carrier, Some(&small)).unwrap();
    assert_eq!((plain.width, plain.height), (100, 100));
    assert_eq!(plain.available_units, 30_000);
    assert_eq!(plain.max_payload_bytes, 11_236);
    assert!(plain.audio.unwrap().fits());

    let too_big = inspect::inspect(&carrier, Some(&big)).unwrap();
    let audio = too_big.audio.unwrap();
    assert!(!audio.fits());
    assert_eq!(audio.overflow.unwrap().unit_index, 30_000);

    let secret_image = out_dir.path().join("secret.png");
    hide::prepare()
        .with_image(&carrier)
        .with_audio(&small)
        .with_output(&secret_image)
        .execute()
        .unwrap();
    let embedded = inspect::inspect(&secret_image, None).unwrap().embedded;
    assert_eq!(embedded.map(|h| h.payload_len), Some(5_000));
}

#[test]
fn should_refuse_missing_inputs() {
    assert!(matches!(
        hide::prepare().with_audio("a.wav").with_output("o.png").execute(),
        Err(ConcealError::CarrierNotSet)
    ));
    assert!(matches!(
        hide::prepare().with_image("i.png").with_output("o.png").execute(),
        Err(ConcealError::MissingAudio)
    ));
    assert!(matches!(
        unveil::prepare().with_secret_image("i.png").execute(),
        Err(ConcealError::TargetNotSet)
    ));
}
