//! The embedding engine: header and payload written across the pixels of an image,
//! with progress records and cooperative cancellation.
//!
//! ## Example of usage
//! ```rust
//! use conceal_core::embed::{CancellationToken, Embedder, EmbedOutcome};
//! use conceal_core::media::{AudioFormat, Waveform};
//! use image::RgbImage;
//!
//! let image = RgbImage::from_pixel(64, 64, image::Rgb([120, 80, 200]));
//! let wave = Waveform::new(AudioFormat::new(8000, 1, 16), vec![0, 1000, -1000, 32767])
//!     .expect("Cannot create waveform");
//!
//! let mut output = None;
//! let outcome = Embedder::default()
//!     .run(&image, &wave, &CancellationToken::new(), |p| {
//!         if p.done {
//!             output = p.data;
//!         }
//!     })
//!     .expect("Cannot embed audio");
//!
//! assert_eq!(outcome, EmbedOutcome::Completed);
//! assert_eq!(output.expect("no image").dimensions(), (64, 64));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use image::RgbImage;
use log::{debug, info, warn};

use crate::codec::bit_packer::{self, BitGroups};
use crate::codec::capacity::ensure_capacity;
use crate::codec::header::{write_header, Header, HEADER_UNITS};
use crate::codec::quantizer::quantize_waveform;
use crate::error::ConcealError;
use crate::media::{PixelSequence, Waveform};
use crate::result::Result;

/// how many records may queue up before a spawned embedding waits for its consumer
const PROGRESS_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// Number of payload units (3 bit channel slots) written between two progress records.
    ///
    /// Cancellation is checked at the same points, so this also bounds how much work
    /// happens after a cancel request.
    pub progress_interval: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            progress_interval: 3 * 1024,
        }
    }
}

impl EmbedOptions {
    pub fn get_progress_interval(&self) -> usize {
        self.progress_interval.max(1)
    }
}

/// One progress record, the last one of a completed embedding has `done` set and carries the image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConcealPercentage {
    pub percent: f32,
    pub done: bool,
    pub data: Option<RgbImage>,
}

impl ConcealPercentage {
    pub fn empty() -> Self {
        Self::default()
    }

    fn running(units_written: usize, total_units: usize) -> Self {
        Self {
            percent: units_written as f32 * 100.0 / total_units as f32,
            done: false,
            data: None,
        }
    }

    fn completed(image: RgbImage) -> Self {
        Self {
            percent: 100.0,
            done: true,
            data: Some(image),
        }
    }
}

/// Cloneable flag to ask a running embedding to stop at its next progress point
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EmbedState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Terminal state of an embedding that did not fail
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EmbedOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone)]
struct SharedState(Arc<Mutex<EmbedState>>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(EmbedState::Idle)))
    }

    fn set(&self, state: EmbedState) {
        if let Ok(mut s) = self.0.lock() {
            *s = state;
        }
    }

    fn get(&self) -> EmbedState {
        self.0.lock().map(|s| *s).unwrap_or(EmbedState::Failed)
    }
}

#[derive(Debug, Default)]
pub struct Embedder {
    options: EmbedOptions,
}

impl Embedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EmbedOptions) -> Self {
        Self { options }
    }

    /// Embeds the waveform into a copy of `image` on the current thread.
    ///
    /// Every record goes to `on_progress`, the output image arrives with the final `done`
    /// record. A payload that does not fit fails with [`ConcealError::CapacityOverflow`]
    /// before any pixel is touched and without any record.
    pub fn run<F>(
        &self,
        image: &RgbImage,
        waveform: &Waveform,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<EmbedOutcome>
    where
        F: FnMut(ConcealPercentage),
    {
        self.run_tracked(image, waveform, cancel, &SharedState::new(), on_progress)
    }

    /// Embeds without progress or cancellation and hands back the output image
    pub fn embed(&self, image: &RgbImage, waveform: &Waveform) -> Result<RgbImage> {
        let mut output = None;
        self.run(image, waveform, &CancellationToken::new(), |p| {
            if p.done {
                output = p.data;
            }
        })?;

        output.ok_or(ConcealError::ImageEncodingError)
    }

    /// Runs the embedding on a background thread, records arrive through the returned job.
    pub fn spawn(&self, image: RgbImage, waveform: Waveform) -> Result<EmbedJob> {
        let (sender, receiver) = mpsc::sync_channel(PROGRESS_BUFFER);
        let cancel = CancellationToken::new();
        let state = SharedState::new();
        let embedder = Self::with_options(self.options.clone());

        let handle = {
            let cancel = cancel.clone();
            let state = state.clone();
            thread::Builder::new()
                .name("conceal-embed".to_string())
                .spawn(move || {
                    let sink = progress_sender(sender, cancel.clone());
                    embedder.run_tracked(&image, &waveform, &cancel, &state, sink)
                })?
        };

        Ok(EmbedJob {
            progress: receiver,
            cancel,
            state,
            handle,
        })
    }

    fn run_tracked<F>(
        &self,
        image: &RgbImage,
        waveform: &Waveform,
        cancel: &CancellationToken,
        state: &SharedState,
        mut on_progress: F,
    ) -> Result<EmbedOutcome>
    where
        F: FnMut(ConcealPercentage),
    {
        state.set(EmbedState::Running);
        let prepared = PixelSequence::from_image(image).and_then(|pixels| {
            let shadow = quantize_waveform(waveform)?;
            ensure_capacity(pixels.len(), shadow.len())?;
            Ok((pixels, shadow))
        });
        let (mut pixels, shadow) = match prepared {
            Ok(p) => p,
            Err(e) => {
                debug!("embedding failed before writing: {e}");
                state.set(EmbedState::Failed);
                return Err(e);
            }
        };

        let interval = self.options.get_progress_interval();
        let total_units = HEADER_UNITS + bit_packer::units_for(shadow.len());
        debug!(
            "embedding {} bytes into {} pixels, {total_units} units in total",
            shadow.len(),
            pixels.len()
        );

        if cancel.is_cancelled() {
            return cancelled(state);
        }
        let header = Header::new(shadow.len(), waveform.format());
        if let Err(e) = write_header(pixels.pixels_mut(), &header) {
            state.set(EmbedState::Failed);
            return Err(e);
        }
        let mut units_written = HEADER_UNITS;
        on_progress(ConcealPercentage::running(units_written, total_units));

        for (unit, group) in (HEADER_UNITS..).zip(BitGroups::new(&shadow)) {
            bit_packer::write_unit(pixels.pixels_mut(), unit, group);
            units_written += 1;

            if (units_written - HEADER_UNITS) % interval == 0 && units_written < total_units {
                if cancel.is_cancelled() {
                    return cancelled(state);
                }
                on_progress(ConcealPercentage::running(units_written, total_units));
            }
        }

        if cancel.is_cancelled() {
            return cancelled(state);
        }
        let output = match pixels.into_image() {
            Ok(o) => o,
            Err(e) => {
                state.set(EmbedState::Failed);
                return Err(e);
            }
        };
        info!("embedded {} audio samples", shadow.len());
        state.set(EmbedState::Completed);
        on_progress(ConcealPercentage::completed(output));

        Ok(EmbedOutcome::Completed)
    }
}

fn cancelled(state: &SharedState) -> Result<EmbedOutcome> {
    warn!("embedding cancelled");
    state.set(EmbedState::Cancelled);
    Ok(EmbedOutcome::Cancelled)
}

/// a consumer that hung up counts as a cancel request
fn progress_sender(
    sender: SyncSender<ConcealPercentage>,
    cancel: CancellationToken,
) -> impl FnMut(ConcealPercentage) {
    move |record| {
        if sender.send(record).is_err() {
            cancel.cancel();
        }
    }
}

/// Handle to an embedding running on a background thread
pub struct EmbedJob {
    progress: Receiver<ConcealPercentage>,
    cancel: CancellationToken,
    state: SharedState,
    handle: JoinHandle<Result<EmbedOutcome>>,
}

impl EmbedJob {
    /// Blocks for the next progress record, `None` once the embedding has ended
    pub fn next_progress(&self) -> Option<ConcealPercentage> {
        self.progress.recv().ok()
    }

    pub fn progress(&self) -> mpsc::Iter<'_, ConcealPercentage> {
        self.progress.iter()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self) -> EmbedState {
        self.state.get()
    }

    /// Drains outstanding records and waits for the terminal state
    pub fn wait(self) -> Result<EmbedOutcome> {
        self.finish().map(|(outcome, _)| outcome)
    }

    /// Like [`EmbedJob::wait`], but keeps the image of the final record
    pub fn finish(self) -> Result<(EmbedOutcome, Option<RgbImage>)> {
        let mut output = None;
        for record in self.progress.iter() {
            if record.done {
                output = record.data;
            }
        }
        let outcome = self
            .handle
            .join()
            .map_err(|_| ConcealError::EmbedWorkerPanicked)??;

        Ok((outcome, output))
    }
}
