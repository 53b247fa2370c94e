use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use meme_studio_domain::{select_display_image, DisplaySelection};

use crate::{ApplicationError, DecodedImage, ImageDecoder, StyleContext};

/// Drawable RGBA8 surface. Resizing clears it, like a canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
    }

    /// Copies `image` with its top-left corner at (`x`, `y`), clipped to the surface.
    pub fn draw_image(&mut self, image: &DecodedImage, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let visible_width = image.width.min(self.width - x) as usize;
        let visible_height = image.height.min(self.height - y) as usize;
        let source_stride = image.width as usize * 4;
        let target_stride = self.width as usize * 4;

        for row in 0..visible_height {
            let source_start = row * source_stride;
            let target_start = (y as usize + row) * target_stride + x as usize * 4;
            let len = visible_width * 4;
            let Some(source) = image.pixels.get(source_start..source_start + len) else {
                break;
            };
            self.pixels[target_start..target_start + len].copy_from_slice(source);
        }
    }
}

struct DecodeJob {
    generation: u64,
    source: String,
}

struct DecodeOutcome {
    generation: u64,
    source: String,
    result: Result<DecodedImage, ApplicationError>,
}

/// Background decoder where the most recent job wins. Bumping `latest`
/// invalidates every job and result carrying an older generation.
struct DecodeWorker {
    jobs: Sender<DecodeJob>,
    results: Receiver<DecodeOutcome>,
    latest: Arc<AtomicU64>,
}

impl DecodeWorker {
    fn spawn(decoder: Arc<dyn ImageDecoder>) -> Self {
        let (jobs, job_rx) = mpsc::channel::<DecodeJob>();
        let (result_tx, results) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(0));
        let worker_latest = Arc::clone(&latest);

        thread::spawn(move || {
            while let Ok(mut job) = job_rx.recv() {
                while let Ok(newer) = job_rx.try_recv() {
                    job = newer;
                }
                if job.generation != worker_latest.load(Ordering::SeqCst) {
                    continue;
                }

                let result = decoder.decode(&job.source);
                if job.generation != worker_latest.load(Ordering::SeqCst) {
                    debug!("discarding decode for superseded generation {}", job.generation);
                    continue;
                }
                let outcome = DecodeOutcome {
                    generation: job.generation,
                    source: job.source,
                    result,
                };
                if result_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self {
            jobs,
            results,
            latest,
        }
    }

    fn submit(&self, source: &str) -> Option<u64> {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let job = DecodeJob {
            generation,
            source: source.to_string(),
        };
        match self.jobs.send(job) {
            Ok(()) => Some(generation),
            Err(_) => {
                error!("image decode worker is gone, dropping decode request");
                None
            }
        }
    }

    fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub type ReadyCallback = Box<dyn FnMut(&Surface)>;

/// Shows the context image, or the first local candidate when the context has
/// none, and fires the ready callback once per successful draw.
pub struct ImageDisplay {
    candidates: Vec<String>,
    candidates_dirty: bool,
    observed_revision: Option<u64>,
    selection: DisplaySelection,
    caption: Option<String>,
    surface: Surface,
    drawn_source: Option<String>,
    pending: Option<u64>,
    on_ready: Option<ReadyCallback>,
    torn_down: bool,
    worker: DecodeWorker,
}

impl ImageDisplay {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            candidates: Vec::new(),
            candidates_dirty: true,
            observed_revision: None,
            selection: DisplaySelection::Empty,
            caption: None,
            surface: Surface::default(),
            drawn_source: None,
            pending: None,
            on_ready: None,
            torn_down: false,
            worker: DecodeWorker::spawn(decoder),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.set_candidates(candidates);
        self
    }

    pub fn on_image_ready(mut self, callback: impl FnMut(&Surface) + 'static) -> Self {
        self.on_ready = Some(Box::new(callback));
        self
    }

    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        if self.candidates != candidates {
            self.candidates = candidates;
            self.candidates_dirty = true;
        }
    }

    pub fn selection(&self) -> &DisplaySelection {
        &self.selection
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn drawn_source(&self) -> Option<&str> {
        self.drawn_source.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Recomputes selection and caption after the context or the candidate
    /// list changed. Returns true when a new decode was scheduled.
    pub fn refresh(&mut self, context: &StyleContext) -> bool {
        if self.torn_down {
            return false;
        }
        if !self.candidates_dirty && self.observed_revision == Some(context.revision()) {
            return false;
        }
        self.candidates_dirty = false;
        self.observed_revision = Some(context.revision());
        self.caption = context.state().caption();

        let next = select_display_image(context.current_image(), &self.candidates);
        if next.image() == self.selection.image() {
            self.selection = next;
            return false;
        }

        self.selection = next;
        match self.selection.image() {
            Some(source) => {
                debug!("scheduling decode for new display selection");
                self.pending = self.worker.submit(source);
                self.pending.is_some()
            }
            None => {
                info!("nothing to display");
                self.worker.cancel();
                self.pending = None;
                false
            }
        }
    }

    /// Applies finished decodes without blocking. Returns how many draws happened.
    pub fn poll(&mut self) -> usize {
        let mut drawn = 0;
        loop {
            match self.worker.results.try_recv() {
                Ok(outcome) => {
                    if self.complete(outcome) {
                        drawn += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drawn
    }

    /// Blocks until the pending decode finishes or `timeout` elapses.
    /// Returns true when it produced a draw.
    pub fn wait_ready(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.worker.results.recv_timeout(remaining) {
                Ok(outcome) => {
                    let was_current = Some(outcome.generation) == self.pending;
                    let drew = self.complete(outcome);
                    if was_current {
                        return drew;
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false
                }
            }
        }
        false
    }

    /// Invalidates pending decodes; later results never reach the callback.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.pending = None;
        self.worker.cancel();
    }

    fn complete(&mut self, outcome: DecodeOutcome) -> bool {
        if self.torn_down || Some(outcome.generation) != self.pending {
            debug!("dropping stale decode result (generation {})", outcome.generation);
            return false;
        }
        self.pending = None;

        match outcome.result {
            Ok(image) => {
                self.surface.resize(image.width, image.height);
                self.surface.draw_image(&image, 0, 0);
                self.drawn_source = Some(outcome.source);
                if let Some(callback) = self.on_ready.as_mut() {
                    callback(&self.surface);
                }
                info!("image drawn ({}x{})", image.width, image.height);
                true
            }
            Err(error) => {
                error!("failed to decode display image: {error}");
                false
            }
        }
    }
}

impl Drop for ImageDisplay {
    fn drop(&mut self) {
        self.teardown();
    }
}
