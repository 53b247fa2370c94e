use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use log::{error, info, warn};

use crate::{StyleTransferModel, StylizeCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylizeReport {
    Completed,
    Failed,
    MissingInput(PathBuf),
    TimedOut { fallback_copied: bool },
}

impl StylizeReport {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Failed | Self::MissingInput(_) => 1,
            Self::TimedOut {
                fallback_copied: true,
            } => 1,
            Self::TimedOut {
                fallback_copied: false,
            } => 2,
        }
    }
}

struct ModelSlot {
    model: Box<dyn StyleTransferModel>,
    initialized: bool,
}

/// Runs the external style-transfer model. The model is initialized lazily on
/// first use; any model failure is reported as `false`, never propagated.
#[derive(Clone)]
pub struct StylizeService {
    slot: Arc<Mutex<ModelSlot>>,
}

impl StylizeService {
    pub fn new(model: Box<dyn StyleTransferModel>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(ModelSlot {
                model,
                initialized: false,
            })),
        }
    }

    pub fn stylize(&self, command: &StylizeCommand) -> bool {
        let mut slot = self.lock_slot();
        if !slot.initialized {
            info!("initializing style transfer model");
            if let Err(error) = slot.model.initialize() {
                error!("style transfer model failed to initialize: {error}");
                return false;
            }
            slot.initialized = true;
        }

        info!(
            "stylizing {} with {} (strength {})",
            command.content_path.display(),
            command.style_path.display(),
            command.strength.get()
        );
        match slot.model.stylize(
            &command.content_path,
            &command.style_path,
            command.strength,
            &command.output_path,
        ) {
            Ok(()) => {
                info!("stylized image written to {}", command.output_path.display());
                true
            }
            Err(error) => {
                error!("style transfer failed: {error}");
                false
            }
        }
    }

    /// Runs `stylize` on a worker thread. When `timeout` elapses first the
    /// content image is copied to the output path as a fallback.
    ///
    /// The worker renders into a staging file beside the output and only
    /// moves it into place while the run has not been abandoned, so a late
    /// result never replaces the fallback copy.
    pub fn stylize_with_timeout(&self, command: StylizeCommand, timeout: Duration) -> StylizeReport {
        for input in [&command.content_path, &command.style_path] {
            if !input.is_file() {
                error!("input image not found: {}", input.display());
                return StylizeReport::MissingInput(input.clone());
            }
        }

        let abandoned = Arc::new(Mutex::new(false));
        let (done_tx, done_rx) = mpsc::channel();
        let service = self.clone();
        let output_path = command.output_path.clone();
        let job = StylizeCommand {
            output_path: staging_path(&output_path),
            ..command.clone()
        };
        let worker_abandoned = Arc::clone(&abandoned);
        thread::spawn(move || {
            let succeeded = service.stylize(&job);
            let promoted =
                promote_staged(&job.output_path, &output_path, succeeded, &worker_abandoned);
            let _ = done_tx.send(promoted);
        });

        match done_rx.recv_timeout(timeout) {
            Ok(true) => StylizeReport::Completed,
            Ok(false) | Err(RecvTimeoutError::Disconnected) => StylizeReport::Failed,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "stylization did not finish within {}ms, copying source image",
                    timeout.as_millis()
                );
                let mut flag = lock_flag(&abandoned);
                *flag = true;
                match fs::copy(&command.content_path, &command.output_path) {
                    Ok(_) => StylizeReport::TimedOut {
                        fallback_copied: true,
                    },
                    Err(error) => {
                        error!("failed to copy source image after timeout: {error}");
                        StylizeReport::TimedOut {
                            fallback_copied: false,
                        }
                    }
                }
            }
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, ModelSlot> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// `.out.partial.png` for `out.png`; the extension is kept so encoders that
/// pick the format from it still work.
fn staging_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(extension) => format!(".{stem}.partial.{}", extension.to_string_lossy()),
        None => format!(".{stem}.partial"),
    };
    output.with_file_name(name)
}

/// Moves the staged result into place unless the run was abandoned. The
/// flag stays locked across the rename.
fn promote_staged(staged: &Path, output: &Path, succeeded: bool, abandoned: &Mutex<bool>) -> bool {
    let abandoned = lock_flag(abandoned);
    if !succeeded || *abandoned {
        if succeeded {
            info!("discarding stylized image that finished after the timeout");
        }
        let _ = fs::remove_file(staged);
        return false;
    }

    match fs::rename(staged, output) {
        Ok(()) => true,
        Err(error) => {
            error!("failed to move stylized image to {}: {error}", output.display());
            let _ = fs::remove_file(staged);
            false
        }
    }
}

fn lock_flag(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    match flag.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
