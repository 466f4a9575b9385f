//! One conversion session: a pipeline plus its optional file watcher

use std::path::Path;

use super::convert::{ConversionPipeline, ConversionReport, Phase};
use super::converter::DocumentConverter;
use super::error::ConversionError;
use super::flags::Flags;
use super::watch::FileWatchController;

/// What happened on one watch-triggered reconversion
pub enum WatchEvent {
    Reconverted(ConversionReport),
    Failed(ConversionError),
}

/// Owns the pipeline and the watcher for a single input file
pub struct Session<C> {
    pipeline: ConversionPipeline<C>,
    watcher: FileWatchController,
}

impl<C: DocumentConverter> Session<C> {
    pub fn new(pipeline: ConversionPipeline<C>) -> Self {
        Self::with_watcher(pipeline, FileWatchController::default())
    }

    pub fn with_watcher(pipeline: ConversionPipeline<C>, watcher: FileWatchController) -> Self {
        Self { pipeline, watcher }
    }

    pub fn watcher(&self) -> &FileWatchController {
        &self.watcher
    }

    /// Convert once, then install the watcher when `watch` is requested.
    ///
    /// A watcher that fails to install is reported in `warnings`; the written
    /// document stays valid.
    pub fn run(
        &mut self,
        input: &Path,
        flags: &Flags,
        on_status: &mut dyn FnMut(Phase),
    ) -> Result<ConversionReport, ConversionError> {
        let mut report = self.pipeline.convert(input, flags, on_status)?;

        if flags.watch() {
            match self.watcher.start_watching(input) {
                Ok(_) => on_status(Phase::Watching),
                Err(e) => report.warnings.push(e),
            }
        }

        Ok(report)
    }

    /// Block, reconverting `input` after each debounced change.
    ///
    /// Reconversions never repeat the `open` action. Failures are passed to
    /// `on_event` and the loop keeps watching.
    pub fn watch<F>(&mut self, input: &Path, flags: &Flags, mut on_event: F)
    where
        F: FnMut(WatchEvent),
    {
        let rerun_flags = Flags {
            open: None,
            ..flags.clone()
        };

        let Session { pipeline, watcher } = self;
        watcher.run(|| {
            let event = match pipeline.convert(input, &rerun_flags, &mut |_| {}) {
                Ok(report) => WatchEvent::Reconverted(report),
                Err(e) => WatchEvent::Failed(e),
            };
            on_event(event);
        });
    }

    pub fn stop(&mut self) {
        self.watcher.stop();
    }
}

