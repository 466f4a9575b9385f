//! File watching with debounced reconversion
//!
//! Editors tend to emit several file system events per save. Raw events from
//! `notify` are funnelled through a channel and coalesced by a `Debouncer`:
//! each event pushes the deadline back, and the change callback only fires
//! once the deadline passes without another event.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use super::error::PostActionError;

/// Quiet period before a burst of events triggers a reconversion
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// How often an idle loop wakes up to check for `stop()`
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Single resettable deadline
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an event at `now`, replacing any pending deadline
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true exactly once when the pending deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending deadline, if any
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Consume raw change signals from `rx` and call `on_change` once per quiet burst.
///
/// Returns when `stop` is set or every sender is gone. A deadline still
/// pending at that point is dropped, not fired.
pub fn run_debounced<F>(rx: &Receiver<()>, delay: Duration, stop: &AtomicBool, mut on_change: F)
where
    F: FnMut(),
{
    let mut debouncer = Debouncer::new(delay);

    while !stop.load(Ordering::SeqCst) {
        let timeout = debouncer
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL);

        match rx.recv_timeout(timeout) {
            Ok(()) => debouncer.notify(Instant::now()),
            Err(RecvTimeoutError::Timeout) => {
                if debouncer.poll(Instant::now()) {
                    on_change();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debouncer.cancel();
}

struct ActiveWatch {
    path: PathBuf,
    watcher: RecommendedWatcher,
    rx: Receiver<()>,
}

/// Owns at most one watcher for one input file.
pub struct FileWatchController {
    delay: Duration,
    active: Option<ActiveWatch>,
    stop: Arc<AtomicBool>,
}

impl Default for FileWatchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl FileWatchController {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// Shared flag that makes a running `run` loop return
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Start watching `path`. Returns `Ok(false)` when a watch is already active.
    ///
    /// The parent directory is watched so that editors which save by writing
    /// a new file and renaming it over the old one are still seen.
    pub fn start_watching(&mut self, path: &Path) -> Result<bool, PostActionError> {
        if self.active.is_some() {
            return Ok(false);
        }

        let install_error = |message: String| PostActionError::WatchInstallFailed {
            path: path.to_path_buf(),
            message,
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| install_error("path has no file name".to_string()))?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let Ok(event) = res else { return };
                let relevant = matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) && event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if relevant {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )
        .map_err(|e| install_error(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| install_error(e.to_string()))?;
        debug!(path = %path.display(), "watch installed");

        self.stop.store(false, Ordering::SeqCst);
        self.active = Some(ActiveWatch {
            path: path.to_path_buf(),
            watcher,
            rx,
        });
        Ok(true)
    }

    /// Block, calling `on_change` after each debounced burst of changes.
    ///
    /// Returns immediately when nothing is being watched. Changes that arrive
    /// while `on_change` runs are queued and coalesced into one more call.
    pub fn run<F>(&mut self, on_change: F)
    where
        F: FnMut(),
    {
        if let Some(active) = &self.active {
            run_debounced(&active.rx, self.delay, &self.stop, on_change);
        }
    }

    /// Cancel any pending trigger and release the watcher. Safe to repeat.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(mut active) = self.active.take() {
            let dir = match active.path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let _ = active.watcher.unwatch(&dir);
            debug!(path = %active.path.display(), "watch released");
        }
    }
}

impl Drop for FileWatchController {
    fn drop(&mut self) {
        self.stop();
    }
}
