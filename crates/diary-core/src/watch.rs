//! The watch loop: top-level driver of the pipeline.
//!
//! One background task per session owns the history read offset and
//! the pending buffer. It wakes on file-change notifications (with a
//! poll fallback bounding staleness), re-resolves configuration and
//! diary location at the top of every drain, and routes segmented
//! entries to the pending buffer or the command interpreter.

use crate::classify::{Classification, classify};
use crate::command::parse_command;
use crate::commit::CommitEngine;
use crate::config::resolve_configuration;
use crate::history::HistorySource;
use crate::locate::{DIARY_ENV_VAR, find_diary};
use crate::segment::Segmenter;
use crate::Result;
use diary_types::{Configuration, DiaryCommand, DiaryTarget, DisabledReason, Entry};
use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, trace, warn};

/// Loop states, traced on transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Idle,
    Draining,
    Committing,
    Stopped,
}

/// Options for a [`DiaryWatcher`].
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// History file to observe.
    pub history_path: PathBuf,
    /// Optional verbatim mirror of every raw history byte, written
    /// pre-classification with no buffering and no header.
    pub mirror_path: Option<PathBuf>,
    /// Working directory for project resolution. `None` reads the
    /// process working directory every cycle.
    pub working_dir: Option<PathBuf>,
    /// Poll fallback interval, bounding staleness when no change
    /// notification arrives.
    pub poll_interval: Duration,
}

impl WatchOptions {
    pub fn new(history_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            mirror_path: None,
            working_dir: None,
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Drives the watch-parse-commit pipeline for one session.
pub struct DiaryWatcher {
    options: WatchOptions,
    source: HistorySource,
    segmenter: Segmenter,
    engine: CommitEngine,
    pending: Vec<Entry>,
    state: WatchState,
    /// Deduplicates the disabled-target notice so a blacklisted
    /// project does not spam the log every cycle.
    last_disabled: Option<DisabledReason>,
}

impl DiaryWatcher {
    fn new(options: WatchOptions) -> Result<Self> {
        let mut source = HistorySource::new(options.history_path.clone());
        source.skip_existing()?;
        Ok(Self {
            options,
            source,
            segmenter: Segmenter::new(),
            engine: CommitEngine::new(),
            pending: Vec::new(),
            state: WatchState::Idle,
            last_disabled: None,
        })
    }

    /// Start watching. Returns a handle used to stop the task.
    pub fn start(options: WatchOptions) -> Result<WatchHandle> {
        let history_path = options.history_path.clone();
        let poll_interval = options.poll_interval;
        let mut watcher = Self::new(options)?;

        let (stop_tx, mut stop_rx) = mpsc::unbounded_channel::<()>();
        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Event>();

        let mut file_watcher =
            notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            })?;
        // Watch the containing directory: the history file may not
        // exist yet when the session starts.
        let watch_root = history_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        file_watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        let task = tokio::spawn(async move {
            let mut poll = tokio::time::interval(poll_interval);
            poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                let triggered = tokio::select! {
                    // Channel closure means the handle was dropped;
                    // stop then as well.
                    _ = stop_rx.recv() => {
                        watcher.set_state(WatchState::Stopped);
                        debug!(target: "diary::watch", "Stop requested");
                        break;
                    }
                    Some(event) = notify_rx.recv() => {
                        is_relevant(&event, &history_path)
                    }
                    _ = poll.tick() => true,
                    else => break,
                };

                if !triggered {
                    continue;
                }
                if let Err(err) = watcher.cycle() {
                    if err.is_fatal() {
                        error!(target: "diary::watch", "Stopping: {}", err);
                        watcher.set_state(WatchState::Stopped);
                        break;
                    }
                    warn!(target: "diary::watch", "Cycle failed, will retry: {}", err);
                }
            }
        });

        Ok(WatchHandle {
            stop_tx,
            task,
            _file_watcher: file_watcher,
        })
    }

    /// One drain cycle: read new bytes, mirror them, segment and
    /// classify, then autocommit if configured.
    fn cycle(&mut self) -> Result<()> {
        let chunk = match self.source.read_new()? {
            Some(chunk) => chunk,
            None => return Ok(()),
        };
        self.set_state(WatchState::Draining);

        // Re-resolved every cycle so mid-session project, config, and
        // override changes take effect immediately.
        let cwd = self.working_dir()?;
        let config = resolve_configuration(&cwd);
        let override_path = std::env::var_os(DIARY_ENV_VAR).map(PathBuf::from);
        let target = find_diary(&config, &cwd, override_path.as_deref());
        self.note_target(&target);

        self.mirror(&chunk);

        for entry in self.segmenter.feed(&chunk) {
            match classify(entry) {
                Classification::Accepted(entry) => match &target {
                    DiaryTarget::Active(_) => self.pending.push(entry),
                    DiaryTarget::Disabled(_) => {
                        // No valid target, so nothing to buffer for.
                        trace!(target: "diary::watch", "Discarding entry while disabled");
                    }
                },
                Classification::Ignored => {}
                Classification::Command(text) => self.run_command(&text, &target, &config),
            }
        }

        if config.autocommit && !self.pending.is_empty() {
            if let DiaryTarget::Active(path) = &target {
                let count = self.pending.len();
                self.commit_pending(count, path, &config);
            }
        }

        self.set_state(WatchState::Idle);
        Ok(())
    }

    fn run_command(&mut self, text: &str, target: &DiaryTarget, config: &Configuration) {
        match parse_command(text) {
            Ok(DiaryCommand::Commit { count }) => {
                let n = count.map_or(self.pending.len(), |n| n.min(self.pending.len()));
                match target {
                    DiaryTarget::Active(path) => self.commit_pending(n, path, config),
                    DiaryTarget::Disabled(reason) => debug!(
                        target: "diary::watch",
                        "Commit command with writes disabled ({:?})",
                        reason
                    ),
                }
            }
            Err(err) => warn!(target: "diary::watch", "{}", err),
        }
    }

    /// Commit the last `n` pending entries in original order. The
    /// buffer is only shortened after a successful write.
    fn commit_pending(&mut self, n: usize, path: &Path, config: &Configuration) {
        self.set_state(WatchState::Committing);
        let split = self.pending.len() - n;
        match self.engine.commit(&self.pending[split..], path, config, true) {
            Ok(()) => {
                self.pending.truncate(split);
            }
            Err(err) => warn!(
                target: "diary::commit",
                "Commit to {} failed, entries retained for retry: {}",
                path.display(),
                err
            ),
        }
    }

    /// Append the raw chunk to the mirror target, if configured.
    /// Best-effort and independent of diary commit outcome.
    fn mirror(&self, chunk: &str) {
        let Some(path) = &self.options.mirror_path else {
            return;
        };
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(chunk.as_bytes()));
        if let Err(err) = result {
            warn!(
                target: "diary::watch",
                "Mirror write to {} failed: {}",
                path.display(),
                err
            );
        }
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.options.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    fn note_target(&mut self, target: &DiaryTarget) {
        match target {
            DiaryTarget::Active(_) => self.last_disabled = None,
            DiaryTarget::Disabled(reason) => {
                if self.last_disabled != Some(*reason) {
                    info!(
                        target: "diary::watch",
                        "Diary writes disabled: {:?}",
                        reason
                    );
                    self.last_disabled = Some(*reason);
                }
            }
        }
    }

    fn set_state(&mut self, next: WatchState) {
        if self.state != next {
            trace!(target: "diary::watch", "{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

fn is_relevant(event: &Event, history_path: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    );
    kind_matches && event.paths.iter().any(|p| p == history_path)
}

/// Handle to a running watch task.
pub struct WatchHandle {
    stop_tx: mpsc::UnboundedSender<()>,
    task: tokio::task::JoinHandle<()>,
    _file_watcher: RecommendedWatcher,
}

impl WatchHandle {
    /// Signal the loop to stop and wait for it to finish. Any
    /// in-flight commit completes before the task exits; no new
    /// writes are attempted afterwards.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.task.await;
    }
}
