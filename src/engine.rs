use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

use crate::classifier::{classify, ScanResult};
use crate::error::ScanError;
use crate::rule::ScanRule;
use crate::source;
use crate::store::ScanStatistics;

/// Progress of one scan. `percent` is in `[0, 100]` and 0 when the
/// directory is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub percent: f64,
}

impl Progress {
    pub fn new(processed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        Self {
            processed,
            total,
            percent,
        }
    }
}

/// Non-fatal per-file failure. The file is skipped; the scan continues.
#[derive(Debug, Clone)]
pub struct FileNotice {
    pub file_name: String,
    pub message: String,
}

/// Cooperative cancellation flag, checked between files. Partial results
/// accumulated before the request are kept.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Optional observer callbacks invoked from the scanning context.
#[derive(Clone, Default)]
pub struct ScanHooks {
    pub progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
    pub notice: Option<Arc<dyn Fn(&FileNotice) + Send + Sync>>,
}

impl ScanHooks {
    fn report_progress(&self, progress: Progress) {
        if let Some(cb) = &self.progress {
            cb(progress);
        }
    }

    fn report_notice(&self, notice: &FileNotice) {
        if let Some(cb) = &self.notice {
            cb(notice);
        }
    }
}

/// Terminal state of a scan, for both normal completion and cancellation.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub results: Vec<ScanResult>,
    pub stats: ScanStatistics,
    pub notices: Vec<FileNotice>,
    pub cancelled: bool,
}

/// Scan every file directly under `dir`, strictly sequentially in
/// enumeration order. Emits one progress event per file (plus a single
/// final event for an empty directory) and checks `cancel` between files.
pub fn scan_directory(
    dir: &Path,
    rule: &ScanRule,
    hooks: &ScanHooks,
    cancel: &CancelToken,
) -> Result<ScanOutcome, ScanError> {
    let files = source::list_files(dir)?;
    let total = files.len();

    let mut results = Vec::new();
    let mut notices = Vec::new();
    let mut processed = 0;
    let mut cancelled = false;

    for path in &files {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        match source::read_record(path) {
            Ok(record) => {
                if let Some(result) = classify(rule, &record) {
                    results.push(result);
                }
            }
            Err(e) => {
                let notice = FileNotice {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string()),
                    message: e.to_string(),
                };
                hooks.report_notice(&notice);
                notices.push(notice);
            }
        }

        processed += 1;
        hooks.report_progress(Progress::new(processed, total));
    }

    if total == 0 {
        hooks.report_progress(Progress::new(0, 0));
    }

    let stats = ScanStatistics::from_results(&results);
    Ok(ScanOutcome {
        results,
        stats,
        notices,
        cancelled,
    })
}

/// Events delivered to the caller's context by a background scan, in order.
pub enum ScanMessage {
    Progress(Progress),
    Notice(FileNotice),
    Complete(ScanOutcome),
    Failed(ScanError),
}

/// Handle to a scan running on its own worker thread.
pub struct ScanHandle {
    pub receiver: Receiver<ScanMessage>,
    cancel: CancelToken,
}

impl ScanHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

/// Run the scan on a worker thread so an interactive front end stays
/// responsive. A fatal error arrives as one `Failed` message before any
/// progress; otherwise the stream is progress/notice events followed by a
/// single `Complete`.
pub fn spawn_scan(dir: PathBuf, rule: ScanRule) -> ScanHandle {
    let (tx, rx) = channel();
    let cancel = CancelToken::new();

    let progress_tx = tx.clone();
    let notice_tx = tx.clone();
    let hooks = ScanHooks {
        progress: Some(Arc::new(move |progress| {
            let _ = progress_tx.send(ScanMessage::Progress(progress));
        })),
        notice: Some(Arc::new(move |notice: &FileNotice| {
            let _ = notice_tx.send(ScanMessage::Notice(notice.clone()));
        })),
    };

    let worker_cancel = cancel.clone();
    thread::spawn(move || {
        let message = match scan_directory(&dir, &rule, &hooks, &worker_cancel) {
            Ok(outcome) => ScanMessage::Complete(outcome),
            Err(e) => ScanMessage::Failed(e),
        };
        let _ = tx.send(message);
    });

    ScanHandle {
        receiver: rx,
        cancel,
    }
}
