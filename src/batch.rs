use crate::codec::{ImageCodec, WebpCodec};
use crate::constants::{
    DEFAULT_QUALITY, DEFAULT_WORKERS, MAX_QUALITY, MIN_QUALITY, PROGRESS_BAR_TEMPLATE,
};
use crate::convert::{ConversionOutcome, Converter, SourceFile};
use crate::eligibility::{classify, target_path};
use crate::error::{ConvertError, Result};
use crate::logger::{BatchEvent, Logger, Reporter};
use crate::replace::replace_source;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub quality: u8,
    pub workers: usize,
    pub show_progress: bool,
}

impl BatchOptions {
    pub fn new(quality: Option<u8>, workers: Option<usize>) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(ConvertError::InvalidQuality(quality));
        }

        let workers = workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(ConvertError::InvalidWorkerCount(workers));
        }

        Ok(Self {
            quality,
            workers,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            workers: DEFAULT_WORKERS,
            show_progress: false,
        }
    }
}

/// Counters for one run. Only the collecting thread mutates it.
///
/// `skipped` covers every discovered regular file that was not converted,
/// `failed` is the part of it that failed during conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub replace_failures: usize,
    pub discovered: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.converted + self.skipped
    }
}

/// Result of one work item, sent from a worker to the collector.
#[derive(Debug)]
pub struct FileReport {
    pub source: SourceFile,
    pub target: PathBuf,
    pub outcome: ConversionOutcome,
    pub replace_error: Option<ConvertError>,
}

#[derive(Debug)]
struct WorkItem {
    source: SourceFile,
    target: PathBuf,
}

/// Walks a directory, converts every eligible image on a fixed pool of
/// workers, and replaces the originals.
pub struct BatchConverter {
    options: BatchOptions,
    converter: Converter,
    reporter: Arc<dyn Reporter>,
}

impl BatchConverter {
    pub fn new(options: BatchOptions, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            options,
            converter: Converter::new(Arc::new(WebpCodec)),
            reporter,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.converter = Converter::new(codec);
        self
    }

    /// Runs the whole batch and returns once every work item has reported.
    ///
    /// Only a missing root, a root that is not a directory, or a failure to
    /// build the pool abort the run; per-file errors land in the summary.
    pub fn run(&self, root: &Path) -> Result<BatchSummary> {
        validate_root(root)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .thread_name(|i| format!("webpify-worker-{}", i))
            .build()?;

        let mut summary = BatchSummary::default();
        let work = self.discover(root, &mut summary);

        self.reporter.report(&BatchEvent::Started {
            root,
            candidates: work.len(),
            quality: self.options.quality,
            workers: self.options.workers,
        });

        let progress = self.progress_bar(work.len() as u64);
        let converter = &self.converter;
        let quality = self.options.quality;
        let (tx, rx) = mpsc::channel::<FileReport>();

        thread::scope(|scope| {
            scope.spawn(move || {
                pool.install(|| {
                    work.into_par_iter().for_each_with(tx, |tx, item| {
                        // The receiver outlives every sender.
                        let _ = tx.send(process_work_item(converter, item, quality));
                    });
                });
            });

            for report in rx {
                self.record(&mut summary, &report);
                progress.inc(1);
            }
        });

        progress.finish_with_message("✅ Batch conversion complete");
        self.reporter.report(&BatchEvent::Finished { summary: &summary });

        Ok(summary)
    }

    fn discover(&self, root: &Path, summary: &mut BatchSummary) -> Vec<WorkItem> {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| self.admit(entry, &mut claimed, summary))
            .collect()
    }

    /// Classifies one traversal entry. Only regular files are counted.
    fn admit(
        &self,
        entry: walkdir::Result<DirEntry>,
        claimed: &mut HashSet<PathBuf>,
        summary: &mut BatchSummary,
    ) -> Option<WorkItem> {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let error = ConvertError::from(err);
                self.reporter
                    .report(&BatchEvent::TraversalFailed { error: &error });
                return None;
            }
        };

        if !entry.file_type().is_file() {
            return None;
        }
        summary.discovered += 1;

        let reason = classify(entry.path());
        if !reason.is_convert() {
            summary.skipped += 1;
            self.reporter.report(&BatchEvent::Skipped {
                path: entry.path(),
                reason,
            });
            return None;
        }

        let source = match SourceFile::from_entry(&entry) {
            Ok(source) => source,
            Err(error) => {
                summary.skipped += 1;
                summary.failed += 1;
                self.reporter.report(&BatchEvent::Failed {
                    path: entry.path(),
                    error: &error,
                });
                return None;
            }
        };

        // A stale target on disk is overwritten; two sources sharing one
        // target are not.
        let target = target_path(&source.path);
        if !claimed.insert(target.clone()) {
            summary.skipped += 1;
            self.reporter.report(&BatchEvent::TargetCollision {
                path: &source.path,
                target: &target,
            });
            return None;
        }

        Some(WorkItem { source, target })
    }

    fn record(&self, summary: &mut BatchSummary, report: &FileReport) {
        match &report.outcome {
            ConversionOutcome::Converted {
                source_size,
                output_size,
                mode,
            } => {
                summary.converted += 1;
                summary.bytes_before += source_size;
                summary.bytes_after += output_size;
                self.reporter.report(&BatchEvent::Converted {
                    source: &report.source.path,
                    target: &report.target,
                    source_size: *source_size,
                    output_size: *output_size,
                    mode: *mode,
                });

                match &report.replace_error {
                    Some(error) => {
                        summary.replace_failures += 1;
                        self.reporter.report(&BatchEvent::ReplaceFailed { error });
                    }
                    None => self.reporter.report(&BatchEvent::Replaced {
                        path: &report.source.path,
                    }),
                }
            }
            ConversionOutcome::Failed(error) => {
                summary.skipped += 1;
                summary.failed += 1;
                self.reporter.report(&BatchEvent::Failed {
                    path: &report.source.path,
                    error,
                });
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

/// Convert then replace; runs on a pool thread.
fn process_work_item(converter: &Converter, item: WorkItem, quality: u8) -> FileReport {
    let outcome = converter.convert(&item.source.path, &item.target, quality);
    let replace_error = replace_source(&item.source, &item.target, &outcome).err();

    FileReport {
        source: item.source,
        target: item.target,
        outcome,
        replace_error,
    }
}

fn validate_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root).map_err(|_| ConvertError::RootNotFound(root.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(ConvertError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Convert every eligible image under `root` with the default logger.
pub fn convert_directory(root: &Path, quality: u8, workers: usize) -> Result<BatchSummary> {
    let options = BatchOptions::new(Some(quality), Some(workers))?;
    BatchConverter::new(options, Arc::new(Logger::default())).run(root)
}
