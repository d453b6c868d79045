use crate::batch::BatchSummary;
use crate::codec::EncodeMode;
use crate::constants::{
    ERROR_PREFIX, INFO_PREFIX, SIZE_PREFIX, SKIP_PREFIX, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::eligibility::Eligibility;
use crate::error::ConvertError;
use crate::utils::{format_file_size, savings_percent};
use std::path::Path;
use tracing::{error, info, warn};

/// Every file transition the orchestrator announces.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Started {
        root: &'a Path,
        candidates: usize,
        quality: u8,
        workers: usize,
    },
    Skipped {
        path: &'a Path,
        reason: Eligibility,
    },
    TargetCollision {
        path: &'a Path,
        target: &'a Path,
    },
    TraversalFailed {
        error: &'a ConvertError,
    },
    Converted {
        source: &'a Path,
        target: &'a Path,
        source_size: u64,
        output_size: u64,
        mode: EncodeMode,
    },
    Failed {
        path: &'a Path,
        error: &'a ConvertError,
    },
    Replaced {
        path: &'a Path,
    },
    ReplaceFailed {
        error: &'a ConvertError,
    },
    Finished {
        summary: &'a BatchSummary,
    },
}

/// Logging collaborator handed to the orchestrator.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &BatchEvent<'_>);
}

/// Renders batch events through `tracing`.
///
/// Quiet mode drops the per-file info lines; warnings, errors and the final
/// summary are always emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    quiet: bool,
}

impl Logger {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Reporter for Logger {
    fn report(&self, event: &BatchEvent<'_>) {
        match event {
            BatchEvent::Started {
                root,
                candidates,
                quality,
                workers,
            } => {
                if !self.quiet {
                    info!("{} Found {} image files to process", INFO_PREFIX, candidates);
                    info!("{} Input directory: {}", INFO_PREFIX, root.display());
                    info!("{} WebP quality: {}", INFO_PREFIX, quality);
                    info!("{} Workers: {}", INFO_PREFIX, workers);
                    info!("{} Mode: replace original files with WebP versions", INFO_PREFIX);
                }
            }
            BatchEvent::Skipped { path, reason } => {
                if !self.quiet {
                    info!("{} Skipping {} file: {}", SKIP_PREFIX, reason, path.display());
                }
            }
            BatchEvent::TargetCollision { path, target } => {
                warn!(
                    "{} Skipping {}: target {} is claimed by another file",
                    WARNING_PREFIX,
                    path.display(),
                    target.display()
                );
            }
            BatchEvent::TraversalFailed { error } => {
                warn!("{} {}", WARNING_PREFIX, error);
            }
            BatchEvent::Converted {
                source,
                target,
                source_size,
                output_size,
                mode,
            } => {
                if !self.quiet {
                    if mode.is_lossless() {
                        info!(
                            "{} Converting PNG with transparency: {}",
                            INFO_PREFIX,
                            source.display()
                        );
                    }
                    info!(
                        "{} Converted ({}): {} -> {}",
                        SUCCESS_PREFIX,
                        mode,
                        source.display(),
                        target.display()
                    );
                    info!(
                        "{} Size reduction: {} -> {} ({:.2}% saved)",
                        SIZE_PREFIX,
                        format_file_size(*source_size),
                        format_file_size(*output_size),
                        savings_percent(*source_size, *output_size)
                    );
                }
            }
            BatchEvent::Failed { path, error } => {
                error!(
                    "{} Error converting {} [{}]: {}",
                    ERROR_PREFIX,
                    path.display(),
                    error.kind(),
                    error
                );
            }
            BatchEvent::Replaced { path } => {
                if !self.quiet {
                    info!(
                        "{} Replaced original file with WebP version: {}",
                        SUCCESS_PREFIX,
                        path.display()
                    );
                }
            }
            BatchEvent::ReplaceFailed { error } => {
                warn!("{} {}", WARNING_PREFIX, error);
            }
            BatchEvent::Finished { summary } => {
                info!(
                    "{} Conversion completed: {} files converted to WebP, {} files skipped",
                    SUCCESS_PREFIX, summary.converted, summary.skipped
                );
                if summary.failed > 0 || summary.replace_failures > 0 {
                    warn!(
                        "{} {} conversions failed, {} originals could not be removed",
                        WARNING_PREFIX, summary.failed, summary.replace_failures
                    );
                }
                if summary.converted > 0 {
                    info!(
                        "{} Total size: {} -> {} ({:.1}% saved)",
                        SIZE_PREFIX,
                        format_file_size(summary.bytes_before),
                        format_file_size(summary.bytes_after),
                        savings_percent(summary.bytes_before, summary.bytes_after)
                    );
                }
            }
        }
    }
}
