//! What a generation run did, or would do in dry-run mode.

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// One filesystem effect of a generation run.
///
/// The same list is produced for dry-run and real runs; dry-run only logs
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Confirm a directory is absent or empty, creating it when absent.
    EnsureEmptyDir(PathBuf),
    CreateDir(PathBuf),
    CopySkeleton { from: PathBuf, to: PathBuf },
    WriteFile(PathBuf),
    WriteDocument(PathBuf),
    RenderTemplate { template: PathBuf, output: PathBuf },
    /// Read an existing compose file, merge one service into it, rewrite it.
    MergeCompose(PathBuf),
    /// Read the state file, record the service answers, rewrite it.
    RecordService(PathBuf),
    AppendRoute(PathBuf),
}

impl PlannedAction {
    /// Path the action mutates.
    pub fn target(&self) -> &Path {
        match self {
            Self::EnsureEmptyDir(path)
            | Self::CreateDir(path)
            | Self::WriteFile(path)
            | Self::WriteDocument(path)
            | Self::MergeCompose(path)
            | Self::RecordService(path)
            | Self::AppendRoute(path) => path,
            Self::CopySkeleton { to, .. } => to,
            Self::RenderTemplate { output, .. } => output,
        }
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnsureEmptyDir(path) => {
                write!(f, "Would check that {} is empty", path.display())
            }
            Self::CreateDir(path) => write!(f, "Would create directory {}", path.display()),
            Self::CopySkeleton { from, to } => write!(
                f,
                "Would copy base template {} to {}",
                from.display(),
                to.display()
            ),
            Self::WriteFile(path) => write!(f, "Would write {}", path.display()),
            Self::WriteDocument(path) => write!(f, "Would write document {}", path.display()),
            Self::RenderTemplate { template, output } => write!(
                f,
                "Would render {} to {}",
                template.display(),
                output.display()
            ),
            Self::MergeCompose(path) => {
                write!(f, "Would merge the new service into {}", path.display())
            }
            Self::RecordService(path) => {
                write!(f, "Would record the service in {}", path.display())
            }
            Self::AppendRoute(path) => write!(f, "Would append a REST route to {}", path.display()),
        }
    }
}

/// Outcome of `init` or `add-service`.
///
/// `resolved` is the validated input the run used; it is identical for a
/// dry-run and a real run over the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport<T> {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub project_dir: PathBuf,
    pub resolved: T,
    pub actions: Vec<PlannedAction>,
}

impl<T> GenerationReport<T> {
    /// Number of files the run writes (or would write).
    pub fn file_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| {
                !matches!(
                    a,
                    PlannedAction::EnsureEmptyDir(_)
                        | PlannedAction::CreateDir(_)
                        | PlannedAction::CopySkeleton { .. }
                )
            })
            .count()
    }
}
