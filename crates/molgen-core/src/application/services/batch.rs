//! The final write batch of a generation run.
//!
//! Every task is independent. They are issued together and awaited with
//! `join_all`, so one failing write never hides the outcome of the others.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, error};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
        services::plan::PlannedAction,
    },
    error::{MolgenError, MolgenResult},
};

/// One write of the batch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WriteTask {
    Text {
        action: PlannedAction,
        content: String,
    },
    Document {
        action: PlannedAction,
        document: serde_yaml::Value,
    },
    Render {
        template: PathBuf,
        output: PathBuf,
        data: serde_json::Value,
    },
}

impl WriteTask {
    pub(crate) fn file(path: PathBuf, content: impl Into<String>) -> Self {
        Self::Text {
            action: PlannedAction::WriteFile(path),
            content: content.into(),
        }
    }

    pub(crate) fn document(path: PathBuf, document: serde_yaml::Value) -> Self {
        Self::Document {
            action: PlannedAction::WriteDocument(path),
            document,
        }
    }

    pub(crate) fn render(template: PathBuf, output: PathBuf, data: serde_json::Value) -> Self {
        Self::Render {
            template,
            output,
            data,
        }
    }

    /// Report the write as `action` instead of a plain file write.
    pub(crate) fn described_as(self, action: PlannedAction) -> Self {
        match self {
            Self::Text { content, .. } => Self::Text { action, content },
            Self::Document { document, .. } => Self::Document { action, document },
            render @ Self::Render { .. } => render,
        }
    }

    pub(crate) fn action(&self) -> PlannedAction {
        match self {
            Self::Text { action, .. } | Self::Document { action, .. } => action.clone(),
            Self::Render {
                template, output, ..
            } => PlannedAction::RenderTemplate {
                template: template.clone(),
                output: output.clone(),
            },
        }
    }
}

/// Runs a batch against the ports.
pub(crate) struct BatchWriter<'a> {
    filesystem: &'a dyn Filesystem,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> BatchWriter<'a> {
    pub(crate) fn new(filesystem: &'a dyn Filesystem, renderer: &'a dyn TemplateRenderer) -> Self {
        Self {
            filesystem,
            renderer,
        }
    }

    /// Issue every task at once and wait for all of them.
    ///
    /// Returns the number of completed writes, or `PartialGeneration`
    /// listing every failed path.
    pub(crate) async fn run(&self, tasks: &[WriteTask]) -> MolgenResult<usize> {
        let outcomes = join_all(tasks.iter().map(|task| self.execute(task))).await;

        let mut written = 0;
        let mut failures = Vec::new();
        for (task, outcome) in tasks.iter().zip(outcomes) {
            let action = task.action();
            match outcome {
                Ok(()) => {
                    debug!(path = %action.target().display(), "Written");
                    written += 1;
                }
                Err(e) => {
                    error!(path = %action.target().display(), error = %e, "Write failed");
                    failures.push((action.target().to_path_buf(), e.to_string()));
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(ApplicationError::PartialGeneration { written, failures }.into())
        }
    }

    async fn execute(&self, task: &WriteTask) -> MolgenResult<()> {
        match task {
            WriteTask::Text { action, content } => {
                self.filesystem.write_file(action.target(), content).await
            }
            WriteTask::Document { action, document } => {
                self.filesystem
                    .write_document(action.target(), document)
                    .await
            }
            WriteTask::Render {
                template,
                output,
                data,
            } => render_to_file(self.filesystem, self.renderer, template, output, data).await,
        }
    }
}

/// Read `template`, render it against `data`, and write the result to
/// `output`, creating the parent directory first.
pub(crate) async fn render_to_file(
    filesystem: &dyn Filesystem,
    renderer: &dyn TemplateRenderer,
    template: &Path,
    output: &Path,
    data: &serde_json::Value,
) -> MolgenResult<()> {
    let source = filesystem.read_to_string(template).await?;
    let rendered = renderer
        .render(&template.display().to_string(), &source, data)
        .map_err(|e| match e {
            MolgenError::Application(ApplicationError::RenderingFailed { .. }) => e,
            other => ApplicationError::RenderingFailed {
                template: template.display().to_string(),
                reason: other.to_string(),
            }
            .into(),
        })?;

    if let Some(parent) = output.parent() {
        filesystem.create_dir_all(parent).await?;
    }
    filesystem.write_file(output, &rendered).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateRenderer};

    #[tokio::test]
    async fn every_failure_is_collected() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file()
            .withf(|path, _| path == Path::new("out/a"))
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .withf(|path, _| path == Path::new("out/b") || path == Path::new("out/c"))
            .returning(|path, _| {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into())
            });
        let renderer = MockTemplateRenderer::new();

        let tasks = [
            WriteTask::file("out/a".into(), "a"),
            WriteTask::file("out/b".into(), "b"),
            WriteTask::file("out/c".into(), "c"),
        ];
        let err = BatchWriter::new(&fs, &renderer).run(&tasks).await.unwrap_err();

        match err {
            MolgenError::Application(ApplicationError::PartialGeneration { written, failures }) => {
                assert_eq!(written, 1);
                let paths: Vec<_> = failures.iter().map(|(p, _)| p.clone()).collect();
                assert_eq!(paths, [PathBuf::from("out/b"), PathBuf::from("out/c")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn render_creates_parent_before_writing() {
        let mut seq = mockall::Sequence::new();
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .withf(|path| path == Path::new("tpl/prometheus.hbs"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("job: {{name}}".into()));
        fs.expect_create_dir_all()
            .withf(|path| path == Path::new("out/docker/config"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("out/docker/config/prometheus.yml") && content == "job: shop"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|_, _, _| Ok("job: shop".into()));

        let data = serde_json::json!({ "name": "shop" });
        render_to_file(
            &fs,
            &renderer,
            Path::new("tpl/prometheus.hbs"),
            Path::new("out/docker/config/prometheus.yml"),
            &data,
        )
        .await
        .unwrap();
    }

    #[test]
    fn described_as_relabels_text_writes() {
        let task = WriteTask::file("p/state.json".into(), "{}")
            .described_as(PlannedAction::RecordService("p/state.json".into()));
        assert_eq!(
            task.action(),
            PlannedAction::RecordService("p/state.json".into())
        );
    }
}
