//! Template root discovery.
//!
//! The template root holds the static project skeleton (`base/`) and the
//! Handlebars templates (`README.hbs`, `service.hbs`, ...).
//!
//! # Resolution order
//!
//! Candidates are probed in this order, stopping at the first directory
//! that contains a `base/` sub-directory:
//!
//! 1. An explicit override (the `templates.path` application setting).
//! 2. **`$MOLGEN_TEMPLATES_DIR`**.
//! 3. **`./templates`**, relative to the current working directory.
//! 4. **`<executable-dir>/templates`**, for installed binaries.
//! 5. The workspace `templates/` directory this crate was built from.
//!
//! ```env
//! MOLGEN_TEMPLATES_DIR=./templates
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

/// Environment variable overriding the template root.
pub const TEMPLATES_DIR_ENV: &str = "MOLGEN_TEMPLATES_DIR";

/// Directory every template root must contain.
const SKELETON_DIR: &str = "base";

/// Finds the template root.
#[derive(Debug, Clone, Default)]
pub struct TemplateRootLocator {
    override_path: Option<PathBuf>,
}

impl TemplateRootLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe `path` before anything else.
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }

    /// First candidate that looks like a template root.
    #[instrument(skip(self))]
    pub fn locate(&self) -> Option<PathBuf> {
        for candidate in self.candidates() {
            if is_template_root(&candidate) {
                info!(path = %candidate.display(), "Using template root");
                return Some(candidate);
            }
            debug!(path = %candidate.display(), "not a template root, skipping");
        }

        warn!(
            "no template root found; checked templates.path, ${TEMPLATES_DIR_ENV}, \
             ./templates, <exe>/templates and the build-time workspace"
        );
        None
    }

    /// The ordered list of candidate paths to probe.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(5);

        if let Some(path) = &self.override_path {
            paths.push(path.clone());
        }
        if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
            if !env_dir.trim().is_empty() {
                paths.push(PathBuf::from(env_dir));
            }
        }
        paths.push(PathBuf::from("templates"));
        if let Some(exe_sibling) = exe_sibling_templates() {
            paths.push(exe_sibling);
        }
        paths.push(workspace_templates());

        paths
    }
}

/// Does `path` hold a project skeleton?
pub fn is_template_root(path: &Path) -> bool {
    path.join(SKELETON_DIR).is_dir()
}

/// `<directory of current executable>/templates`, if it can be determined.
fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}

fn workspace_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}
