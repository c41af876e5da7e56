//! Pipeline stages and their shared state.
//!
//! Everything a stage writes lives under `<dist>/<project>/<tag>/`:
//!
//! ```text
//! builds/<build>/<goos>/<goarch>/<binary>            (input)
//! archives/<build>/<goos>/<goarch>/<name><ext>
//! releases/<release>/{checksum.txt, release-notes.md}
//! ```

pub mod archive;
pub mod release;

pub use archive::run_archives;
pub use release::{ClientFactory, ReleaseOutcome, run_releases, run_releases_with};

use crate::config::{
    Archive, ArchPath, BuildContext, Config, DIST_ROOT_ARCHIVES, DIST_ROOT_BUILDS,
    DIST_ROOT_RELEASES, EnvConfig, render_name,
};
use crate::error::{ErrorExt, Result};
use crate::workforce::Workforce;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// State shared by every stage of one invocation
#[derive(Debug, Clone)]
pub struct Core {
    /// Resolved configuration
    pub config: Config,
    /// Environment snapshot
    pub env: EnvConfig,
    /// Process-wide worker pool
    pub workforce: Workforce,
    /// Dist root
    pub dist_dir: PathBuf,
    /// Project root; extra files and notes files resolve against it
    pub project_dir: PathBuf,
    /// Release tag
    pub tag: String,
    /// Produce local artifacts only
    pub try_run: bool,
}

impl Core {
    /// Create the shared state, absolutizing the directories
    pub fn new(
        config: Config,
        env: EnvConfig,
        workforce: Workforce,
        dist_dir: &Path,
        project_dir: &Path,
        tag: impl Into<String>,
        try_run: bool,
    ) -> Result<Self> {
        let project_dir = project_dir
            .absolutize()
            .fs_context("resolving project directory", project_dir)?
            .to_path_buf();
        let dist_dir = if dist_dir.is_absolute() {
            dist_dir.to_path_buf()
        } else {
            project_dir.join(dist_dir)
        };

        Ok(Self {
            config,
            env,
            workforce,
            dist_dir,
            project_dir,
            tag: tag.into(),
            try_run,
        })
    }

    /// `<dist>/<project>/<tag>/<root>`
    pub fn dist_root(&self, root: &str) -> PathBuf {
        self.dist_dir
            .join(&self.config.project)
            .join(&self.tag)
            .join(root)
    }

    /// Expected location of the binary built for `arch`
    pub fn binary_path(&self, arch: &ArchPath) -> PathBuf {
        join_slash(&self.dist_root(DIST_ROOT_BUILDS), &arch.binary_path())
    }

    /// Output directory of the archive built for `arch`
    pub fn archive_dir(&self, arch: &ArchPath) -> PathBuf {
        join_slash(&self.dist_root(DIST_ROOT_ARCHIVES), &arch.path)
    }

    /// Output directory of a release
    pub fn release_dir(&self, release_path: &str) -> PathBuf {
        join_slash(&self.dist_root(DIST_ROOT_RELEASES), release_path)
    }

    /// Rendered archive file name: template, replacements, then extension
    pub fn archive_file_name(&self, archive: &Archive, arch: &ArchPath) -> Result<String> {
        let ctx = BuildContext {
            project: self.config.project.clone(),
            tag: self.tag.clone(),
            goos: arch.goos.clone(),
            goarch: arch.goarch.clone(),
        };
        let settings = &archive.settings;
        let name = render_name(&settings.name_template, &ctx)?;
        let name = settings.replacements.replace(&name);
        Ok(format!("{name}{}", settings.archive_type.extension))
    }

    /// Full path of the archive built for `arch`
    pub fn archive_path(&self, archive: &Archive, arch: &ArchPath) -> Result<PathBuf> {
        Ok(self
            .archive_dir(arch)
            .join(self.archive_file_name(archive, arch)?))
    }
}

/// Join a `/`-separated relative path onto `base`
fn join_slash(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// Remove `dir` if it exists, then create it empty
pub(crate) async fn recreate_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("removing output directory", dir),
    }
    tokio::fs::create_dir_all(dir)
        .await
        .fs_context("creating output directory", dir)
}
