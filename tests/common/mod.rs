//! Shared fixture: a project with two built targets and one release.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TAG: &str = "v1.0.0";

pub const CONFIG: &str = r#"
project = "p"

[archive_settings]
binary_dir = "bin"
extra_files = [{ source_path = "README.md" }]

[[builds]]
path = "unix"
  [[builds.os]]
  goos = "linux"
    [[builds.os.archs]]
    goarch = "amd64"
  [[builds.os]]
  goos = "darwin"
    [[builds.os.archs]]
    goarch = "arm64"

[[archives]]
paths = "builds/**"

[[releases]]
path = "main"
  [releases.release_settings]
  type = "github"
  repository = "p"
  repository_owner = "o"
"#;

pub const ARCHIVE_NAMES: [&str; 2] = ["p_1.0.0_linux-amd64.tar.gz", "p_1.0.0_darwin-arm64.tar.gz"];

/// Project directory with config, README and built binaries under `dist/`
pub fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("release-pipeline.toml"), config).unwrap();
    fs::write(dir.path().join("README.md"), "# p\n").unwrap();

    for arch in ["unix/linux/amd64", "unix/darwin/arm64"] {
        let bin_dir = builds_root(dir.path()).join(arch);
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(bin_dir.join("p"), format!("binary for {arch}")).unwrap();
    }
    dir
}

pub fn dist_root(project_dir: &Path) -> PathBuf {
    project_dir.join("dist").join("p").join(TAG)
}

pub fn builds_root(project_dir: &Path) -> PathBuf {
    dist_root(project_dir).join("builds")
}

pub fn archive_path(project_dir: &Path, arch: &str, name: &str) -> PathBuf {
    dist_root(project_dir).join("archives").join(arch).join(name)
}

pub fn release_dir(project_dir: &Path) -> PathBuf {
    dist_root(project_dir).join("releases").join("main")
}
