//! Pipeline configuration.
//!
//! The pipeline is configured from a TOML file:
//!
//! ```toml
//! project = "hugo"
//!
//! [archive_settings]
//! name_template = "{{project}}_{{trim_prefix \"v\" tag}}_{{goos}}-{{goarch}}"
//! type = { format = "tar.gz", extension = ".tar.gz" }
//!
//! [[builds]]
//! path = "unix"
//!   [[builds.os]]
//!   goos = "linux"
//!     [[builds.os.archs]]
//!     goarch = "amd64"
//!
//! [[archives]]
//! paths = "builds/unix/**"
//!
//! [[releases]]
//! paths = "archives/**"
//! path = "myrelease"
//!   [releases.release_settings]
//!   type = "github"
//!   repository = "hugo"
//!   repository_owner = "gohugoio"
//! ```
//!
//! Archive-level `archive_settings` override the top-level defaults field by field.
//! Build targets are addressed as `builds/<path>/<goos>/<goarch>`, archives as
//! `archives/<path>/<goos>/<goarch>` and releases as `releases/<path>`; the
//! `paths` filters are glob patterns over those addresses.

mod env;
mod template;

pub use env::{
    ENV_CHANGELOG_GITREPO, ENV_RETRIES, ENV_WORKERS, EnvConfig, RetryConfig,
};
pub use template::{BuildContext, ReleaseContext, Replacer, render_name, validate_template};

use crate::archive::ArchiveFormat;
use crate::changelog::GroupRule;
use crate::error::{ConfigError, Result};
use glob::Pattern;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Default configuration file name, relative to the project directory
pub const DEFAULT_CONFIG_FILE: &str = "release-pipeline.toml";

/// Dist sub-directory holding build output
pub const DIST_ROOT_BUILDS: &str = "builds";
/// Dist sub-directory holding archives
pub const DIST_ROOT_ARCHIVES: &str = "archives";
/// Dist sub-directory holding release artifacts
pub const DIST_ROOT_RELEASES: &str = "releases";

/// Name template used when none is configured
pub const DEFAULT_NAME_TEMPLATE: &str =
    r#"{{project}}_{{trim_prefix "v" tag}}_{{goos}}-{{goarch}}"#;

// ============================================================================
// Raw (as written) configuration
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    project: String,
    archive_settings: RawArchiveSettings,
    release_settings: Option<RawReleaseSettings>,
    builds: Vec<RawBuild>,
    archives: Vec<RawArchive>,
    releases: Vec<RawRelease>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawArchiveSettings {
    name_template: Option<String>,
    binary_dir: Option<String>,
    #[serde(rename = "type")]
    archive_type: Option<RawArchiveType>,
    extra_files: Option<Vec<RawExtraFile>>,
    replacements: Option<BTreeMap<String, String>>,
}

impl RawArchiveSettings {
    fn or(self, defaults: &RawArchiveSettings) -> RawArchiveSettings {
        RawArchiveSettings {
            name_template: self.name_template.or_else(|| defaults.name_template.clone()),
            binary_dir: self.binary_dir.or_else(|| defaults.binary_dir.clone()),
            archive_type: self.archive_type.or_else(|| defaults.archive_type.clone()),
            extra_files: self.extra_files.or_else(|| defaults.extra_files.clone()),
            replacements: self.replacements.or_else(|| defaults.replacements.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArchiveType {
    format: ArchiveFormat,
    extension: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExtraFile {
    source_path: String,
    target_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuild {
    path: String,
    #[serde(default)]
    os: Vec<RawBuildOs>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuildOs {
    goos: String,
    binary: Option<String>,
    #[serde(default)]
    archs: Vec<RawBuildArch>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuildArch {
    goarch: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawArchive {
    paths: Option<String>,
    archive_settings: RawArchiveSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawRelease {
    paths: Option<String>,
    path: String,
    release_settings: Option<RawReleaseSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawReleaseSettings {
    #[serde(rename = "type")]
    release_type: String,
    repository: String,
    repository_owner: String,
    draft: bool,
    prerelease: bool,
    name: Option<String>,
    release_notes_settings: RawReleaseNotesSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawReleaseNotesSettings {
    generate: bool,
    filename: Option<String>,
    groups: Vec<RawReleaseNotesGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawReleaseNotesGroup {
    regexp: String,
    title: String,
    ignore: bool,
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// One resolved build target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchPath {
    /// Canonical path segment, `<build>/<goos>/<goarch>`
    pub path: String,
    /// Target operating system
    pub goos: String,
    /// Target architecture
    pub goarch: String,
    /// Binary file name, including `.exe` on Windows
    pub binary: String,
}

impl ArchPath {
    /// Binary location relative to the builds root, `/`-separated
    pub fn binary_path(&self) -> String {
        format!("{}/{}", self.path, self.binary)
    }
}

/// Archive type selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveType {
    /// Writer format
    pub format: ArchiveFormat,
    /// Extension appended to the rendered name
    pub extension: String,
}

impl Default for ArchiveType {
    fn default() -> Self {
        Self {
            format: ArchiveFormat::TarGz,
            extension: ArchiveFormat::TarGz.default_extension().to_string(),
        }
    }
}

/// Extra file copied into every archive of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraFile {
    /// Path relative to the project directory
    pub source_path: String,
    /// Path inside the archive
    pub target_path: String,
}

/// Settings of one archive group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSettings {
    /// Handlebars template for the archive name (without extension)
    pub name_template: String,
    /// Directory inside the archive that holds the binary
    pub binary_dir: String,
    /// Format and extension
    pub archive_type: ArchiveType,
    /// Files added after the binary
    pub extra_files: Vec<ExtraFile>,
    /// Literal replacements applied to the rendered name
    pub replacements: Replacer,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            name_template: DEFAULT_NAME_TEMPLATE.to_string(),
            binary_dir: String::new(),
            archive_type: ArchiveType::default(),
            extra_files: Vec::new(),
            replacements: Replacer::default(),
        }
    }
}

/// An archive group and the build targets it covers
#[derive(Debug, Clone)]
pub struct Archive {
    /// Glob over `builds/<arch path>`
    pub paths: String,
    /// Resolved settings
    pub settings: ArchiveSettings,
    /// Build targets matched by `paths`
    pub archs: Vec<ArchPath>,
}

/// Supported release providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    /// GitHub releases
    GitHub,
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::GitHub => f.write_str("github"),
        }
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" | "" => Ok(ReleaseType::GitHub),
            other => Err(ConfigError::UnsupportedReleaseType {
                release_type: other.to_string(),
            }),
        }
    }
}

/// Release notes behavior
#[derive(Debug, Clone, Default)]
pub struct ReleaseNotesSettings {
    /// Generate `release-notes.md` from the changelog
    pub generate: bool,
    /// Pre-existing notes file, relative to the project directory
    pub filename: Option<String>,
    /// Ordered grouping rules
    pub groups: Vec<GroupRule>,
}

/// Provider settings of one release
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    /// Provider
    pub release_type: ReleaseType,
    /// Repository name
    pub repository: String,
    /// Repository owner
    pub repository_owner: String,
    /// Create the release as a draft
    pub draft: bool,
    /// Mark the release as a prerelease
    pub prerelease: bool,
    /// Release title template; the tag is used when unset
    pub name: Option<String>,
    /// Release notes behavior
    pub release_notes_settings: ReleaseNotesSettings,
}

impl ReleaseSettings {
    /// Check settings that can only be judged once a release is about to run
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.release_notes_settings.generate && self.release_notes_settings.filename.is_some() {
            return Err(ConfigError::ConflictingReleaseNotes {
                release_type: self.release_type.to_string(),
            });
        }
        Ok(())
    }
}

/// One release target
#[derive(Debug, Clone)]
pub struct Release {
    /// Glob over `archives/<arch path>`
    pub paths: String,
    paths_pattern: Pattern,
    /// Release path segment under the releases root
    pub path: String,
    /// Provider settings
    pub settings: ReleaseSettings,
}

impl Release {
    /// Whether the archive built for `arch` belongs to this release
    pub fn matches_archive(&self, arch: &ArchPath) -> bool {
        self.paths_pattern
            .matches(&format!("{DIST_ROOT_ARCHIVES}/{}", arch.path))
    }
}

/// Fully resolved pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project name
    pub project: String,
    /// Every build target, in declaration order
    pub builds: Vec<ArchPath>,
    /// Archive groups
    pub archives: Vec<Archive>,
    /// Release targets
    pub releases: Vec<Release>,
}

/// Compile a glob pattern from the configuration or command line
pub fn compile_pattern(pattern: &str) -> std::result::Result<Pattern, ConfigError> {
    Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlob {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn require(value: &str, field: &str) -> std::result::Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

impl Config {
    /// Load and resolve a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!(
            "Loaded config {}: {} build target(s), {} archive group(s), {} release(s)",
            path.display(),
            config.builds.len(),
            config.archives.len(),
            config.releases.len()
        );
        Ok(config)
    }

    /// Parse and resolve a configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::resolve(raw)?)
    }

    fn resolve(raw: RawConfig) -> std::result::Result<Self, ConfigError> {
        require(&raw.project, "project")?;

        let builds = resolve_builds(&raw.project, &raw.builds)?;

        let mut archives = Vec::with_capacity(raw.archives.len());
        for archive in raw.archives {
            let paths = archive
                .paths
                .unwrap_or_else(|| format!("{DIST_ROOT_BUILDS}/**"));
            let pattern = compile_pattern(&paths)?;
            let settings = resolve_archive_settings(archive.archive_settings.or(&raw.archive_settings))?;
            let archs = builds
                .iter()
                .filter(|a| pattern.matches(&format!("{DIST_ROOT_BUILDS}/{}", a.path)))
                .cloned()
                .collect();
            archives.push(Archive {
                paths,
                settings,
                archs,
            });
        }

        reject_overlapping_archives(&archives)?;

        let mut releases = Vec::with_capacity(raw.releases.len());
        for release in raw.releases {
            require(&release.path, "releases.path")?;
            let paths = release
                .paths
                .unwrap_or_else(|| format!("{DIST_ROOT_ARCHIVES}/**"));
            let paths_pattern = compile_pattern(&paths)?;
            let settings = release
                .release_settings
                .or_else(|| raw.release_settings.clone())
                .unwrap_or_default();
            let settings = resolve_release_settings(settings)?;
            settings.validate()?;
            releases.push(Release {
                paths,
                paths_pattern,
                path: release.path.trim_matches('/').to_string(),
                settings,
            });
        }

        Ok(Self {
            project: raw.project,
            builds,
            archives,
            releases,
        })
    }

    /// Every (archive group, build target) pair whose `builds/<path>` matches `filter`
    pub fn archive_archs<'a>(
        &'a self,
        filter: &'a Pattern,
    ) -> impl Iterator<Item = (&'a Archive, &'a ArchPath)> + 'a {
        self.archives.iter().flat_map(move |archive| {
            archive
                .archs
                .iter()
                .filter(move |arch| filter.matches(&format!("{DIST_ROOT_BUILDS}/{}", arch.path)))
                .map(move |arch| (archive, arch))
        })
    }

    /// Releases whose `releases/<path>` matches `filter`
    pub fn find_releases(&self, filter: &Pattern) -> Vec<&Release> {
        self.releases
            .iter()
            .filter(|r| filter.matches(&format!("{DIST_ROOT_RELEASES}/{}", r.path)))
            .collect()
    }
}

fn resolve_builds(
    project: &str,
    builds: &[RawBuild],
) -> std::result::Result<Vec<ArchPath>, ConfigError> {
    let mut out = Vec::new();
    for build in builds {
        require(&build.path, "builds.path")?;
        let build_path = build.path.trim_matches('/');
        for os in &build.os {
            require(&os.goos, "builds.os.goos")?;
            let mut binary = os.binary.clone().unwrap_or_else(|| project.to_string());
            if os.goos == "windows" && !binary.ends_with(".exe") {
                binary.push_str(".exe");
            }
            for arch in &os.archs {
                require(&arch.goarch, "builds.os.archs.goarch")?;
                out.push(ArchPath {
                    path: format!("{build_path}/{}/{}", os.goos, arch.goarch),
                    goos: os.goos.clone(),
                    goarch: arch.goarch.clone(),
                    binary: binary.clone(),
                });
            }
        }
    }
    Ok(out)
}

/// Every build target is archived by at most one group, so no two tasks share
/// an `archives/<arch path>` directory.
fn reject_overlapping_archives(archives: &[Archive]) -> std::result::Result<(), ConfigError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for archive in archives {
        for arch in &archive.archs {
            if let Some(first) = owners.insert(&arch.path, &archive.paths) {
                return Err(ConfigError::OverlappingArchives {
                    first: first.to_string(),
                    second: archive.paths.clone(),
                    path: arch.path.clone(),
                });
            }
        }
    }
    Ok(())
}

fn resolve_archive_settings(
    raw: RawArchiveSettings,
) -> std::result::Result<ArchiveSettings, ConfigError> {
    let name_template = raw
        .name_template
        .unwrap_or_else(|| DEFAULT_NAME_TEMPLATE.to_string());
    validate_template(&name_template, &BuildContext::sample())?;

    let archive_type = match raw.archive_type {
        Some(t) => ArchiveType {
            extension: t
                .extension
                .unwrap_or_else(|| t.format.default_extension().to_string()),
            format: t.format,
        },
        None => ArchiveType::default(),
    };

    let extra_files = raw
        .extra_files
        .unwrap_or_default()
        .into_iter()
        .map(|f| {
            require(&f.source_path, "extra_files.source_path")?;
            let target_path = f.target_path.unwrap_or_else(|| {
                Path::new(&f.source_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| f.source_path.clone())
            });
            Ok(ExtraFile {
                source_path: f.source_path,
                target_path,
            })
        })
        .collect::<std::result::Result<Vec<_>, ConfigError>>()?;

    Ok(ArchiveSettings {
        name_template,
        binary_dir: raw.binary_dir.unwrap_or_default().trim_matches('/').to_string(),
        archive_type,
        extra_files,
        replacements: Replacer::new(&raw.replacements.unwrap_or_default()),
    })
}

fn resolve_release_settings(
    raw: RawReleaseSettings,
) -> std::result::Result<ReleaseSettings, ConfigError> {
    let groups = raw
        .release_notes_settings
        .groups
        .into_iter()
        .map(|g| GroupRule::new(&g.regexp, g.title, g.ignore))
        .collect::<std::result::Result<Vec<_>, ConfigError>>()?;

    let name = raw.name.filter(|n| !n.is_empty());
    if let Some(name) = &name {
        validate_template(name, &ReleaseContext::sample())?;
    }

    Ok(ReleaseSettings {
        release_type: raw.release_type.parse()?,
        repository: raw.repository,
        repository_owner: raw.repository_owner,
        draft: raw.draft,
        prerelease: raw.prerelease,
        name,
        release_notes_settings: ReleaseNotesSettings {
            generate: raw.release_notes_settings.generate,
            filename: raw.release_notes_settings.filename.filter(|f| !f.is_empty()),
            groups,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    const SAMPLE: &str = r#"
project = "hugo"

[archive_settings]
binary_dir = "bin"
replacements = { "amd64" = "64bit" }

[[builds]]
path = "unix"
  [[builds.os]]
  goos = "linux"
    [[builds.os.archs]]
    goarch = "amd64"
    [[builds.os.archs]]
    goarch = "arm64"
  [[builds.os]]
  goos = "darwin"
    [[builds.os.archs]]
    goarch = "arm64"

[[builds]]
path = "win"
  [[builds.os]]
  goos = "windows"
    [[builds.os.archs]]
    goarch = "amd64"

[[archives]]
paths = "builds/unix/**"
  [archives.archive_settings]
  extra_files = [{ source_path = "docs/README.md", target_path = "README.md" }, { source_path = "LICENSE" }]

[[archives]]
paths = "builds/win/**"
  [archives.archive_settings]
  type = { format = "zip" }

[[releases]]
paths = "archives/unix/linux/**"
path = "linux"
  [releases.release_settings]
  type = "github"
  repository = "hugo"
  repository_owner = "gohugoio"
  [releases.release_settings.release_notes_settings]
  generate = true
  [[releases.release_settings.release_notes_settings.groups]]
  regexp = "^fix"
  title = "Bug fixes"
  [[releases.release_settings.release_notes_settings.groups]]
  regexp = "snapshot"
  ignore = true
"#;

    #[test]
    fn resolves_build_targets() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let paths: Vec<_> = config.builds.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "unix/linux/amd64",
                "unix/linux/arm64",
                "unix/darwin/arm64",
                "win/windows/amd64"
            ]
        );
        assert_eq!(config.builds[3].binary, "hugo.exe");
        assert_eq!(config.builds[0].binary_path(), "unix/linux/amd64/hugo");
    }

    #[test]
    fn archive_settings_inherit_defaults() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let unix = &config.archives[0];
        assert_eq!(unix.archs.len(), 3);
        assert_eq!(unix.settings.binary_dir, "bin");
        assert_eq!(unix.settings.archive_type.format, ArchiveFormat::TarGz);
        assert_eq!(unix.settings.archive_type.extension, ".tar.gz");
        assert_eq!(unix.settings.extra_files[1].target_path, "LICENSE");
        assert_eq!(unix.settings.replacements.replace("amd64"), "64bit");

        let win = &config.archives[1];
        assert_eq!(win.archs.len(), 1);
        assert_eq!(win.settings.archive_type.format, ArchiveFormat::Zip);
        assert_eq!(win.settings.archive_type.extension, ".zip");
    }

    #[test]
    fn filters_archive_targets_and_releases() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        let filter = compile_pattern("builds/**/arm64").unwrap();
        let matched: Vec<_> = config
            .archive_archs(&filter)
            .map(|(_, arch)| arch.path.clone())
            .collect();
        assert_eq!(matched, ["unix/linux/arm64", "unix/darwin/arm64"]);

        let release = &config.releases[0];
        assert!(release.matches_archive(&config.builds[0]));
        assert!(!release.matches_archive(&config.builds[2]));

        assert_eq!(config.find_releases(&compile_pattern("releases/**").unwrap()).len(), 1);
        assert!(config.find_releases(&compile_pattern("releases/none").unwrap()).is_empty());
    }

    #[test]
    fn release_notes_groups_are_compiled() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let notes = &config.releases[0].settings.release_notes_settings;
        assert!(notes.generate);
        assert_eq!(notes.groups.len(), 2);
        assert!(notes.groups[1].ignore);
        assert!(config.releases[0].settings.validate().is_ok());
    }

    #[test]
    fn conflicting_release_notes_are_rejected_at_load() {
        let doc = r#"
project = "p"
[[releases]]
path = "r"
  [releases.release_settings.release_notes_settings]
  generate = true
  filename = "NOTES.md"
"#;
        let err = Config::from_toml_str(doc).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Config(ConfigError::ConflictingReleaseNotes { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::from_toml_str("project = \"\"").is_err());
        assert!(
            Config::from_toml_str("project = \"p\"\n[archive_settings]\ntype = { format = \"rar\" }")
                .is_err()
        );
        assert!(
            Config::from_toml_str(
                "project = \"p\"\n[[releases]]\npath = \"r\"\n[releases.release_settings.release_notes_settings]\ngroups = [{ regexp = \"(\", title = \"x\" }]"
            )
            .is_err()
        );
        assert!(Config::from_toml_str("project = \"p\"\nunknown = 1").is_err());
    }

    #[test]
    fn unknown_template_variables_are_rejected_at_load() {
        let archive = "project = \"p\"\n[archive_settings]\nname_template = \"{{project}}_{{nope}}\"";
        assert!(matches!(
            Config::from_toml_str(archive).unwrap_err(),
            ReleaseError::Config(ConfigError::InvalidTemplate { .. })
        ));

        let release = "project = \"p\"\n[[releases]]\npath = \"r\"\n[releases.release_settings]\nname = \"{{project}} {{goos}}\"";
        assert!(matches!(
            Config::from_toml_str(release).unwrap_err(),
            ReleaseError::Config(ConfigError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn overlapping_archive_groups_are_rejected() {
        let doc = SAMPLE.replace("paths = \"builds/win/**\"", "paths = \"builds/**/amd64\"");
        let err = Config::from_toml_str(&doc).unwrap_err();
        match err {
            ReleaseError::Config(ConfigError::OverlappingArchives { first, second, path }) => {
                assert_eq!(first, "builds/unix/**");
                assert_eq!(second, "builds/**/amd64");
                assert_eq!(path, "unix/linux/amd64");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
