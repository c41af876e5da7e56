//! Archive construction protocol.
//!
//! An [`ArchiveRequest`] (settings, output file, ordered entries) is turned into
//! exactly one archive file by an [`ArchiveWriter`]. Writers follow an
//! open/add/finalize lifecycle:
//!
//! - `add_and_close` writes one entry under its archive-relative target path and
//!   always releases the source handle, success or failure
//! - `finalize` closes the archive body, the compression layer and the output
//!   sink in that order, attempting every layer even after a failure
//!
//! Output is written to `<name>.partial` and renamed into place only once the
//! archive was finalized cleanly, so a failed build never leaves a file that
//! looks like a valid archive.
//!
//! Source files are opened through the filesystem, which follows symbolic links:
//! an entry always holds the content of the link target, never the link itself.

mod close;
mod targz;
mod zipfile;

pub use close::{CloseChain, CloseError};
pub use targz::TarGzArchive;
pub use zipfile::ZipArchive;

use crate::config::ArchiveSettings;
use crate::error::{ArchiveError, ErrorExt, ReleaseError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Output sink at the bottom of an archive writer stack
pub trait Sink: Write + Send {
    /// Flush and durably close the sink
    fn close(&mut self) -> io::Result<()>;
}

impl Sink for File {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl<W: Sink> Sink for BufWriter<W> {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.get_mut().close()
    }
}

/// Format-specific archive writer
pub trait ArchiveWriter: Send {
    /// Add `source` to the archive as `target_path`.
    ///
    /// Header fields (size, mode, modification time) come from the source's
    /// metadata; the entry name is always `target_path`. `source` is consumed and
    /// closed when this returns.
    fn add_and_close(&mut self, target_path: &str, source: File) -> io::Result<()>;

    /// Close every layer of the archive in order
    fn finalize(self: Box<Self>) -> std::result::Result<(), CloseError>;
}

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ArchiveFormat {
    /// gzip-compressed tarball
    TarGz,
    /// zip with deflate compression
    Zip,
}

impl ArchiveFormat {
    /// Extension used when the configuration does not override it
    pub fn default_extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => ".tar.gz",
            ArchiveFormat::Zip => ".zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveFormat::TarGz => f.write_str("tar.gz"),
            ArchiveFormat::Zip => f.write_str("zip"),
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "tar.gz" | "tgz" | "targz" => Ok(ArchiveFormat::TarGz),
            "zip" => Ok(ArchiveFormat::Zip),
            other => Err(crate::error::ConfigError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ArchiveFormat {
    type Error = crate::error::ConfigError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// One entry to place into an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    /// Absolute path of the file on disk
    pub source_path_abs: PathBuf,
    /// Archive-relative path, always `/`-separated
    pub target_path: String,
}

/// Unit of work for the archive-construction protocol
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    /// Settings of the archive group this request belongs to
    pub settings: ArchiveSettings,
    /// Final archive path
    pub out_filename: PathBuf,
    /// Entries in archive order; the primary binary comes first
    pub files: Vec<ArchiveFile>,
}

/// Open a writer for `format` on top of `out`
pub fn open_writer(format: ArchiveFormat, out: BufWriter<File>) -> Box<dyn ArchiveWriter> {
    match format {
        ArchiveFormat::TarGz => Box::new(TarGzArchive::new(out)),
        ArchiveFormat::Zip => Box::new(ZipArchive::new(out)),
    }
}

pub(crate) fn ensure_regular_file(metadata: &Metadata, target_path: &str) -> io::Result<()> {
    if metadata.is_file() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("source for '{target_path}' is not a regular file"),
        ))
    }
}

fn partial_path(out: &Path) -> PathBuf {
    let mut name = out.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn add_all(
    writer: &mut dyn ArchiveWriter,
    files: &[ArchiveFile],
    token: &CancellationToken,
) -> Result<()> {
    for file in files {
        if token.is_cancelled() {
            return Err(ReleaseError::Cancelled);
        }

        let source = File::open(&file.source_path_abs)
            .fs_context("opening archive source", &file.source_path_abs)?;

        writer
            .add_and_close(&file.target_path, source)
            .map_err(|error| ArchiveError::AddFailed {
                source_path: file.source_path_abs.clone(),
                target: file.target_path.clone(),
                error,
            })?;
    }
    Ok(())
}

/// Build the archive described by `request` (blocking).
///
/// The writer is always finalized, even when adding an entry failed, and the
/// first failure is returned.
pub fn build_archive(request: &ArchiveRequest, token: &CancellationToken) -> Result<()> {
    if request.files.is_empty() {
        return Err(ArchiveError::EmptyRequest {
            path: request.out_filename.clone(),
        }
        .into());
    }

    let partial = partial_path(&request.out_filename);
    let out = File::create(&partial).fs_context("creating archive", &partial)?;
    let mut writer = open_writer(request.settings.archive_type.format, BufWriter::new(out));

    let added = add_all(writer.as_mut(), &request.files, token);
    let closed = writer.finalize().map_err(|e| {
        ReleaseError::from(ArchiveError::CloseFailed {
            layer: e.layer,
            path: request.out_filename.clone(),
            error: e.error,
        })
    });

    match added.and(closed) {
        Ok(()) => fs::rename(&partial, &request.out_filename)
            .fs_context("moving archive into place", &request.out_filename),
        Err(err) => {
            if let Err(rm_err) = fs::remove_file(&partial) {
                log::warn!(
                    "Failed to remove partial archive {}: {rm_err}",
                    partial.display()
                );
            }
            Err(err)
        }
    }
}

/// Build the archive on the blocking thread pool
pub async fn build(request: ArchiveRequest, token: CancellationToken) -> Result<()> {
    log::debug!(
        "Building {} archive {} with {} file(s)",
        request.settings.archive_type.format,
        request.out_filename.display(),
        request.files.len()
    );
    tokio::task::spawn_blocking(move || build_archive(&request, &token)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArchiveType;

    fn request(dir: &Path, format: ArchiveFormat, files: Vec<ArchiveFile>) -> ArchiveRequest {
        ArchiveRequest {
            settings: ArchiveSettings {
                archive_type: ArchiveType {
                    format,
                    extension: format.default_extension().to_string(),
                },
                ..Default::default()
            },
            out_filename: dir.join(format!("out{}", format.default_extension())),
            files,
        }
    }

    #[test]
    fn format_parsing() {
        assert_eq!("tar.gz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert_eq!(".zip".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
        assert!("rar".parse::<ArchiveFormat>().is_err());
    }

    #[test]
    fn builds_archive_with_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("tool");
        fs::write(&bin, b"binary").unwrap();

        let req = request(
            dir.path(),
            ArchiveFormat::TarGz,
            vec![ArchiveFile {
                source_path_abs: bin,
                target_path: "tool".into(),
            }],
        );
        build_archive(&req, &CancellationToken::new()).unwrap();

        assert!(req.out_filename.exists());
        assert!(!partial_path(&req.out_filename).exists());
    }

    #[test]
    fn failed_build_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("tool");
        fs::write(&bin, b"binary").unwrap();

        let req = request(
            dir.path(),
            ArchiveFormat::Zip,
            vec![
                ArchiveFile {
                    source_path_abs: bin,
                    target_path: "tool".into(),
                },
                ArchiveFile {
                    source_path_abs: dir.path().join("missing.txt"),
                    target_path: "missing.txt".into(),
                },
            ],
        );

        let err = build_archive(&req, &CancellationToken::new()).unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
        assert!(!req.out_filename.exists());
        assert!(!partial_path(&req.out_filename).exists());
    }

    #[test]
    fn empty_request_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), ArchiveFormat::TarGz, vec![]);
        let err = build_archive(&req, &CancellationToken::new()).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Archive(ArchiveError::EmptyRequest { .. })
        ));
    }

    #[test]
    fn cancelled_build_stops_before_adding() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("tool");
        fs::write(&bin, b"binary").unwrap();
        let req = request(
            dir.path(),
            ArchiveFormat::TarGz,
            vec![ArchiveFile {
                source_path_abs: bin,
                target_path: "tool".into(),
            }],
        );

        let token = CancellationToken::new();
        token.cancel();
        let err = build_archive(&req, &token).unwrap_err();
        assert!(matches!(err, ReleaseError::Cancelled));
        assert!(!req.out_filename.exists());
    }
}
