//! Plain zip archive writer.

use super::close::{CloseChain, CloseError};
use super::{ArchiveWriter, Sink, ensure_regular_file};
use chrono::{Datelike, Timelike, Utc};
use std::fs::{File, Metadata};
use std::io::{self, Seek};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Streams deflated entries into a zip file
pub struct ZipArchive<W: Sink + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Sink + Seek> ZipArchive<W> {
    /// Open a new archive on top of `out`
    pub fn new(out: W) -> Self {
        Self {
            zip: ZipWriter::new(out),
        }
    }
}

#[cfg(unix)]
fn file_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Source mtime as a zip timestamp (UTC, two-second resolution).
///
/// `None` when the platform has no mtime or it lies outside 1980..=2107.
fn zip_mtime(metadata: &Metadata) -> Option<zip::DateTime> {
    let modified: chrono::DateTime<Utc> = metadata.modified().ok()?.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(modified.year()).ok()?,
        u8::try_from(modified.month()).ok()?,
        u8::try_from(modified.day()).ok()?,
        u8::try_from(modified.hour()).ok()?,
        u8::try_from(modified.minute()).ok()?,
        u8::try_from(modified.second()).ok()?,
    )
    .ok()
}

impl<W: Sink + Seek> ArchiveWriter for ZipArchive<W> {
    fn add_and_close(&mut self, target_path: &str, mut source: File) -> io::Result<()> {
        let metadata = source.metadata()?;
        ensure_regular_file(&metadata, target_path)?;

        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(file_mode(&metadata))
            .large_file(metadata.len() >= u64::from(u32::MAX));
        match zip_mtime(&metadata) {
            Some(mtime) => options = options.last_modified_time(mtime),
            None => log::debug!("No representable mtime for '{target_path}'"),
        }

        self.zip
            .start_file(target_path, options)
            .map_err(io::Error::other)?;
        io::copy(&mut source, &mut self.zip)?;
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<(), CloseError> {
        let mut chain = CloseChain::default();

        // The zip writer owns both the body and the deflate layer; finish() closes them together.
        match self.zip.finish() {
            Ok(mut out) => {
                chain.step("archive body", Ok(()));
                chain.step("output", out.close());
            }
            Err(err) => {
                // The output handle is dropped, and thereby closed, together with the writer.
                chain.step("archive body", Err(io::Error::other(err)));
            }
        }

        chain.finish()
    }
}
