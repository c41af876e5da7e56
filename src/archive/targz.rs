//! tar+gzip archive writer.

use super::close::{CloseChain, CloseError};
use super::{ArchiveWriter, Sink, ensure_regular_file};
use flate2::{Compression, write::GzEncoder};
use std::fs::File;
use std::io;
use tar::HeaderMode;

/// Streams entries into a gzip-compressed tarball
pub struct TarGzArchive<W: Sink> {
    tar: tar::Builder<GzEncoder<W>>,
}

impl<W: Sink> TarGzArchive<W> {
    /// Open a new archive on top of `out`
    pub fn new(out: W) -> Self {
        let gz = GzEncoder::new(out, Compression::best());
        Self {
            tar: tar::Builder::new(gz),
        }
    }
}

impl<W: Sink> ArchiveWriter for TarGzArchive<W> {
    fn add_and_close(&mut self, target_path: &str, mut source: File) -> io::Result<()> {
        // Metadata comes from the open handle, so symlinks are already resolved.
        let metadata = source.metadata()?;
        ensure_regular_file(&metadata, target_path)?;

        let mut header = tar::Header::new_gnu();
        header.set_metadata_in_mode(&metadata, HeaderMode::Complete);
        self.tar.append_data(&mut header, target_path, &mut source)
    }

    fn finalize(self: Box<Self>) -> Result<(), CloseError> {
        let mut chain = CloseChain::default();
        let mut tar = self.tar;

        chain.step("archive body", tar.finish());

        // finish() marks the builder finished even on failure, so this only hands back the encoder.
        let mut gz = match tar.into_inner() {
            Ok(gz) => gz,
            Err(err) => {
                chain.step("compression", Err(err));
                return chain.finish();
            }
        };

        chain.step("compression", gz.try_finish());
        chain.step("output", gz.get_mut().close());
        chain.finish()
    }
}
