//! Ordered close discipline for layered archive writers.
//!
//! An archive is a stack of writers (archive body, compression, output file).
//! Each layer must be closed in order, and a failure in one layer must not stop
//! the remaining layers from being closed. [`CloseChain`] records every step
//! and keeps the first failure.

use std::io;

/// First failure observed while closing an archive
#[derive(Debug)]
pub struct CloseError {
    /// Layer that failed
    pub layer: &'static str,
    /// The underlying I/O error
    pub error: io::Error,
}

/// Accumulates the outcome of sequential close steps
#[derive(Debug, Default)]
pub struct CloseChain {
    first: Option<CloseError>,
}

impl CloseChain {
    /// Record the outcome of closing `layer`
    pub fn step(&mut self, layer: &'static str, result: io::Result<()>) {
        if let Err(error) = result {
            if self.first.is_none() {
                self.first = Some(CloseError { layer, error });
            } else {
                log::debug!("Closing {layer} also failed: {error}");
            }
        }
    }

    /// Finish the chain, returning the first failure
    pub fn finish(self) -> Result<(), CloseError> {
        match self.first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
