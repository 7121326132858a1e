// src/exec/output.rs

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

/// Output stream shared by every command task.
///
/// Each call writes under one lock and flushes before releasing it, so a
/// tag and its captured output always land as one contiguous block.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

impl Default for SharedWriter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl SharedWriter {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn write_line(&self, line: &str) {
        self.write_block(Some(line), &[]);
    }

    /// Write an optional header line followed by `body`, atomically.
    pub fn write_block(&self, header: Option<&str>, body: &[u8]) {
        let mut w = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = write_parts(&mut **w, header, body) {
            debug!(error = %e, "failed to write to output stream");
        }
    }
}

fn write_parts(w: &mut dyn Write, header: Option<&str>, body: &[u8]) -> std::io::Result<()> {
    if let Some(header) = header {
        w.write_all(header.as_bytes())?;
        w.write_all(b"\n")?;
    }
    w.write_all(body)?;
    w.flush()
}
