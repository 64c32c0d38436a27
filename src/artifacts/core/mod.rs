//! Core utilities and shared types
//!
//! This module contains shared utilities used across the application.

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Whether long output should go through the pager
///
/// Paging only makes sense on an interactive terminal; redirected or piped
/// stdout gets the raw stream. Setting `NO_PAGER` turns paging off
/// everywhere.
pub fn wants_paging() -> bool {
    std::env::var_os("NO_PAGER").is_none() && std::io::stdout().is_terminal()
}

/// Wrapper that implements `Write` for the minus pager
///
/// The minus pager doesn't implement `std::io::Write` directly, so this
/// wrapper adapts it to the standard I/O traits. History listings hand it to
/// the repository as a drop-in replacement for stdout, and the binary pages
/// the collected output once the command finishes.
///
/// ## Usage
///
/// ```ignore
/// let pager = Pager::new();
/// let mut writer = PagerWriter::new(pager.clone());
/// writeln!(writer, "Some long output...")?;
/// page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
