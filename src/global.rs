//! Process-wide convenience searcher.
//!
//! For programs that want one shared engine instead of threading a
//! [`Searcher`] value around. The cell is initialized exactly once and is
//! immutable after construction; lookups serialize on an internal lock.

use std::path::Path;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::version::Version;
use crate::xdb::Searcher;

static GLOBAL_SEARCHER: OnceCell<Mutex<Searcher>> = OnceCell::new();

/// Initialize the global searcher from a database file.
///
/// Call once at startup. A second call fails with
/// [`Error::AlreadyInitialized`].
pub fn init_global<P: AsRef<Path>>(version: Version, path: P) -> Result<()> {
    let searcher = Searcher::open(version, path)?;
    GLOBAL_SEARCHER
        .set(Mutex::new(searcher))
        .map_err(|_| Error::AlreadyInitialized)?;
    log::debug!("global {} searcher initialized", version);
    Ok(())
}

/// Initialize the global searcher from full database content.
pub fn init_global_from_buffer(version: Version, content: Vec<u8>) -> Result<()> {
    let searcher = Searcher::open_with_buffer(version, content)?;
    GLOBAL_SEARCHER
        .set(Mutex::new(searcher))
        .map_err(|_| Error::AlreadyInitialized)?;
    log::debug!("global {} searcher initialized from buffer", version);
    Ok(())
}

/// Check whether the global searcher has been initialized.
pub fn is_global_initialized() -> bool {
    GLOBAL_SEARCHER.get().is_some()
}

/// Look up the region payload for an IP address via the global searcher.
///
/// Fails with [`Error::NotInitialized`] before [`init_global`] has run.
pub fn lookup(text: &str) -> Result<Vec<u8>> {
    let searcher = GLOBAL_SEARCHER.get().ok_or(Error::NotInitialized)?;
    searcher.lock().search(text)
}
