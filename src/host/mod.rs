//! The build host the coordinator drives.
//!
//! A host performs rebuilds on its own schedule. The coordinator can only ask
//! it to suspend or resume starting new rebuilds, ask it to rescan sources,
//! and poll whether a rebuild is running. The coordinator re-derives the lock
//! from the persisted flags on every start and never trusts what the host
//! remembers. In-editor hosts forget their lock across restarts;
//! [`DirectoryHost`] keeps its marker, so the CLI clears it when the flags
//! cannot be read.
//!
//! [`DirectoryHost`] talks to a host through marker files in a directory.

mod directory;
mod metadata;

pub use directory::{BUILDING_MARKER, DirectoryHost, LOCK_MARKER, RESCAN_REQUEST};
pub use metadata::MarkerMetadata;
pub(crate) use metadata::owner_string;

use crate::error::Result;

/// Operations the coordinator needs from a build host.
///
/// Any method may fail with
/// [`BuildLockError::HostUnavailable`](crate::error::BuildLockError::HostUnavailable);
/// the coordinator treats a failed call as "not done yet".
pub trait BuildHost {
    /// Prevent the host from starting new rebuilds.
    fn lock_builds(&mut self) -> Result<()>;

    /// Allow the host to start rebuilds again.
    fn unlock_builds(&mut self) -> Result<()>;

    /// Whether a rebuild is running right now.
    fn is_building(&self) -> Result<bool>;

    /// Ask the host to rescan sources, which normally triggers a rebuild.
    fn request_rebuild_scan(&mut self) -> Result<()>;
}

impl<H: BuildHost + ?Sized> BuildHost for Box<H> {
    fn lock_builds(&mut self) -> Result<()> {
        (**self).lock_builds()
    }

    fn unlock_builds(&mut self) -> Result<()> {
        (**self).unlock_builds()
    }

    fn is_building(&self) -> Result<bool> {
        (**self).is_building()
    }

    fn request_rebuild_scan(&mut self) -> Result<()> {
        (**self).request_rebuild_scan()
    }
}
