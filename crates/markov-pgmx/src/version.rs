//! Format versions.
//!
//! Documents carry a semantic `formatVersion`. Older major versions and
//! any minor version up to the reader's own are readable; patch levels
//! never change the schema.

pub use semver::Version;

/// Version written by [`crate::PgmxWriter::new`].
pub const CURRENT: Version = Version::new(1, 0, 0);

/// Version written by [`crate::PgmxWriter::legacy`].
pub const LEGACY: Version = Version::new(0, 2, 0);

/// Whether a document at `found` can be read.
pub fn is_readable(found: &Version) -> bool {
    found.major < CURRENT.major || (found.major == CURRENT.major && found.minor <= CURRENT.minor)
}

/// Whether documents at `version` carry uncertain values, additional
/// properties and policies.
pub fn has_extensions(version: &Version) -> bool {
    version.major >= 1
}
