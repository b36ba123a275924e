pub(crate) mod dir;
pub(crate) mod memory;
pub(crate) mod staging;

use crate::foundation::error::RadarResult;

/// Where overlay and sweep rasters come from.
///
/// Implementations own sessions, authentication, and directory navigation; the build only
/// sees name strings and raw bytes. Failures should be reported as
/// [`RadarError::Retrieval`](crate::RadarError::Retrieval).
pub trait AssetSource {
    /// List the file names available in `dir`.
    fn list_names(&mut self, dir: &str) -> RadarResult<Vec<String>>;
    /// Fetch the full contents of `name` inside `dir`.
    fn fetch_bytes(&mut self, dir: &str, name: &str) -> RadarResult<Vec<u8>>;
}
