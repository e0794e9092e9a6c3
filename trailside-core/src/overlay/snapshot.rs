//! The SDK's on-disk snapshot of every cached trail path.

use camino::{Utf8Path, Utf8PathBuf};
use geojson::{FeatureCollection, GeoJson};

use super::OverlayError;

/// Directory below the SDK library directory holding cache files.
pub const CACHE_FILES_DIR: &str = "Files";
/// Snapshot file name.
pub const TRAIL_PATHS_CACHE_FILE: &str = "accuterra-all-trail-paths-cache.json";

/// Location of the snapshot below `library_dir`.
pub fn snapshot_path(library_dir: &Utf8Path) -> Utf8PathBuf {
    library_dir
        .join(CACHE_FILES_DIR)
        .join(TRAIL_PATHS_CACHE_FILE)
}

/// Load the snapshot, or `None` when it has not been written.
pub(super) fn load(path: &Utf8Path) -> Result<Option<FeatureCollection>, OverlayError> {
    let Some(raw) =
        trailside_fs::read_if_present(path).map_err(|source| OverlayError::ReadSnapshot {
            path: path.to_owned(),
            source,
        })?
    else {
        return Ok(None);
    };
    match raw.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(collection)) => Ok(Some(collection)),
        Ok(_) => Err(OverlayError::SnapshotNotCollection {
            path: path.to_owned(),
        }),
        Err(source) => Err(OverlayError::ParseSnapshot {
            path: path.to_owned(),
            source: Box::new(source),
        }),
    }
}
