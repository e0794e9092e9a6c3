//! Test helpers locating demo data and writing scratch files.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub(super) fn demo_path(name: &str) -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crate lives inside the workspace")
        .join("demos")
        .join(name)
}

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    trailside_fs::write_string(path, contents).expect("write test file");
}

/// A cache snapshot holding one moderate and one unrated trail.
pub(super) const SNAPSHOT: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature",
         "geometry": {"type": "LineString", "coordinates": [[-105.42, 40.01], [-105.43, 40.02]]},
         "properties": {"trailId": 202, "name": "Switzerland Trail", "difficulty-level": "2"}},
        {"type": "Feature",
         "geometry": {"type": "LineString", "coordinates": [[-105.10, 39.60], [-105.12, 39.61]]},
         "properties": {"trailId": 999}}
    ]
}"#;
