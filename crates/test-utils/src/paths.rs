//! Locating optional ARGO sample files and scratch directories.

use std::path::{Path, PathBuf};

/// Environment variable naming an extra directory of ARGO sample files.
pub const TEST_DATA_ENV: &str = "TEST_DATA_DIR";

/// Sample-file directories relative to the workspace root, in lookup order.
const SAMPLE_DIRS: &[&str] = &["crates/netcdf-parser/testdata", "testdata"];

fn workspace_root() -> PathBuf {
    // crates/test-utils -> workspace root
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .unwrap_or(manifest)
        .to_path_buf()
}

/// Look up an ARGO sample file by name.
///
/// `$TEST_DATA_DIR` wins over the directories checked into the workspace.
/// Sample files are large and usually absent, so callers skip when this
/// returns `None` (see [`require_test_file!`](crate::require_test_file)).
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    let env_dir = std::env::var_os(TEST_DATA_ENV).map(PathBuf::from);

    env_dir
        .into_iter()
        .chain(SAMPLE_DIRS.iter().map(|dir| root.join(dir)))
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// Scratch directory removed on drop; the prefix shows up in leaked paths.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Create empty placeholder files in `dir`.
///
/// Directory ingestion only needs the names on disk; contents come from an
/// in-memory reader keyed by file name.
pub fn touch_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").expect("Failed to create placeholder file");
            path
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_holds_manifest() {
        assert!(workspace_root().join("Cargo.toml").is_file());
        assert!(workspace_root().join("crates/test-utils").is_dir());
    }

    #[test]
    fn test_unknown_sample_is_none() {
        assert_eq!(find_test_file("R0000000_000_missing.nc"), None);
    }

    #[test]
    fn test_touch_files_in_prefixed_dir() {
        let dir = temp_test_dir_with_prefix("argo_ingest_");
        assert!(dir.path().to_string_lossy().contains("argo_ingest_"));

        let paths = touch_files(dir.path(), &["R1_001.nc", "R1_002.nc"]);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.is_file()));
        assert_eq!(std::fs::metadata(&paths[0]).map(|m| m.len()).ok(), Some(0));
    }
}
