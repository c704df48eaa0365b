//! File discovery and metadata from ARGO file names.
//!
//! Core-profile files follow `<mode><platform>_<cycle>[D].nc`, for example
//! `R2900123_010.nc` (real-time) or `D5904471_101D.nc` (delayed mode,
//! descending profile).

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

/// Processing stage of the data in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataMode {
    #[serde(rename = "R")]
    RealTime,
    #[serde(rename = "D")]
    Delayed,
}

/// Information encoded in an ARGO file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgoFileInfo {
    pub data_mode: DataMode,
    pub platform_number: String,
    pub cycle_number: i32,
    pub descending: bool,
}

/// Parse an ARGO core-profile file name. Returns `None` for other names.
pub fn parse_argo_filename(filename: &str) -> Option<ArgoFileInfo> {
    let stem = filename.strip_suffix(".nc")?;

    let mut chars = stem.chars();
    let data_mode = match chars.next()? {
        'R' => DataMode::RealTime,
        'D' => DataMode::Delayed,
        _ => return None,
    };

    let (platform, cycle) = chars.as_str().split_once('_')?;
    if platform.is_empty() || !platform.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (cycle, descending) = match cycle.strip_suffix('D') {
        Some(c) => (c, true),
        None => (cycle, false),
    };
    if cycle.is_empty() || !cycle.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(ArgoFileInfo {
        data_mode,
        platform_number: platform.to_string(),
        cycle_number: cycle.parse().ok()?,
        descending,
    })
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}

/// Regular files with the given extension directly inside `dir`, sorted by name.
pub fn list_profile_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
