//! Native NetCDF reading using the netcdf library.
//!
//! ARGO core-profile files are NetCDF-3 or NetCDF-4 with variables shaped
//! `(N_PROF)` or `(N_PROF, N_LEVELS)` and character variables shaped
//! `(N_PROF, STRINGn)`. Only the first profile is read.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

use crate::error::{ExtractionError, ExtractionResult};
use crate::source::{mask_fill, ProfileReader, VariableSource, ARGO_FILL_VALUE};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics even when the Rust side
/// handles the error (for example while probing optional attributes). This
/// disables that output by calling H5Eset_auto2 with null handlers. It only
/// needs to run once per process, but is safe to call repeatedly.
///
/// **Important**: call this early in `main()`, before any NetCDF operation.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// An open NetCDF file exposed as a [`VariableSource`].
pub struct NetcdfSource {
    path: PathBuf,
    file: netcdf::File,
}

impl NetcdfSource {
    pub fn open(path: &Path) -> ExtractionResult<Self> {
        silence_hdf5_errors();

        if !path.is_file() {
            return Err(ExtractionError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a file", path.display()),
            )));
        }

        let file = netcdf::open(path).map_err(|e| ExtractionError::Open(e.to_string()))?;
        debug!(path = %path.display(), "Opened NetCDF file");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(name: &str, e: impl std::fmt::Display) -> ExtractionError {
        ExtractionError::Read {
            variable: name.to_string(),
            message: e.to_string(),
        }
    }
}

impl VariableSource for NetcdfSource {
    fn first_profile_values(&self, name: &str) -> ExtractionResult<Option<Vec<f64>>> {
        let Some(var) = self.file.variable(name) else {
            return Ok(None);
        };

        let row_len = first_profile_len(&var);
        let fill = get_f64_attr(&var, "_FillValue").unwrap_or(ARGO_FILL_VALUE);

        // Read all extents; core-profile files hold a handful of profiles at most.
        let values: Vec<f64> = var
            .get_values::<f64, _>(..)
            .map_err(|e| Self::read_error(name, e))?;

        Ok(Some(
            values
                .into_iter()
                .take(row_len)
                .map(|v| mask_fill(v, fill))
                .collect(),
        ))
    }

    fn first_profile_chars(&self, name: &str) -> ExtractionResult<Option<Vec<u8>>> {
        let Some(var) = self.file.variable(name) else {
            return Ok(None);
        };

        let total: usize = var.dimensions().iter().map(|d| d.len()).product();
        let mut buf = vec![0_u8; total];
        var.get_raw_values_into(&mut buf, ..)
            .map_err(|e| Self::read_error(name, e))?;

        buf.truncate(first_profile_len(&var));
        Ok(Some(buf))
    }
}

/// Opens ARGO files from disk with the native library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfReader;

impl ProfileReader for NetcdfReader {
    fn open(&self, path: &Path) -> ExtractionResult<Box<dyn VariableSource>> {
        Ok(Box::new(NetcdfSource::open(path)?))
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Number of elements belonging to one index of the leading dimension.
fn first_profile_len(var: &netcdf::Variable) -> usize {
    var.dimensions().iter().skip(1).map(|d| d.len()).product()
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get an attribute as f64, whatever its stored numeric type.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    match attr_value {
        netcdf::AttributeValue::Double(v) => Some(v),
        netcdf::AttributeValue::Float(v) => Some(v as f64),
        netcdf::AttributeValue::Int(v) => Some(v as f64),
        netcdf::AttributeValue::Short(v) => Some(v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = NetcdfSource::open(Path::new("/nonexistent/R2900123_010.nc"))
            .err()
            .unwrap();
        assert!(matches!(err, ExtractionError::IoError(_)));
    }

    #[test]
    fn test_garbage_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.nc");
        std::fs::write(&path, b"not a netcdf file").unwrap();

        let err = NetcdfReader.open(&path).err().unwrap();
        assert!(matches!(err, ExtractionError::Open(_)));
    }
}
