//! Test support for the ARGO ingestion crates.
//!
//! - [`fixtures`]: hand-built profiles with known derived values
//! - [`generators`]: parameterised stratified profiles and series
//! - [`paths`]: optional sample files and scratch directories
//!
//! Real ARGO files are not checked in. Tests that need one use
//! [`require_test_file!`] and skip when it is missing.

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use paths::{find_test_file, temp_test_dir_with_prefix, touch_files, TEST_DATA_ENV};

/// Resolve a sample file or return early from the test.
///
/// ```ignore
/// let path = require_test_file!("R2900123_010.nc");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "skipping: sample file {} not found (set {})",
                    $name,
                    $crate::TEST_DATA_ENV
                );
                return;
            }
        }
    };
}

/// `|left - right| <= tolerance`, compared as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right, tolerance) = ($left as f64, $right as f64, $tolerance as f64);
        assert!(
            (left - right).abs() <= tolerance,
            "values differ beyond tolerance: {} vs {} (|diff| = {:e}, tolerance = {:e})",
            left,
            right,
            (left - right).abs(),
            tolerance
        );
    }};
}

/// [`assert_approx_eq!`] over two equally long sequences.
#[macro_export]
macro_rules! assert_seq_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right) = ($left, $right);
        assert_eq!(left.len(), right.len(), "sequence lengths differ");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let (l, r) = (*l as f64, *r as f64);
            assert!(
                (l - r).abs() <= $tolerance as f64,
                "sequences differ at level {}: {} vs {}",
                i,
                l,
                r
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_within_tolerance() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "beyond tolerance")]
    fn test_approx_outside_tolerance() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_seq_approx() {
        assert_seq_approx_eq!(&[5.0, 10.0001], &[5.0, 10.0], 0.001);
    }

    #[test]
    #[should_panic(expected = "differ at level 1")]
    fn test_seq_approx_reports_level() {
        assert_seq_approx_eq!(&[5.0, 11.0], &[5.0, 10.0], 0.001);
    }

    #[test]
    #[should_panic(expected = "sequence lengths differ")]
    fn test_seq_approx_length() {
        assert_seq_approx_eq!(&[1.0], &[1.0, 2.0], 0.001);
    }
}
