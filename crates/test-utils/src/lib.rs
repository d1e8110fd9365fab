//! Shared test utilities for the ceilo-quicklook workspace.
//!
//! Provides synthetic ceilometer datasets written through the classic-format
//! builder, so integration tests never depend on external data files.

pub mod fixtures;

pub use fixtures::*;

/// Assert that two floats agree within a tolerance.
///
/// # Usage
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(0.1 + 0.2, 0.3, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tol:expr) => {{
        let (left, right, tol) = ($left as f64, $right as f64, $tol as f64);
        assert!(
            (left - right).abs() <= tol,
            "assertion failed: |{} - {}| > {}",
            left,
            right,
            tol
        );
    }};
}
