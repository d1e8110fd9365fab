//! Quality-control masking.

/// Blank every cell whose flag exceeds the threshold.
///
/// The comparison is strictly greater-than: with the default threshold of 2,
/// flags 1 and 2 survive and 3 and above are blanked. Cells that are already
/// NaN stay NaN.
pub fn apply_qc_mask(values: &[f64], qc_flag: &[f64], threshold: i32) -> Vec<f64> {
    let threshold = threshold as f64;
    values
        .iter()
        .zip(qc_flag)
        .map(|(&v, &flag)| if flag > threshold { f64::NAN } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let flags = [1.0, 2.0, 3.0, 2.5];
        let masked = apply_qc_mask(&values, &flags, 2);
        assert_eq!(masked[0], 1.0);
        assert_eq!(masked[1], 2.0);
        assert!(masked[2].is_nan());
        assert!(masked[3].is_nan());
    }

    #[test]
    fn nan_values_stay_nan() {
        let masked = apply_qc_mask(&[f64::NAN], &[1.0], 2);
        assert!(masked[0].is_nan());
    }
}
