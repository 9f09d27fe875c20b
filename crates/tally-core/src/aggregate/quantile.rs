use crate::error::Error;

/// Reject quantile fractions outside `[0, 1]` (NaN included).
pub(crate) fn validate_quantile(p: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidQuantile { p })
    }
}

/// Linear-interpolated quantile of an ascending slice.
///
/// Position `p * (n - 1)` is interpolated between its neighbouring order
/// statistics. Returns `None` on an empty slice.
#[must_use]
#[expect(clippy::cast_precision_loss)]
#[expect(clippy::cast_possible_truncation)]
#[expect(clippy::cast_sign_loss)]
pub fn quantile_linear_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            if lo == hi {
                return Some(sorted[lo]);
            }

            let t = pos - lo as f64;
            Some((1.0 - t).mul_add(sorted[lo], t * sorted[hi]))
        }
    }
}

/// Linear-interpolated quantile of unsorted values.
#[must_use]
pub fn quantile_linear(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    quantile_linear_sorted(&sorted, p)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_odd_length_is_the_middle_element() {
        assert_eq!(quantile_linear(&[9.0, 1.0, 5.0, 3.0, 7.0], 0.5), Some(5.0));
    }

    #[test]
    fn interpolates_between_neighbours() {
        let sorted = [10.0, 20.0, 30.0, 40.0];

        assert_eq!(quantile_linear_sorted(&sorted, 0.0), Some(10.0));
        assert_eq!(quantile_linear_sorted(&sorted, 1.0), Some(40.0));
        let q = quantile_linear_sorted(&sorted, 0.8).expect("non-empty");
        assert!((q - 34.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_no_quantile() {
        assert_eq!(quantile_linear(&[], 0.5), None);
    }

    #[test]
    fn validation_rejects_out_of_range_fractions() {
        assert!(validate_quantile(0.0).is_ok());
        assert!(validate_quantile(1.0).is_ok());
        for p in [1.5, -0.1, f64::NAN] {
            assert!(matches!(
                validate_quantile(p),
                Err(Error::InvalidQuantile { .. })
            ));
        }
    }
}
