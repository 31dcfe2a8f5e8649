use log::debug;

use crate::error::{BinningError, Result};

/// Compute `(min, max)` over a column in one pass.
///
/// Missing values (`None`) and NaN are skipped. Fails with
/// [`BinningError::EmptyRange`] if nothing usable is left.
pub fn scan_range<I>(values: I) -> Result<(f64, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut range: Option<(f64, f64)> = None;
    let mut skipped = 0usize;

    for value in values {
        match value {
            Some(v) if !v.is_nan() => {
                range = Some(match range {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
            _ => skipped += 1,
        }
    }

    let (lo, hi) = range.ok_or(BinningError::EmptyRange)?;
    debug!("scanned range [{lo}, {hi}], skipped {skipped} missing values");
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_min_and_max() {
        let values = vec![Some(3.0), Some(-1.5), Some(9.0), Some(0.0)];
        assert_eq!(scan_range(values).unwrap(), (-1.5, 9.0));
    }

    #[test]
    fn skips_missing_and_nan() {
        let values = vec![None, Some(f64::NAN), Some(4.0), None, Some(2.0)];
        assert_eq!(scan_range(values).unwrap(), (2.0, 4.0));
    }

    #[test]
    fn negative_only_values_keep_a_negative_max() {
        let values = vec![Some(-5.0), Some(-2.0)];
        assert_eq!(scan_range(values).unwrap(), (-5.0, -2.0));
    }

    #[test]
    fn empty_or_all_missing_is_an_error() {
        assert!(matches!(
            scan_range(Vec::<Option<f64>>::new()),
            Err(BinningError::EmptyRange)
        ));
        assert!(matches!(
            scan_range(vec![None, Some(f64::NAN)]),
            Err(BinningError::EmptyRange)
        ));
    }
}
