//! Discount percentage for offered courses

/// Discount of `price` relative to `old_price`, as a whole-percent string
///
/// - `None` unless both prices are positive; the stored value is left alone.
/// - `Some("")` when there is no actual discount, which clears it.
pub fn discount_percentage(price: f64, old_price: f64) -> Option<String> {
    if !(price > 0.0 && old_price > 0.0) {
        return None;
    }

    if old_price > price {
        let percent = ((old_price - price) / old_price * 100.0).round() as i64;
        Some(percent.to_string())
    } else {
        Some(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_regular_discount() {
        assert_eq!(discount_percentage(80.0, 100.0).as_deref(), Some("20"));
        assert_eq!(discount_percentage(199.0, 299.0).as_deref(), Some("33"));
    }

    #[test]
    fn test_rounds_half_up() {
        // 12.5% off
        assert_eq!(discount_percentage(87.5, 100.0).as_deref(), Some("13"));
    }

    #[test]
    fn test_no_discount_clears() {
        assert_eq!(discount_percentage(100.0, 100.0).as_deref(), Some(""));
        assert_eq!(discount_percentage(120.0, 100.0).as_deref(), Some(""));
    }

    #[test]
    fn test_missing_price_leaves_value() {
        assert_eq!(discount_percentage(0.0, 100.0), None);
        assert_eq!(discount_percentage(100.0, 0.0), None);
        assert_eq!(discount_percentage(-5.0, 100.0), None);
        assert_eq!(discount_percentage(f64::NAN, 100.0), None);
    }

    proptest! {
        #[test]
        fn discount_is_a_percentage(price in 0.01f64..10_000.0, old in 0.01f64..10_000.0) {
            let discount = discount_percentage(price, old).unwrap();
            if old > price {
                let n: i64 = discount.parse().unwrap();
                prop_assert!((0..=100).contains(&n));
            } else {
                prop_assert_eq!(discount, "");
            }
        }
    }
}
