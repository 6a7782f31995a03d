//! Pattern extraction: per-part aggregation and confidence scoring.

pub mod aggregation;
pub mod confidence;

/// Round to two decimals, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(5.660377), 5.66);
        assert_eq!(round2(0.2085), 0.21);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(200.0 / 3.0), 66.67);
    }
}
