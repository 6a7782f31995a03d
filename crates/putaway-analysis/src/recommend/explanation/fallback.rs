//! Fixed texts that never fail.

use putaway_core::constants::ESTABLISHED_PATTERN_PCT;

/// Used whenever the explanation generator cannot produce text.
pub fn fallback_explanation(slot: &str, usage_percentage: f64) -> String {
    if usage_percentage >= ESTABLISHED_PATTERN_PCT {
        format!(
            "Location {slot} is recommended as it follows the established pattern for this part. \
             The location is currently FREE and ready for immediate use."
        )
    } else {
        format!(
            "Location {slot} is recommended based on historical usage patterns. \
             The location is currently FREE and available for use."
        )
    }
}

fn zone_text(zone: Option<&str>) -> String {
    match zone {
        Some(z) if !z.is_empty() => format!("Zone {z}"),
        _ => "any available zone".to_string(),
    }
}

pub fn no_history_guidance(zone: Option<&str>) -> String {
    format!(
        "No historical putaway data available. Consult your supervisor for placement guidance and consider {}.",
        zone_text(zone)
    )
}

pub fn all_occupied_guidance(zone: Option<&str>) -> String {
    format!(
        "All historical locations are occupied. Consult your supervisor and look for a free location in {}.",
        zone_text(zone)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_wording_by_share() {
        let strong = fallback_explanation("TN52D", 30.0);
        assert!(strong.contains("follows the established pattern"));
        assert!(strong.starts_with("Location TN52D"));

        let weak = fallback_explanation("TN52D", 29.99);
        assert!(weak.contains("based on historical usage patterns"));
    }

    #[test]
    fn test_guidance_mentions_zone() {
        assert!(no_history_guidance(Some("T")).contains("Zone T"));
        assert!(no_history_guidance(None).contains("any available zone"));
        assert!(all_occupied_guidance(Some("H")).ends_with("in Zone H."));
    }
}
