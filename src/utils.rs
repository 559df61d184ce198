use log::debug;

pub fn mask_api_key(key: &str) -> String {
    if key.chars().count() > 5 {
        let prefix: String = key.chars().take(5).collect();
        format!("{}{}", prefix, "*".repeat(key.chars().count() - 5))
    } else {
        key.to_string()
    }
}

/// Ratings always carry a fractional digit, so `4.0` stays `4.0` rather than `4`.
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() && rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

pub fn join_address(lines: &[String]) -> String {
    let joined = lines.join(" ");
    debug!("Joined {} address lines: {}", lines.len(), joined);
    joined
}
