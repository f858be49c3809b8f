use super::domain::ReviewerId;

/// Largest float that still converts to a `u64` without saturating.
const MAX_EXACT_ID: f64 = 18_446_744_073_709_549_568.0;

/// Interprets a table cell as a reviewer id if it is effectively an integer.
///
/// Accepts plain digits, digits followed by a zero fraction (`138590.0`),
/// integral scientific notation (`1.3859E+05`) and thousands separators
/// (`138,590`). Anything else yields `None`.
pub fn normalize_reviewer_id(value: &str) -> Option<ReviewerId> {
    let trimmed = value.trim().trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = trimmed.replace(',', "");

    if let Some(id) = parse_integer_with_zero_fraction(&cleaned) {
        return Some(ReviewerId(id));
    }

    let float = cleaned.parse::<f64>().ok()?;
    if !float.is_finite() || float.fract() != 0.0 || float < 0.0 || float > MAX_EXACT_ID {
        return None;
    }

    Some(ReviewerId(float as u64))
}

fn parse_integer_with_zero_fraction(value: &str) -> Option<u64> {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
            return None;
        }
    }

    whole.parse().ok()
}
