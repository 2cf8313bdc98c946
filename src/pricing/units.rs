//! Per-unit price normalization and unit-family conversions.

/// Guard divisor; ingestion already defaults pack_size to 1.0 when absent
/// or non-positive, so this only protects against bad legacy rows.
const MIN_PACK_SIZE: f64 = 1e-9;

pub fn offer_unit_price(price_total: f64, pack_size: f64) -> f64 {
    price_total / pack_size.max(MIN_PACK_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitFamily {
    Mass,
    Volume,
    Count,
}

/// base units: g, ml, stück
fn classify(unit: &str) -> Option<(UnitFamily, f64)> {
    match unit.trim().to_lowercase().as_str() {
        "g" => Some((UnitFamily::Mass, 1.0)),
        "kg" => Some((UnitFamily::Mass, 1000.0)),
        "ml" => Some((UnitFamily::Volume, 1.0)),
        "l" => Some((UnitFamily::Volume, 1000.0)),
        "stück" | "st" => Some((UnitFamily::Count, 1.0)),
        _ => None,
    }
}

/// Converts a quantity between compatible units. Returns `None` for
/// cross-family pairs or unrecognized unit strings; callers must omit the
/// comparison instead of substituting a number.
pub fn convert(qty: f64, from_unit: &str, to_unit: &str) -> Option<f64> {
    let from = from_unit.trim();
    let to = to_unit.trim();
    if from.eq_ignore_ascii_case(to) {
        return Some(qty);
    }
    let (from_family, from_factor) = classify(from)?;
    let (to_family, to_factor) = classify(to)?;
    if from_family != to_family {
        return None;
    }
    Some(qty * from_factor / to_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_price_divides_by_pack_size() {
        assert_eq!(offer_unit_price(3.0, 2.0), 1.5);
        assert_eq!(offer_unit_price(2.5, 1.0), 2.5);
    }

    #[test]
    fn unit_price_survives_zero_pack_size() {
        let p = offer_unit_price(1.0, 0.0);
        assert!(p.is_finite());
    }

    #[test]
    fn identity_conversion() {
        assert_eq!(convert(250.0, "g", "g"), Some(250.0));
        assert_eq!(convert(3.0, "Stück", "stück"), Some(3.0));
    }

    #[test]
    fn mass_and_volume_factors() {
        assert_eq!(convert(1500.0, "g", "kg"), Some(1.5));
        assert_eq!(convert(2.0, "kg", "g"), Some(2000.0));
        assert_eq!(convert(500.0, "ml", "l"), Some(0.5));
        assert_eq!(convert(0.75, "l", "ml"), Some(750.0));
    }

    #[test]
    fn count_units_are_interchangeable() {
        assert_eq!(convert(4.0, "st", "stück"), Some(4.0));
        assert_eq!(convert(4.0, "stück", "st"), Some(4.0));
    }

    #[test]
    fn cross_family_is_not_convertible() {
        assert_eq!(convert(1.0, "g", "ml"), None);
        assert_eq!(convert(1.0, "kg", "l"), None);
        assert_eq!(convert(1.0, "st", "g"), None);
    }

    #[test]
    fn unknown_units_are_not_convertible() {
        assert_eq!(convert(1.0, "cup", "g"), None);
        assert_eq!(convert(1.0, "g", "oz"), None);
    }
}
