//! Dish-level savings aggregation over already-selected winners.

use crate::store::Id;

use super::dto::DishPricing;

/// Slim per-ingredient input for the dish totals: the baseline unit price
/// (when the catalog has one) and the winning offer's unit price (when a
/// valid offer exists).
#[derive(Debug, Clone, Copy)]
pub struct IngredientPricing {
    pub price_baseline_per_unit: Option<f64>,
    pub offer_price_per_unit: Option<f64>,
}

/// Clamped per-unit savings. An offer above baseline still counts as "on
/// offer" but contributes zero, never negative.
pub fn savings_per_unit(
    baseline: Option<f64>,
    offer_price_per_unit: Option<f64>,
) -> Option<f64> {
    match (baseline, offer_price_per_unit) {
        (Some(b), Some(o)) => Some((b - o).max(0.0)),
        _ => None,
    }
}

/// Folds per-ingredient figures into the dish totals. Required and optional
/// ingredients are treated alike; nothing is scaled by recipe quantity.
pub fn aggregate(dish_id: Id, rows: &[IngredientPricing]) -> DishPricing {
    let mut total = 0.0;
    let mut with_savings = 0;
    let mut with_offers = 0;

    for row in rows {
        let has_offer = row.offer_price_per_unit.is_some();
        if has_offer {
            with_offers += 1;
        }
        if let Some(s) = savings_per_unit(row.price_baseline_per_unit, row.offer_price_per_unit) {
            if s > 0.0 {
                total += s;
                with_savings += 1;
            }
        }
    }

    DishPricing {
        dish_id,
        total_aggregated_savings: total,
        ingredients_with_offers_count: with_savings,
        available_offers_count: with_offers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(baseline: Option<f64>, offer: Option<f64>) -> IngredientPricing {
        IngredientPricing {
            price_baseline_per_unit: baseline,
            offer_price_per_unit: offer,
        }
    }

    #[test]
    fn savings_is_baseline_minus_offer() {
        // tomatoes: baseline 2.00/kg, offer 3.00 for a 2kg pack = 1.50/kg
        assert_eq!(savings_per_unit(Some(2.0), Some(1.5)), Some(0.5));
    }

    #[test]
    fn savings_never_negative() {
        assert_eq!(savings_per_unit(Some(2.0), Some(2.5)), Some(0.0));
        assert_eq!(savings_per_unit(Some(2.0), Some(100.0)), Some(0.0));
    }

    #[test]
    fn savings_needs_both_sides() {
        assert_eq!(savings_per_unit(None, Some(1.0)), None);
        assert_eq!(savings_per_unit(Some(2.0), None), None);
    }

    #[test]
    fn totals_sum_only_positive_savings() {
        // one ingredient saves 0.50, one has no offer
        let p = aggregate(7, &[row(Some(2.0), Some(1.5)), row(Some(3.0), None)]);
        assert_eq!(p.dish_id, 7);
        assert_eq!(p.total_aggregated_savings, 0.5);
        assert_eq!(p.ingredients_with_offers_count, 1);
        assert_eq!(p.available_offers_count, 1);
    }

    #[test]
    fn above_baseline_offer_counts_as_available_only() {
        let p = aggregate(7, &[row(Some(2.0), Some(2.5))]);
        assert_eq!(p.total_aggregated_savings, 0.0);
        assert_eq!(p.ingredients_with_offers_count, 0);
        assert_eq!(p.available_offers_count, 1);
    }

    #[test]
    fn total_matches_exact_sum_across_ingredients() {
        let rows = [
            row(Some(2.0), Some(1.5)),  // +0.50
            row(Some(1.0), Some(0.75)), // +0.25
            row(Some(1.0), Some(1.2)),  // clamped to 0
            row(None, Some(0.5)),       // no baseline, no savings
        ];
        let p = aggregate(1, &rows);
        assert!((p.total_aggregated_savings - 0.75).abs() < 1e-12);
        assert_eq!(p.ingredients_with_offers_count, 2);
        assert_eq!(p.available_offers_count, 4);
    }

    #[test]
    fn empty_dish_is_all_zero() {
        let p = aggregate(1, &[]);
        assert_eq!(p.total_aggregated_savings, 0.0);
        assert_eq!(p.ingredients_with_offers_count, 0);
        assert_eq!(p.available_offers_count, 0);
    }
}
