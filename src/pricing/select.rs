//! Winning-offer selection and display ranking.
//!
//! The winner drives the savings math; the ranked list (with its
//! `is_lowest_price` badge) is a display concern. The two diverge when a
//! chain filter is active and that chain's cheapest offer is not the
//! globally cheapest.

use std::cmp::Ordering;

use crate::store::{Id, OfferRow};

use super::dto::RankedOffer;
use super::units::offer_unit_price;

#[derive(Debug, Default)]
pub struct Selection {
    pub winner: Option<OfferRow>,
    pub ranked: Vec<RankedOffer>,
}

fn chain_key(offer: &OfferRow) -> String {
    offer.chain_name.to_lowercase()
}

/// Tie-break chain shared by winner selection and ranking: price_total,
/// case-insensitive chain name, offer id. Keeps repeated calls stable.
fn tie_break(a: &OfferRow, b: &OfferRow) -> Ordering {
    a.price_total
        .total_cmp(&b.price_total)
        .then_with(|| chain_key(a).cmp(&chain_key(b)))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn select(offers: &[OfferRow], preferred_chain_id: Option<Id>) -> Selection {
    if offers.is_empty() {
        return Selection::default();
    }

    // Winner order is by computed unit price, not raw price_total; pack
    // sizes differ.
    let mut by_unit_price: Vec<&OfferRow> = offers.iter().collect();
    by_unit_price.sort_by(|a, b| {
        offer_unit_price(a.price_total, a.pack_size)
            .total_cmp(&offer_unit_price(b.price_total, b.pack_size))
            .then_with(|| tie_break(a, b))
    });
    let global_cheapest_id = by_unit_price[0].id;

    let preferred_present = preferred_chain_id
        .map(|chain| offers.iter().any(|o| o.chain_id == chain))
        .unwrap_or(false);

    let winner = if preferred_present {
        let chain = preferred_chain_id.unwrap_or_default();
        by_unit_price
            .iter()
            .find(|o| o.chain_id == chain)
            .copied()
            .cloned()
    } else {
        Some(by_unit_price[0].clone())
    };

    let mut display: Vec<&OfferRow> = offers.iter().collect();
    display.sort_by(|a, b| {
        if let Some(chain) = preferred_chain_id {
            let a_pref = a.chain_id == chain;
            let b_pref = b.chain_id == chain;
            if a_pref != b_pref {
                // preferred-chain offers sort first
                return if a_pref { Ordering::Less } else { Ordering::Greater };
            }
        }
        tie_break(a, b)
    });

    let ranked = display
        .into_iter()
        .map(|o| {
            let is_lowest_price = if preferred_present {
                o.chain_id == preferred_chain_id.unwrap_or_default()
            } else {
                o.id == global_cheapest_id
            };
            RankedOffer {
                offer_id: o.id,
                price_total: o.price_total,
                pack_size: o.pack_size,
                unit_base: o.unit_base.clone(),
                source: o.source.clone(),
                valid_from: o.valid_from,
                valid_to: o.valid_to,
                chain_id: o.chain_id,
                chain_name: o.chain_name.clone(),
                price_per_unit: offer_unit_price(o.price_total, o.pack_size),
                is_lowest_price,
            }
        })
        .collect();

    Selection { winner, ranked }
}
