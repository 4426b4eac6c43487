//! # Pricing Calculator
//!
//! Pure cart pricing: line items + membership + redeemed points → quote.
//!
//! ## Why Purity Matters Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Preview / Recompute Contract                     │
//! │                                                                     │
//! │  UI cart ──► price_cart(...) ──► preview shown to customer          │
//! │                    │                                                │
//! │                    │  identical inputs MUST produce                 │
//! │                    │  bit-identical output                          │
//! │                    ▼                                                │
//! │  Settlement engine ──► price_cart(...) ──► authoritative amounts    │
//! │                                                                     │
//! │  The server never trusts client totals; it reruns this function     │
//! │  against authoritative customer/membership data. Any divergence     │
//! │  between preview and recompute is a discrepancy/fraud signal.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pipeline
//! 1. subtotal = Σ(unit_price × quantity), exact integer cents
//! 2. membership discount = subtotal × discount_bps
//! 3. point redemption clamped to min(requested, balance, subtotal)
//! 4. discount = membership discount + point value
//! 5. taxable = subtotal − discount (error if negative)
//! 6. tax = taxable × tax rate
//! 7. total = taxable + tax
//! 8. points earned = floor(total × 1%), whole points
//!
//! Rounding happens only inside `Money::scale_bps` (half-up at cent
//! resolution); sums and differences are exact, so there is no
//! cumulative drift.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, Membership, TaxRate};
use crate::validation;
use crate::{CENTS_PER_POINT, LOYALTY_EARN_RATE_BPS};

// =============================================================================
// Input / Output
// =============================================================================

/// Inputs to the pricing calculator.
///
/// `membership` must already be the customer's *active* membership (the
/// settlement engine filters by window when loading); the calculator
/// itself consults no clock.
#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    /// Ordered cart line items.
    pub line_items: &'a [LineItem],

    /// Active membership, if the customer holds one.
    pub membership: Option<&'a Membership>,

    /// The customer's current redeemable point balance.
    pub available_points: i64,

    /// Points the customer asked to redeem (clamped, never rejected).
    pub requested_points: i64,

    /// Store-configured tax rate.
    pub tax_rate: TaxRate,
}

/// A fully-priced cart.
///
/// Invariant: `total == subtotal - discount + tax`, all in exact cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    pub subtotal: Money,
    /// Membership portion of the discount.
    pub membership_discount: Money,
    /// Points actually redeemed after clamping (whole points).
    pub points_redeemed: i64,
    /// Total discount: membership + point value.
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    /// Whole points earned on this settlement.
    pub points_earned: i64,
}

// =============================================================================
// Calculator
// =============================================================================

/// Prices a cart. Pure and deterministic: no I/O, no clock, no randomness.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] - no line items
/// - [`CoreError::InvalidLineItem`] - negative price or quantity < 1
/// - [`CoreError::DiscountExceedsSubtotal`] - combined discount exceeds
///   the subtotal (over-discount is a pricing bug upstream, not a clamp)
/// - [`CoreError::AmountOverflow`] - amounts left the representable range
pub fn price_cart(input: &PricingInput<'_>) -> CoreResult<PriceQuote> {
    validation::validate_cart_size(input.line_items.len())?;
    validation::validate_points_to_redeem(input.requested_points)?;
    validation::validate_tax_rate_bps(input.tax_rate.bps())?;

    if input.line_items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    // 1. Subtotal: exact integer sum, no item-level rounding.
    let mut subtotal = Money::zero();
    for (index, item) in input.line_items.iter().enumerate() {
        check_line_item(index, item)?;

        let line_total = item.total().ok_or(CoreError::AmountOverflow {
            context: "line total",
        })?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or(CoreError::AmountOverflow {
                context: "subtotal",
            })?;
    }

    // 2. Membership discount.
    let membership_discount = match input.membership {
        Some(membership) => {
            validation::validate_discount_bps(membership.discount_bps)?;
            subtotal.scale_bps(membership.discount_bps)
        }
        None => Money::zero(),
    };

    // 3. Clamp point redemption: 1 point = 1 currency unit, never more
    //    than the balance and never more than the subtotal.
    let points_redeemed = input
        .requested_points
        .min(input.available_points.max(0))
        .min(subtotal.units());

    // 4. Total discount.
    let point_value = Money::from_cents(points_redeemed * CENTS_PER_POINT);
    let discount = membership_discount
        .checked_add(point_value)
        .ok_or(CoreError::AmountOverflow {
            context: "discount",
        })?;

    // 5. Taxable amount. A negative value means the membership plan
    //    over-discounted; that is an upstream pricing bug and must fail,
    //    not be clamped away.
    let taxable = subtotal
        .checked_sub(discount)
        .ok_or(CoreError::AmountOverflow {
            context: "taxable amount",
        })?;
    if taxable.is_negative() {
        return Err(CoreError::DiscountExceedsSubtotal {
            discount_cents: discount.cents(),
            subtotal_cents: subtotal.cents(),
        });
    }

    // 6-7. Tax and total.
    let tax = taxable.scale_bps(input.tax_rate.bps());
    let total = taxable.checked_add(tax).ok_or(CoreError::AmountOverflow {
        context: "total",
    })?;

    // 8. Points earned: floor(total * 1%), whole points.
    let points_earned = earned_points(total);

    Ok(PriceQuote {
        subtotal,
        membership_discount,
        points_redeemed,
        discount,
        tax,
        total,
        points_earned,
    })
}

/// Whole loyalty points earned on a settled total: `floor(total * 1%)`.
///
/// Floor on both divisions; a 99.99 spend earns 0 points, never 1.
pub fn earned_points(total: Money) -> i64 {
    let earned_cents = total.cents() as i128 * LOYALTY_EARN_RATE_BPS as i128 / 10000;
    (earned_cents / CENTS_PER_POINT as i128) as i64
}

fn check_line_item(index: usize, item: &LineItem) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::InvalidLineItem {
        index,
        reason: reason.to_string(),
    };

    if item.quantity < 1 {
        return Err(invalid("quantity must be at least 1"));
    }
    validation::validate_unit_price_cents(item.unit_price_cents)
        .map_err(|e| invalid(&e.to_string()))?;
    validation::validate_quantity(item.quantity)
        .map_err(|e| invalid(&e.to_string()))?;
    validation::validate_item_name(&item.name).map_err(|e| invalid(&e.to_string()))?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemType;
    use chrono::{Duration, Utc};

    fn service(name: &str, price_cents: i64, qty: i64) -> LineItem {
        LineItem {
            item_type: ItemType::Service,
            item_id: "svc-1".to_string(),
            name: name.to_string(),
            unit_price_cents: price_cents,
            quantity: qty,
            is_custom_price: false,
        }
    }

    fn product(name: &str, price_cents: i64, qty: i64) -> LineItem {
        LineItem {
            item_type: ItemType::Product,
            item_id: "prd-1".to_string(),
            name: name.to_string(),
            unit_price_cents: price_cents,
            quantity: qty,
            is_custom_price: false,
        }
    }

    fn gold_membership(discount_bps: u32) -> Membership {
        let now = Utc::now();
        Membership {
            id: "m1".to_string(),
            customer_id: "c1".to_string(),
            plan_name: "Gold".to_string(),
            discount_bps,
            starts_at: now - Duration::days(1),
            expires_at: now + Duration::days(364),
            is_active: true,
        }
    }

    /// Haircut 1000.00 ×1 + Shampoo 500.00 ×2, no membership, no points,
    /// 18% tax => subtotal 2000.00, tax 360.00, total 2360.00, 23 points.
    #[test]
    fn test_plain_cart() {
        let items = vec![service("Haircut", 100_000, 1), product("Shampoo", 50_000, 2)];
        let quote = price_cart(&PricingInput {
            line_items: &items,
            membership: None,
            available_points: 0,
            requested_points: 0,
            tax_rate: TaxRate::from_bps(1800),
        })
        .unwrap();

        assert_eq!(quote.subtotal.cents(), 200_000);
        assert_eq!(quote.discount.cents(), 0);
        assert_eq!(quote.tax.cents(), 36_000);
        assert_eq!(quote.total.cents(), 236_000);
        assert_eq!(quote.points_earned, 23);
        assert_eq!(quote.points_redeemed, 0);
    }

    /// Same cart, 15% membership, 100 points redeemed =>
    /// discount 300.00 + 100.00 = 400.00, taxable 1600.00, tax 288.00,
    /// total 1888.00, 18 points earned.
    #[test]
    fn test_membership_and_points() {
        let items = vec![service("Haircut", 100_000, 1), product("Shampoo", 50_000, 2)];
        let membership = gold_membership(1500);
        let quote = price_cart(&PricingInput {
            line_items: &items,
            membership: Some(&membership),
            available_points: 100,
            requested_points: 100,
            tax_rate: TaxRate::from_bps(1800),
        })
        .unwrap();

        assert_eq!(quote.subtotal.cents(), 200_000);
        assert_eq!(quote.membership_discount.cents(), 30_000);
        assert_eq!(quote.points_redeemed, 100);
        assert_eq!(quote.discount.cents(), 40_000);
        assert_eq!(quote.tax.cents(), 28_800);
        assert_eq!(quote.total.cents(), 188_800);
        assert_eq!(quote.points_earned, 18);
    }

    /// Redemption beyond min(balance, subtotal) is clamped, not rejected:
    /// 5000-point balance vs 2000.00 subtotal caps redemption at 2000.
    #[test]
    fn test_redemption_clamped_to_subtotal() {
        let items = vec![service("Haircut", 100_000, 1), product("Shampoo", 50_000, 2)];
        let quote = price_cart(&PricingInput {
            line_items: &items,
            membership: None,
            available_points: 5000,
            requested_points: 5000,
            tax_rate: TaxRate::from_bps(1800),
        })
        .unwrap();

        assert_eq!(quote.points_redeemed, 2000);
        assert_eq!(quote.discount.cents(), 200_000);
        assert_eq!(quote.tax.cents(), 0);
        assert_eq!(quote.total.cents(), 0);
        assert_eq!(quote.points_earned, 0);
    }

    #[test]
    fn test_redemption_clamped_to_balance() {
        let items = vec![service("Haircut", 100_000, 1)];
        let quote = price_cart(&PricingInput {
            line_items: &items,
            membership: None,
            available_points: 40,
            requested_points: 500,
            tax_rate: TaxRate::from_bps(1800),
        })
        .unwrap();

        assert_eq!(quote.points_redeemed, 40);
        assert_eq!(quote.discount.cents(), 4_000);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = price_cart(&PricingInput {
            line_items: &[],
            membership: None,
            available_points: 0,
            requested_points: 0,
            tax_rate: TaxRate::default(),
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_invalid_line_items_rejected() {
        let negative_price = vec![service("Haircut", -1, 1)];
        let err = price_cart(&PricingInput {
            line_items: &negative_price,
            membership: None,
            available_points: 0,
            requested_points: 0,
            tax_rate: TaxRate::default(),
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidLineItem { index: 0, .. }));

        let zero_quantity = vec![service("Haircut", 100_000, 1), service("Facial", 50_000, 0)];
        let err = price_cart(&PricingInput {
            line_items: &zero_quantity,
            membership: None,
            available_points: 0,
            requested_points: 0,
            tax_rate: TaxRate::default(),
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidLineItem { index: 1, .. }));
    }

    /// 100% membership plus any redeemed point over-discounts; the
    /// calculator must fail rather than produce a negative taxable amount.
    #[test]
    fn test_over_discount_fails() {
        let items = vec![service("Haircut", 100_000, 1)];
        let membership = gold_membership(10000);
        let err = price_cart(&PricingInput {
            line_items: &items,
            membership: Some(&membership),
            available_points: 10,
            requested_points: 10,
            tax_rate: TaxRate::from_bps(1800),
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::DiscountExceedsSubtotal { .. }));
    }

    #[test]
    fn test_negative_requested_points_rejected() {
        let items = vec![service("Haircut", 100_000, 1)];
        let err = price_cart(&PricingInput {
            line_items: &items,
            membership: None,
            available_points: 100,
            requested_points: -5,
            tax_rate: TaxRate::default(),
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_deterministic() {
        let items = vec![service("Haircut", 12_345, 3), product("Serum", 9_999, 7)];
        let membership = gold_membership(1250);
        let input = PricingInput {
            line_items: &items,
            membership: Some(&membership),
            available_points: 77,
            requested_points: 50,
            tax_rate: TaxRate::from_bps(1800),
        };

        let first = price_cart(&input).unwrap();
        let second = price_cart(&input).unwrap();
        assert_eq!(first, second);
    }

    /// Property-style sweep over pseudo-random carts: subtotal is the
    /// exact sum, the total identity holds, and the redemption clamp
    /// never yields a negative taxable amount.
    #[test]
    fn test_pricing_identities_hold_over_random_carts() {
        // Small deterministic LCG; no rand dependency in the pure crate.
        let mut state: u64 = 0x5DEECE66D;
        let mut next = |bound: u64| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) % bound
        };

        for _ in 0..500 {
            let item_count = 1 + next(8) as usize;
            let items: Vec<LineItem> = (0..item_count)
                .map(|i| {
                    let price = next(500_000) as i64;
                    let qty = 1 + next(9) as i64;
                    if i % 2 == 0 {
                        service("Haircut", price, qty)
                    } else {
                        product("Shampoo", price, qty)
                    }
                })
                .collect();

            let available = next(10_000) as i64;
            let requested = next(10_000) as i64;
            let quote = price_cart(&PricingInput {
                line_items: &items,
                membership: None,
                available_points: available,
                requested_points: requested,
                tax_rate: TaxRate::from_bps(1800),
            })
            .unwrap();

            let expected_subtotal: i64 = items
                .iter()
                .map(|i| i.unit_price_cents * i.quantity)
                .sum();
            assert_eq!(quote.subtotal.cents(), expected_subtotal);

            // discount <= subtotal always holds after clamping
            assert!(quote.discount.cents() <= quote.subtotal.cents());
            assert!(quote.points_redeemed <= available.max(0));
            assert!(quote.points_redeemed <= requested);

            // total == subtotal - discount + tax, exact
            assert_eq!(
                quote.total.cents(),
                quote.subtotal.cents() - quote.discount.cents() + quote.tax.cents()
            );
            assert!(!quote.total.is_negative());
            assert!(quote.points_earned >= 0);
        }
    }

    #[test]
    fn test_earned_points_floors() {
        assert_eq!(earned_points(Money::from_cents(236_000)), 23); // 23.60 -> 23
        assert_eq!(earned_points(Money::from_cents(188_800)), 18); // 18.88 -> 18
        assert_eq!(earned_points(Money::from_cents(9_999)), 0); // 0.99 -> 0
        assert_eq!(earned_points(Money::zero()), 0);
    }
}
