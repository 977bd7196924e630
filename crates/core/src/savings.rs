//! Display strings for the money a shopper saves by taking a suggestion.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::product::{Product, Promotion};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

/// Flat reduction the multi-buy estimate assumes, regardless of the actual deal.
pub const MULTI_BUY_ASSUMED_REDUCTION: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavingsCalculator {
    currency_symbol: String,
}

impl Default for SavingsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl SavingsCalculator {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self { currency_symbol: currency_symbol.into() }
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Loyalty saving first, then the promotion's own wording, else empty.
    pub fn label_for(&self, product: &Product) -> String {
        if let Some(saving) = product.loyalty_saving() {
            return format!("Save {}", self.money(saving));
        }

        match &product.promotion {
            Some(Promotion::PercentageOff { value }) => format!("{value} off"),
            Some(Promotion::FixedAmountOff { value }) => format!("Save {value}"),
            Some(Promotion::MultiBuy { value, .. }) => value.clone(),
            None => String::new(),
        }
    }

    /// Estimated saving for buying `threshold` units under a multi-buy deal.
    ///
    /// Assumes [`MULTI_BUY_ASSUMED_REDUCTION`] off the regular total; the
    /// promotion's real price structure is not consulted. Totals too large
    /// for `Decimal` yield an empty label.
    pub fn multi_buy_estimate(&self, product: &Product, threshold: u32) -> String {
        if product.promotion.is_none() {
            return String::new();
        }

        let saving = product.price.checked_mul(Decimal::from(threshold)).and_then(|regular_total| {
            let promo_total =
                regular_total.checked_mul(Decimal::ONE - MULTI_BUY_ASSUMED_REDUCTION)?;
            regular_total.checked_sub(promo_total)
        });

        match saving {
            Some(saving) => format!("Save {}", self.money(saving)),
            None => String::new(),
        }
    }

    pub fn money(&self, amount: Decimal) -> String {
        format!("{}{}", self.currency_symbol, format_two_places(amount))
    }
}

fn format_two_places(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::SavingsCalculator;
    use crate::domain::product::{Product, ProductId, Promotion, ValueBand};

    fn product(price_pence: i64) -> Product {
        Product {
            id: ProductId::new("prod_t"),
            name: "Test".to_owned(),
            brand: "Brand".to_owned(),
            category: "Cat".to_owned(),
            sub_category: "Sub".to_owned(),
            tags: Vec::new(),
            diet_tags: Vec::new(),
            price: Decimal::new(price_pence, 2),
            loyalty_price: None,
            promotion: None,
            value_band: ValueBand::Mid,
            in_stock: true,
            image_url: None,
        }
    }

    #[test]
    fn loyalty_price_wins_over_promotion() {
        let mut item = product(350);
        item.loyalty_price = Some(Decimal::new(275, 2));
        item.promotion = Some(Promotion::PercentageOff { value: "10%".to_owned() });

        assert_eq!(SavingsCalculator::default().label_for(&item), "Save £0.75");
    }

    #[test]
    fn promotion_kinds_render_their_display_value() {
        let calculator = SavingsCalculator::default();
        let mut item = product(200);

        item.promotion = Some(Promotion::PercentageOff { value: "25%".to_owned() });
        assert_eq!(calculator.label_for(&item), "25% off");

        item.promotion = Some(Promotion::FixedAmountOff { value: "£1".to_owned() });
        assert_eq!(calculator.label_for(&item), "Save £1");

        item.promotion = Some(Promotion::MultiBuy {
            value: "2 for £3".to_owned(),
            threshold: Some(2),
            group_id: None,
        });
        assert_eq!(calculator.label_for(&item), "2 for £3");
    }

    #[test]
    fn plain_product_has_empty_label() {
        assert_eq!(SavingsCalculator::default().label_for(&product(120)), "");
    }

    #[test]
    fn multi_buy_estimate_assumes_twenty_percent() {
        let mut pasta = product(100);
        pasta.promotion = Some(Promotion::MultiBuy {
            value: "3 for £2".to_owned(),
            threshold: Some(3),
            group_id: Some("pasta_deal".to_owned()),
        });

        assert_eq!(SavingsCalculator::default().multi_buy_estimate(&pasta, 3), "Save £0.60");
    }

    #[test]
    fn multi_buy_estimate_scales_with_threshold() {
        let mut item = product(145);
        item.promotion = Some(Promotion::MultiBuy {
            value: "2 for £2.50".to_owned(),
            threshold: None,
            group_id: None,
        });

        // 1.45 * 2 * 0.2 = 0.58
        assert_eq!(SavingsCalculator::default().multi_buy_estimate(&item, 2), "Save £0.58");

        // 1.45 * 5 * 0.2 = 1.45
        assert_eq!(SavingsCalculator::new("€").multi_buy_estimate(&item, 5), "Save €1.45");
    }

    #[test]
    fn multi_buy_estimate_without_promotion_is_empty() {
        assert_eq!(SavingsCalculator::default().multi_buy_estimate(&product(100), 3), "");
    }

    #[test]
    fn multi_buy_estimate_overflow_yields_empty_label() {
        let mut item = product(100);
        item.price = Decimal::from_str_exact("79228162514264337593543950").expect("valid decimal");
        item.promotion = Some(Promotion::MultiBuy {
            value: "4000000 for £1".to_owned(),
            threshold: Some(4_000_000),
            group_id: None,
        });

        assert_eq!(SavingsCalculator::default().multi_buy_estimate(&item, 4_000_000), "");
    }

    #[test]
    fn money_pads_to_two_decimals() {
        let calculator = SavingsCalculator::default();

        assert_eq!(calculator.money(Decimal::new(6, 1)), "£0.60");
        assert_eq!(calculator.money(Decimal::new(12345, 3)), "£12.35");
        assert_eq!(calculator.money(Decimal::from(2)), "£2.00");
    }
}
