//! Purchase planning
//!
//! Pure validation and pricing for a multi-item purchase. A plan is computed
//! from the locked user balance and product rows with no persistence at all;
//! only a fully valid plan is applied to the store, so a late failure (for
//! example insufficient balance after several stock checks) never leaves a
//! partial decrement behind.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{Locale, Product, ShopError};

/// A product row paired with the requested quantity.
#[derive(Debug)]
pub struct PlanItem<'a> {
    pub product: &'a Product,
    pub quantity: i64,
}

/// One validated purchase line.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// price × quantity at purchase time
    pub amount: Decimal,
}

/// A fully validated purchase ready to be applied atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchasePlan {
    pub lines: Vec<PurchaseLine>,
    pub total: Decimal,
}

impl PurchasePlan {
    /// Validate every requested item against stock, then the aggregate total
    /// against the balance. Items are checked in request order, so the first
    /// failing item is the one reported. A product may appear on several
    /// lines; the stock check runs against the summed quantity across all of
    /// them, since the apply step decrements the same row once per line.
    ///
    /// # Errors
    /// - `InvalidAmount` for a quantity <= 0, an empty item list or a line
    ///   amount that overflows
    /// - `InsufficientStock` when the quantity requested so far for a
    ///   product exceeds its count, naming the product in the requested
    ///   locale
    /// - `InsufficientBalance` when the balance does not cover the total
    pub fn build(
        balance: Decimal,
        items: &[PlanItem<'_>],
        locale: Locale,
    ) -> Result<Self, ShopError> {
        if items.is_empty() {
            return Err(ShopError::invalid_amount("purchase must contain at least one item"));
        }

        let mut lines = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;
        let mut requested_so_far: HashMap<i64, i64> = HashMap::new();

        for item in items {
            if item.quantity <= 0 {
                return Err(ShopError::invalid_amount(format!(
                    "quantity must be positive (got {})",
                    item.quantity
                )));
            }

            let requested = requested_so_far
                .entry(item.product.id)
                .and_modify(|q| *q += item.quantity)
                .or_insert(item.quantity);
            if item.product.count < *requested {
                return Err(ShopError::InsufficientStock {
                    product: item.product.name.localized(locale).to_string(),
                    requested: *requested,
                    available: item.product.count,
                });
            }

            let amount = item
                .product
                .price
                .checked_mul(Decimal::from(item.quantity))
                .ok_or_else(|| {
                    ShopError::invalid_amount(format!(
                        "line amount overflows for product {}",
                        item.product.id
                    ))
                })?;
            total = total
                .checked_add(amount)
                .ok_or_else(|| ShopError::invalid_amount("purchase total overflows"))?;

            lines.push(PurchaseLine {
                product_id: item.product.id,
                quantity: item.quantity,
                unit_price: item.product.price,
                amount,
            });
        }

        if balance < total {
            return Err(ShopError::insufficient_balance(total, balance));
        }

        Ok(Self { lines, total })
    }
}
