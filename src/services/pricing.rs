//! Line validation and catalog pricing shared by commit, hold, merge and edit.

use crate::{
    errors::ServiceError,
    models::{OrderLine, TaxTotals},
    services::catalog::{CatalogEntry, CatalogLookup},
};
use rust_decimal::Decimal;
use tracing::warn;

/// A line resolved against the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricedLine {
    pub entry: CatalogEntry,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Priced lines and their unrounded totals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PricedBill {
    pub lines: Vec<PricedLine>,
    pub totals: TaxTotals,
}

/// Rejects empty input and non-positive quantities, and folds duplicate item
/// ids into one line (first occurrence keeps its position).
pub fn normalize_lines(lines: &[OrderLine]) -> Result<Vec<OrderLine>, ServiceError> {
    if lines.is_empty() {
        return Err(ServiceError::EmptyBillCommit);
    }

    let mut normalized: Vec<OrderLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            return Err(ServiceError::InvalidQuantity {
                item_id: line.item_id,
                quantity: i64::from(line.quantity),
            });
        }

        match normalized.iter_mut().find(|l| l.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or(
                    ServiceError::InvalidQuantity {
                        item_id: line.item_id,
                        quantity: i64::from(existing.quantity) + i64::from(line.quantity),
                    },
                )?;
            }
            None => normalized.push(*line),
        }
    }

    Ok(normalized)
}

/// Looks up every line in order and accumulates price and taxes from the
/// listed costs. Stops at the first unknown item.
pub async fn price_lines(
    catalog: &dyn CatalogLookup,
    lines: &[OrderLine],
) -> Result<PricedBill, ServiceError> {
    let mut priced = PricedBill::default();

    for line in lines {
        let entry = catalog.lookup(line.item_id).await?.ok_or_else(|| {
            warn!(item_id = line.item_id, "Item not found in catalog");
            ServiceError::UnknownItem(line.item_id)
        })?;

        let line_total = entry.cost * Decimal::from(line.quantity);
        priced
            .totals
            .accumulate(line_total, entry.sgst, entry.cgst, entry.tax);
        priced.lines.push(PricedLine {
            entry,
            quantity: line.quantity,
            line_total,
        });
    }

    Ok(priced)
}

/// `normalize_lines` followed by `price_lines`.
pub async fn prepare_lines(
    catalog: &dyn CatalogLookup,
    lines: &[OrderLine],
) -> Result<PricedBill, ServiceError> {
    let lines = normalize_lines(lines)?;
    price_lines(catalog, &lines).await
}
