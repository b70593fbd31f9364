//! Per-kind business rules plugged into the item list
use super::buffer::{FieldName, ValidationErrors};
use super::error::FieldError;
use super::line::{LineRecord, PurchaseLine, SaleLine};
use super::types::{Money, Product, ProductId};

/// A validated composition about to be committed, with its product resolved.
#[derive(Debug, Clone, Copy)]
pub struct LineDraft<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    pub unit_price: Money,
}

pub trait LinePolicy {
    type Line: LineRecord;

    /// Short name used in logs.
    const KIND: &'static str;

    /// Whether `a` and `b` may not coexist in one list.
    fn duplicate(&self, a: &Self::Line, b: &Self::Line) -> bool;

    /// Shown when a commit is rejected as a duplicate.
    fn duplicate_message(&self) -> &'static str;

    fn describe(&self, line: &Self::Line) -> String {
        line.product().name.clone()
    }

    fn resolve(&self, id: ProductId, candidates: &[Product]) -> Option<Product> {
        candidates.iter().find(|p| p.id == id).cloned()
    }

    /// Extra rule checked after the field validators pass.
    fn pre_commit_check(&self, _draft: &LineDraft<'_>) -> Option<ValidationErrors> {
        None
    }

    fn remove_prompt(&self, line: &Self::Line) -> String {
        format!("Are you sure to remove \u{201C}{}\u{201D}?", self.describe(line))
    }

    fn update_prompt(&self, line: &Self::Line, discards_input: bool) -> String {
        if discards_input {
            format!(
                "Are you sure to update \u{201C}{}\u{201D} and discard existing form data?",
                self.describe(line)
            )
        } else {
            format!("Are you sure to update \u{201C}{}\u{201D}?", self.describe(line))
        }
    }
}

/// The same item may be bought at different prices within one purchase.
#[derive(Debug, Default, Clone, Copy)]
pub struct PurchasePolicy;

/// An item appears at most once per sale, and never beyond its stock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SalePolicy;

impl LinePolicy for PurchasePolicy {
    type Line = PurchaseLine;
    const KIND: &'static str = "purchase";

    fn duplicate(&self, a: &PurchaseLine, b: &PurchaseLine) -> bool {
        a.item.id == b.item.id && a.unit_price == b.unit_price
    }

    fn duplicate_message(&self) -> &'static str {
        "Selected item and unit price already exist in the table."
    }
}

impl LinePolicy for SalePolicy {
    type Line = SaleLine;
    const KIND: &'static str = "sale";

    fn duplicate(&self, a: &SaleLine, b: &SaleLine) -> bool {
        a.item.id == b.item.id
    }

    fn duplicate_message(&self) -> &'static str {
        "Selected item already exists in the table."
    }

    fn pre_commit_check(&self, draft: &LineDraft<'_>) -> Option<ValidationErrors> {
        if draft.quantity > draft.product.stock {
            return Some(ValidationErrors::new().with(
                FieldName::Quantity,
                FieldError::QuantityOverflow {
                    remaining: draft.product.stock,
                },
            ));
        }
        None
    }
}
