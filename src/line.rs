//! Line item records held by purchase and sale documents
use super::types::{LineId, Money, Product};
use std::fmt::Debug;

/// Common read access to a line, plus the constructor the item list uses when
/// a buffer is committed. Lines are never mutated once committed.
pub trait LineRecord: Clone + Debug + PartialEq + minicbor::Encode<()> {
    fn new(id: LineId, product: Product, quantity: u32, unit_price: Money) -> Self;
    fn id(&self) -> &LineId;
    fn product(&self) -> &Product;
    fn quantity(&self) -> u32;
    fn unit_price(&self) -> Money;

    fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity())
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLine {
    #[n(0)]
    pub id: LineId,
    #[n(1)]
    pub item: Product,
    #[n(2)]
    pub qty: u32,
    #[n(3)]
    pub unit_price: Money, // agreed with the supplier, may differ from list price
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    #[n(0)]
    pub id: LineId,
    #[n(1)]
    pub item: Product,
    #[n(2)]
    pub qty: u32,
    #[n(3)]
    pub unit_price: Money,
}

impl LineRecord for PurchaseLine {
    fn new(id: LineId, item: Product, qty: u32, unit_price: Money) -> Self {
        Self {
            id,
            item,
            qty,
            unit_price,
        }
    }
    fn id(&self) -> &LineId {
        &self.id
    }
    fn product(&self) -> &Product {
        &self.item
    }
    fn quantity(&self) -> u32 {
        self.qty
    }
    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl LineRecord for SaleLine {
    fn new(id: LineId, item: Product, qty: u32, unit_price: Money) -> Self {
        Self {
            id,
            item,
            qty,
            unit_price,
        }
    }
    fn id(&self) -> &LineId {
        &self.id
    }
    fn product(&self) -> &Product {
        &self.item
    }
    fn quantity(&self) -> u32 {
        self.qty
    }
    fn unit_price(&self) -> Money {
        self.unit_price
    }
}
