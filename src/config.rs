//! Tunables for the item list and the document drafts hosting it
use super::types::Money;
use chrono::TimeDelta;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListConfig {
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub max_unit_price: Money,
    /// How long a transient notification stays on screen.
    pub notification_duration: TimeDelta,
    /// Human readable part for draft line ids.
    pub draft_prefix: String,
}

/// What the signed in user may do with a document. Evaluated by the caller,
/// the drafts only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privileges {
    pub add: bool,
    pub update: bool,
}

impl Default for ItemListConfig {
    fn default() -> Self {
        Self {
            min_quantity: 1,
            max_quantity: 99_999_999,
            max_unit_price: Money::from_cents(9_999_999_999),
            notification_duration: TimeDelta::milliseconds(2000),
            draft_prefix: "draft".into(),
        }
    }
}

impl ItemListConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_quantity_range(mut self, min: u32, max: u32) -> Self {
        self.min_quantity = min;
        self.max_quantity = max;
        self
    }
    pub fn set_max_unit_price(mut self, max: Money) -> Self {
        self.max_unit_price = max;
        self
    }
    pub fn set_notification_duration(mut self, duration: TimeDelta) -> Self {
        self.notification_duration = duration;
        self
    }
    pub fn set_draft_prefix(mut self, prefix: &str) -> Self {
        self.draft_prefix = prefix.into();
        self
    }
}

impl Privileges {
    pub fn all() -> Self {
        Self {
            add: true,
            update: true,
        }
    }
    pub fn none() -> Self {
        Self {
            add: false,
            update: false,
        }
    }
}
