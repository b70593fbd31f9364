//! Smoke Screen Unit tests for the line item components
//!
//! These tests span the public surface of the crate and check each piece in
//! isolation from the flows in `scenarios.rs`. They mostly cover the
//! happy-path.

use chrono::TimeDelta;
use line_items::{
    buffer::is_empty_field,
    config::{ItemListConfig, Privileges},
    item_list::ItemList,
    line::{LineRecord, PurchaseLine, SaleLine},
    policy::{PurchasePolicy, SalePolicy},
    types::{LineId, Money, Product, ProductId},
    utils::{cbor_digest, new_uuid_to_bech32},
};

fn product(id: u64) -> Product {
    Product {
        id: ProductId(id),
        name: format!("Item {id}"),
        price: Money::from_cents(199),
        stock: 10,
    }
}

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Draft ids carry the human readable prefix followed by the bech32 separator
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32("draft").unwrap();

        assert!(encoded.starts_with("draft1"));
        assert!(encoded.len() > 10);
    }

    /// An empty prefix is not a valid hrp
    #[test]
    fn handles_empty_hrp() {
        assert!(new_uuid_to_bech32("").is_err());
    }

    /// Multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = new_uuid_to_bech32("draft").unwrap();
        let id2 = new_uuid_to_bech32("draft").unwrap();
        let id3 = new_uuid_to_bech32("draft").unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    /// The digest is a stable function of the encoded value
    #[test]
    fn cbor_digest_is_deterministic() {
        let line = PurchaseLine::new(LineId::Stored(1), product(3), 2, Money::from_cents(500));

        let (hash_a, cbor_a) = cbor_digest(&line).unwrap();
        let (hash_b, cbor_b) = cbor_digest(&line.clone()).unwrap();

        assert_eq!(hash_a, hash_b);
        assert_eq!(cbor_a, cbor_b);
        assert_eq!(hash_a.len(), 64);
    }
}

// TYPES AND LINE TESTS
#[cfg(test)]
mod line_tests {
    use super::*;

    /// Line total multiplies quantity and unit price in cents
    #[test]
    fn line_total_uses_unit_price() {
        let line = SaleLine::new(LineId::Stored(1), product(1), 3, Money::from_cents(1250));

        assert_eq!(line.line_total(), Money::from_cents(3750));
        assert_eq!(line.line_total().to_string(), "37.50");
    }

    /// Overflow saturates rather than wrapping around
    #[test]
    fn money_saturates() {
        let huge = Money::from_cents(u64::MAX / 2);
        assert_eq!(huge.times(3), Money::from_cents(u64::MAX));

        let total: Money = [huge, huge, huge].into_iter().sum();
        assert_eq!(total, Money::from_cents(u64::MAX));
    }

    /// Line ids render as the raw id or the draft string
    #[test]
    fn line_id_display() {
        assert_eq!(LineId::Stored(17).to_string(), "17");
        assert_eq!(LineId::Draft("draft1abc".into()).to_string(), "draft1abc");
    }
}

// CONFIG TESTS
#[cfg(test)]
mod config_tests {
    use super::*;

    /// Defaults match the documented field limits
    #[test]
    fn defaults() {
        let config = ItemListConfig::default();

        assert_eq!(config.min_quantity, 1);
        assert_eq!(config.max_quantity, 99_999_999);
        assert_eq!(config.max_unit_price.to_string(), "99999999.99");
        assert_eq!(config.notification_duration, TimeDelta::milliseconds(2000));
        assert_eq!(config.draft_prefix, "draft");
    }

    /// Chained setters override single values
    #[test]
    fn builder_sets_fields() {
        let config = ItemListConfig::new()
            .set_quantity_range(2, 10)
            .set_max_unit_price(Money::from_cents(100))
            .set_notification_duration(TimeDelta::seconds(5))
            .set_draft_prefix("line");

        assert_eq!((config.min_quantity, config.max_quantity), (2, 10));
        assert_eq!(config.max_unit_price, Money::from_cents(100));
        assert_eq!(config.notification_duration, TimeDelta::seconds(5));
        assert_eq!(config.draft_prefix, "line");
    }

    #[test]
    fn privileges_shorthands() {
        assert!(Privileges::all().add && Privileges::all().update);
        assert!(!Privileges::none().add && !Privileges::none().update);
    }
}

// ITEM LIST TESTS
#[cfg(test)]
mod item_list_tests {
    use super::*;

    /// A new list is idle, empty and valid
    #[test]
    fn new_list_is_idle() {
        let list = ItemList::new(SalePolicy, ItemListConfig::default());

        assert!(list.value().is_empty());
        assert_eq!(list.total(), Money::ZERO);
        assert!(list.validate().is_none());
        assert!(list.is_form_empty());
        assert!(is_empty_field(list.buffer().product()));
        assert!(!list.is_touched());
    }

    /// Configured draft prefix shows up in new line ids
    #[test]
    fn draft_prefix_is_configurable() {
        let mut list = ItemList::new(
            PurchasePolicy,
            ItemListConfig::new().set_draft_prefix("line"),
        );
        list.set_candidates(vec![product(1)]);
        list.start_add().unwrap();
        list.select_product(Some(ProductId(1))).unwrap();
        list.set_quantity("1").unwrap();
        list.commit().unwrap();

        assert!(list.value()[0].id.to_string().starts_with("line1"));
    }

    /// The fingerprint follows the committed content
    #[test]
    fn fingerprint_tracks_value() {
        let mut list = ItemList::new(PurchasePolicy, ItemListConfig::default());
        let empty = list.fingerprint().unwrap();

        let line = PurchaseLine::new(LineId::Stored(5), product(2), 1, Money::from_cents(199));
        list.set_value(vec![line.clone()]);
        let one = list.fingerprint().unwrap();
        assert_ne!(empty, one);

        list.set_value(vec![line]);
        assert_eq!(one, list.fingerprint().unwrap());
    }
}
