//! Property-based tests for the item list invariants
//!
//! Random sequences of commits and removals are replayed against an item list
//! and the list is checked after every step: ordering, the duplicate rule of
//! the active policy, and the derived total as a pure function of the list.

use line_items::{
    config::ItemListConfig,
    gate::ScriptedGate,
    item_list::{CommitOutcome, ItemList},
    line::LineRecord,
    policy::{LinePolicy, PurchasePolicy, SalePolicy},
    types::{LineId, Money, Product, ProductId},
};
use proptest::prelude::*;

// PROPERTY TEST STRATEGIES

#[derive(Debug, Clone)]
enum Step {
    Commit { product: u64, qty: u32, cents: u64 },
    /// Remove the line at this index (modulo the list length), if any.
    Remove { index: usize, confirm: bool },
}

/// Strategy for a single step. Few products and prices so duplicates happen.
fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (1u64..=4, 1u32..=20, prop_oneof![Just(500u64), Just(750), Just(1999)])
            .prop_map(|(product, qty, cents)| Step::Commit { product, qty, cents }),
        1 => (any::<usize>(), any::<bool>())
            .prop_map(|(index, confirm)| Step::Remove { index, confirm }),
    ]
}

fn catalogue() -> Vec<Product> {
    (1..=4)
        .map(|id| Product {
            id: ProductId(id),
            name: format!("Item {id}"),
            price: Money::from_cents(100 * id),
            stock: 1_000,
        })
        .collect()
}

fn cents(price: u64) -> String {
    Money::from_cents(price).to_string()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("current thread runtime")
}

/// Applies `steps` and checks the invariants after each one.
fn replay<P: LinePolicy + Clone>(policy: P, steps: Vec<Step>) -> Result<(), TestCaseError> {
    let rt = runtime();
    let mut list = ItemList::new(policy.clone(), ItemListConfig::default());
    list.set_candidates(catalogue());

    for step in steps {
        let before: Vec<P::Line> = list.value().to_vec();

        match step {
            Step::Commit { product, qty, cents: price } => {
                list.reset_form();
                list.start_add().unwrap();
                list.select_product(Some(ProductId(product))).unwrap();
                list.set_quantity(&qty.to_string()).unwrap();
                list.set_unit_price(&cents(price)).unwrap();

                match list.commit().unwrap() {
                    CommitOutcome::Committed(id) => {
                        prop_assert_eq!(list.value().len(), before.len() + 1);
                        prop_assert_eq!(list.value()[0].id(), &id);
                        prop_assert_eq!(&list.value()[1..], before.as_slice());
                    }
                    CommitOutcome::Duplicate => {
                        prop_assert_eq!(list.value(), before.as_slice());
                    }
                    CommitOutcome::Invalid(errors) => {
                        return Err(TestCaseError::fail(format!("unexpected errors {errors:?}")));
                    }
                }
            }
            Step::Remove { index, confirm } => {
                if before.is_empty() {
                    continue;
                }
                let target: LineId = before[index % before.len()].id().clone();
                let mut gate = ScriptedGate::always(confirm);
                rt.block_on(list.remove(&target, &mut gate)).unwrap();

                let expected: Vec<P::Line> = if confirm {
                    before.iter().filter(|l| *l.id() != target).cloned().collect()
                } else {
                    before.clone()
                };
                prop_assert_eq!(list.value(), expected.as_slice());
            }
        }

        // no two lines are duplicates under the active policy
        let lines = list.value();
        for (i, a) in lines.iter().enumerate() {
            for b in &lines[i + 1..] {
                prop_assert!(!policy.duplicate(a, b));
            }
        }

        // total is recomputed from the current list
        let expected: u64 = lines
            .iter()
            .map(|l| l.unit_price().cents() * u64::from(l.quantity()))
            .sum();
        prop_assert_eq!(list.total(), Money::from_cents(expected));
    }
    Ok(())
}

// PROPERTY TESTS
proptest! {
    /// Property: purchase lists stay ordered, duplicate-free and correctly totalled
    #[test]
    fn prop_purchase_list_invariants(steps in prop::collection::vec(step_strategy(), 0..40)) {
        replay(PurchasePolicy, steps)?;
    }

    /// Property: sale lists hold each product at most once
    #[test]
    fn prop_sale_list_invariants(steps in prop::collection::vec(step_strategy(), 0..40)) {
        replay(SalePolicy, steps)?;
    }

    /// Property: N distinct commits give N lines, most recent first
    #[test]
    fn prop_distinct_commits_most_recent_first(
        qtys in prop::collection::vec(1u32..=50, 1..=4)
    ) {
        let mut list = ItemList::new(SalePolicy, ItemListConfig::default());
        list.set_candidates(catalogue());

        for (i, qty) in qtys.iter().enumerate() {
            list.start_add().unwrap();
            list.select_product(Some(ProductId(i as u64 + 1))).unwrap();
            list.set_quantity(&qty.to_string()).unwrap();
            prop_assert!(matches!(list.commit().unwrap(), CommitOutcome::Committed(_)));
        }

        let products: Vec<u64> = list.value().iter().map(|l| l.product().id.0).collect();
        let expected: Vec<u64> = (1..=qtys.len() as u64).rev().collect();
        prop_assert_eq!(products, expected);
    }
}
