//! Walks a purchase draft through add, duplicate, edit, remove and submit.
//!
//! Run with `RUST_LOG=line_items=debug` to see every transition.

use chrono::Utc;
use line_items::{
    config::{ItemListConfig, Privileges},
    document::PurchaseDraft,
    gate::ScriptedGate,
    item_list::CommitOutcome,
    types::{Money, PartyId, Product, ProductId},
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("line_items=info")),
        )
        .init();

    let mut draft = PurchaseDraft::new(Privileges::all(), ItemListConfig::default());
    draft.set_party(Some(PartyId(3)));
    draft.set_date(Some(Utc::now().date_naive()));
    draft.set_description(Some("Weekly restock".into()));
    draft.set_candidates(vec![
        Product {
            id: ProductId(1),
            name: "Portland cement".into(),
            price: Money::from_cents(1000),
            stock: 40,
        },
        Product {
            id: ProductId(2),
            name: "Steel rod".into(),
            price: Money::from_cents(500),
            stock: 12,
        },
    ]);

    let mut first = None;
    for (product, qty) in [(1, "2"), (2, "1"), (2, "3")] {
        let items = draft.items_mut();
        items.reset_form();
        items.start_add()?;
        items.select_product(Some(ProductId(product)))?;
        items.set_quantity(qty)?;

        match items.commit()? {
            CommitOutcome::Committed(id) => {
                println!("committed {id}");
                first.get_or_insert(id);
            }
            CommitOutcome::Duplicate => {
                for note in items.take_notifications() {
                    println!("notice: {}", note.message);
                }
            }
            CommitOutcome::Invalid(errors) => {
                for (field, error) in errors.iter() {
                    println!("{field:?}: {error}");
                }
            }
        }
    }

    let mut gate = ScriptedGate::answering([true, false]);
    if let Some(id) = first {
        let items = draft.items_mut();
        items.start_edit(&id, &mut gate).await?;
        items.set_quantity("5")?;
        items.commit()?;
        items.remove(&id, &mut gate).await?;
    }
    for prompt in gate.prompts() {
        println!("asked: {prompt}");
    }

    println!("total {}", draft.total());
    let (hash, cbor) = draft.submit()?;
    println!("purchase {hash} ({} bytes)", cbor.len());

    Ok(())
}
