//! Line item editing for purchase and sale documents.
//!
//! [`item_list::ItemList`] is the embedded editor: a composite field holding an
//! ordered list of lines, edited one at a time through a buffer and gated by a
//! [`gate::ConfirmationGate`] for removals and overwrites. The per-kind rules
//! live in [`policy`], and [`document`] holds the drafts that embed the list.

pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod gate;
pub mod item_list;
pub mod line;
pub mod policy;
pub mod types;
pub mod utils;
