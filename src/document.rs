//! Purchase and sale drafts: the document forms hosting an item list
use super::config::{ItemListConfig, Privileges};
use super::error::DraftError;
use super::item_list::ItemList;
use super::policy::{LinePolicy, PurchasePolicy, SalePolicy};
use super::types::{DocDate, Money, PartyId, Product};
use super::utils;
use chrono::{Months, NaiveDate, Utc};
use tracing::{debug, info};

pub const DESCRIPTION_MAX_LEN: usize = 65_536;

/// What differs between a purchase and a sale document.
pub trait DocumentKind {
    type Policy: LinePolicy + Default;

    const NAME: &'static str;
    /// The counterparty: supplier or customer.
    const PARTY: &'static str;
    const PARTY_REQUIRED: bool;
}

#[derive(Debug)]
pub struct Purchase;

#[derive(Debug)]
pub struct Sale;

pub type PurchaseDraft = Draft<Purchase>;
pub type SaleDraft = Draft<Sale>;

pub struct Draft<K: DocumentKind> {
    description: Option<String>,
    date: Option<NaiveDate>,
    party: Option<PartyId>,
    items: ItemList<K::Policy>,
    privileges: Privileges,
    require_lines: bool,
    // fingerprint of the lines an existing document was loaded with
    loaded: Option<String>,
}

/// The finalised document. Its id is the hash of its CBOR encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<L> {
    pub description: Option<String>,
    pub date: DocDate,
    pub party: Option<PartyId>,
    pub lines: Vec<L>,
    pub total: Money,
}

impl DocumentKind for Purchase {
    type Policy = PurchasePolicy;
    const NAME: &'static str = "purchase";
    const PARTY: &'static str = "supplier";
    const PARTY_REQUIRED: bool = true;
}

impl DocumentKind for Sale {
    type Policy = SalePolicy;
    const NAME: &'static str = "sale";
    const PARTY: &'static str = "customer";
    const PARTY_REQUIRED: bool = false;
}

impl<K: DocumentKind> Draft<K> {
    pub fn new(privileges: Privileges, config: ItemListConfig) -> Self {
        let mut items = ItemList::new(K::Policy::default(), config);
        items.set_disabled(!privileges.add);

        Self {
            description: None,
            date: None,
            party: None,
            items,
            privileges,
            require_lines: true,
            loaded: None,
        }
    }

    /// Opens an existing document for update.
    pub fn load(
        &mut self,
        description: Option<String>,
        date: NaiveDate,
        party: Option<PartyId>,
        lines: Vec<<K::Policy as LinePolicy>::Line>,
    ) -> anyhow::Result<()> {
        self.description = description;
        self.date = Some(date);
        self.party = party;
        self.items.set_value(lines);
        self.items.set_disabled(!self.privileges.update);
        self.loaded = Some(self.items.fingerprint()?);

        debug!(kind = K::NAME, lines = self.items.value().len(), "document loaded");
        Ok(())
    }

    /// Whether submitting an empty list is refused. On by default.
    pub fn require_lines(mut self, required: bool) -> Self {
        self.require_lines = required;
        self
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }
    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }
    pub fn set_party(&mut self, party: Option<PartyId>) {
        self.party = party;
    }
    /// Products the item list may reference, e.g. those sold by the chosen supplier.
    pub fn set_candidates(&mut self, candidates: Vec<Product>) {
        self.items.set_candidates(candidates);
    }

    pub fn items(&self) -> &ItemList<K::Policy> {
        &self.items
    }
    pub fn items_mut(&mut self) -> &mut ItemList<K::Policy> {
        &mut self.items
    }
    pub fn total(&self) -> Money {
        self.items.total()
    }
    pub fn is_update(&self) -> bool {
        self.loaded.is_some()
    }

    /// Whether the committed lines differ from what was loaded (or from an
    /// empty list for a new document).
    pub fn is_dirty(&self) -> anyhow::Result<bool> {
        match &self.loaded {
            Some(loaded) => Ok(*loaded != self.items.fingerprint()?),
            None => Ok(!self.items.value().is_empty()),
        }
    }

    pub fn submit(&mut self) -> anyhow::Result<(String, Vec<u8>)> {
        self.submit_on(Utc::now().date_naive())
    }

    /// Discards any uncommitted line, checks the document and returns its hash
    /// together with the CBOR encoding.
    pub fn submit_on(&mut self, today: NaiveDate) -> anyhow::Result<(String, Vec<u8>)> {
        let (action, allowed) = if self.is_update() {
            ("update", self.privileges.update)
        } else {
            ("add", self.privileges.add)
        };
        if !allowed {
            return Err(DraftError::Forbidden(action).into());
        }

        self.items.reset_form();

        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(DraftError::DescriptionTooLong(DESCRIPTION_MAX_LEN).into());
            }
        }

        let Some(date) = self.date else {
            return Err(DraftError::MissingDate.into());
        };
        // the date window only binds new documents
        if !self.is_update() {
            let max = today
                .checked_add_months(Months::new(12))
                .unwrap_or(NaiveDate::MAX);
            if date < today || date > max {
                return Err(DraftError::DateOutOfRange {
                    date,
                    min: today,
                    max,
                }
                .into());
            }
        }

        if K::PARTY_REQUIRED && self.party.is_none() {
            return Err(DraftError::MissingParty(K::PARTY).into());
        }
        if self.require_lines && self.items.value().is_empty() {
            return Err(DraftError::NoLines.into());
        }

        let document = Document {
            description: self.description.clone(),
            date: date.into(),
            party: self.party,
            lines: self.items.value().to_vec(),
            total: self.items.total(),
        };
        let (hash, cbor) = utils::cbor_digest(&document)?;

        info!(
            kind = K::NAME,
            action,
            %hash,
            lines = document.lines.len(),
            total = %document.total,
            "document finalised"
        );
        Ok((hash, cbor))
    }
}

impl<C, L: minicbor::Encode<C>> minicbor::Encode<C> for Document<L> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(5)?;
        minicbor::Encode::encode(&self.description, e, ctx)?;
        minicbor::Encode::encode(&self.date, e, ctx)?;
        minicbor::Encode::encode(&self.party, e, ctx)?;
        minicbor::Encode::encode(&self.lines, e, ctx)?;
        minicbor::Encode::encode(&self.total, e, ctx)
    }
}
