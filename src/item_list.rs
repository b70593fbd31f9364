//! The embedded line item editor.
//!
//! An [`ItemList`] owns an ordered list of committed lines (most recent first)
//! and a single edit buffer. The enclosing document form sees the whole list
//! as one field value: it may replace it, read it, and ask for the buffer to
//! be discarded before it reads the value for submission.
//!
//! ```text
//!  Idle --start_add--> Composing(New) --commit ok--> Idle
//!   |                        |
//!   +--start_edit (confirmed)--> Composing(Editing(id)) --commit ok--> Idle
//!
//!  reset_form: any state --> Idle, list untouched
//! ```
use super::buffer::{EditBuffer, FieldName, Mode, ValidationErrors};
use super::config::ItemListConfig;
use super::error::{FieldError, ListError};
use super::gate::{Confirmation, ConfirmationGate};
use super::line::LineRecord;
use super::policy::{LineDraft, LinePolicy};
use super::types::{LineId, Money, Product, ProductId};
use super::utils;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Composing(Mode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(LineId),
    /// Field or business rule errors, also stored on the buffer fields.
    Invalid(ValidationErrors),
    /// An equal line (by policy) is already in the list. A notification was raised.
    Duplicate,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub duration: TimeDelta,
}

type ChangeCallback<L> = Box<dyn FnMut(&[L])>;
type TouchedCallback = Box<dyn FnMut()>;

pub struct ItemList<P: LinePolicy> {
    policy: P,
    config: ItemListConfig,
    lines: Vec<P::Line>,
    buffer: EditBuffer,
    state: ListState,
    candidates: Vec<Product>, // products the buffer may reference
    disabled: bool,
    touched: bool,
    notifications: Vec<Notification>,
    on_change: Option<ChangeCallback<P::Line>>,
    on_touched: Option<TouchedCallback>,
}

impl<P: LinePolicy> ItemList<P> {
    pub fn new(policy: P, config: ItemListConfig) -> Self {
        Self {
            policy,
            config,
            lines: vec![],
            buffer: EditBuffer::default(),
            state: ListState::Idle,
            candidates: vec![],
            disabled: false,
            touched: false,
            notifications: vec![],
            on_change: None,
            on_touched: None,
        }
    }

    /// Replaces the committed list wholesale and drops any composition.
    pub fn set_value(&mut self, lines: Vec<P::Line>) {
        debug!(kind = P::KIND, count = lines.len(), "item list value replaced");
        self.lines = lines;
        self.reset_form();
    }

    pub fn value(&self) -> &[P::Line] {
        &self.lines
    }

    pub fn on_change(&mut self, callback: impl FnMut(&[P::Line]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn on_touched(&mut self, callback: impl FnMut() + 'static) {
        self.on_touched = Some(Box::new(callback));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Errors of an active, invalid composition. Validators are only switched
    /// on while composing, and an empty list is not an error at this level.
    pub fn validate(&self) -> Option<ValidationErrors> {
        if !self.buffer.has_validations() {
            return None;
        }
        let mut errors = self.buffer.errors();
        if let Err(field_errors) = self.buffer.check(&self.config) {
            errors.merge(field_errors);
        }
        (!errors.is_empty()).then_some(errors)
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn is_form_empty(&self) -> bool {
        self.buffer.is_form_empty()
    }

    /// Sum of quantity times unit price over the current list.
    pub fn total(&self) -> Money {
        self.lines.iter().map(LineRecord::line_total).sum()
    }

    pub fn set_candidates(&mut self, candidates: Vec<Product>) {
        self.candidates = candidates;
    }

    pub fn candidates(&self) -> &[Product] {
        &self.candidates
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// sha256 over the CBOR encoding of the committed list.
    pub fn fingerprint(&self) -> anyhow::Result<String> {
        let (hash, _) = utils::cbor_digest(&self.lines)?;
        Ok(hash)
    }

    pub fn start_add(&mut self) -> Result<(), ListError> {
        self.ensure_writable()?;
        self.touch();

        if let ListState::Composing(mode) = &self.state {
            debug!(kind = P::KIND, ?mode, "composition already in progress");
            return Ok(());
        }
        self.buffer.reset();
        self.buffer.set_validations();
        self.state = ListState::Composing(Mode::New);
        debug!(kind = P::KIND, "composing a new line");
        Ok(())
    }

    /// Loads line `id` into the buffer once the user confirms. The prompt
    /// mentions discarding form data when the buffer holds unsaved input.
    pub async fn start_edit<G: ConfirmationGate>(
        &mut self,
        id: &LineId,
        gate: &mut G,
    ) -> Result<Confirmation, ListError> {
        self.ensure_writable()?;
        self.touch();

        let line = self.find(id)?.clone();
        let message = self
            .policy
            .update_prompt(&line, !self.buffer.is_form_empty());

        let answer = Confirmation::from(gate.prompt(&message).await);
        if answer == Confirmation::Declined {
            debug!(kind = P::KIND, line = %id, "edit declined");
            return Ok(answer);
        }

        self.buffer.reset();
        self.buffer.fill(&line);
        self.buffer.set_validations();
        self.state = ListState::Composing(Mode::Editing(id.clone()));
        debug!(kind = P::KIND, line = %id, "editing line");
        Ok(answer)
    }

    /// Deletes line `id` once the user confirms. Remaining lines keep their order.
    pub async fn remove<G: ConfirmationGate>(
        &mut self,
        id: &LineId,
        gate: &mut G,
    ) -> Result<Confirmation, ListError> {
        self.ensure_writable()?;
        self.touch();

        let message = self.policy.remove_prompt(self.find(id)?);

        let answer = Confirmation::from(gate.prompt(&message).await);
        if answer == Confirmation::Declined {
            debug!(kind = P::KIND, line = %id, "removal declined");
            return Ok(answer);
        }

        self.lines.retain(|line| line.id() != id);
        if self.state == ListState::Composing(Mode::Editing(id.clone())) {
            self.reset_form();
        }
        info!(kind = P::KIND, line = %id, total = %self.total(), "line removed");
        self.emit_change();
        Ok(answer)
    }

    pub fn commit(&mut self) -> Result<CommitOutcome, ListError> {
        self.ensure_writable()?;
        let ListState::Composing(mode) = self.state.clone() else {
            return Err(ListError::NotComposing);
        };
        self.touch();

        let parsed = match self.buffer.check(&self.config) {
            Ok(parsed) => parsed,
            Err(errors) => {
                self.buffer.apply(&errors);
                debug!(kind = P::KIND, ?errors, "line failed field validation");
                return Ok(CommitOutcome::Invalid(errors));
            }
        };

        let Some(product) = self.policy.resolve(parsed.product, &self.candidates) else {
            let errors =
                ValidationErrors::new().with(FieldName::Product, FieldError::UnknownProduct);
            self.buffer.apply(&errors);
            info!(kind = P::KIND, product = parsed.product.0, "selected item is not a candidate");
            return Ok(CommitOutcome::Invalid(errors));
        };

        let draft = LineDraft {
            product: &product,
            quantity: parsed.quantity,
            unit_price: parsed.unit_price,
        };
        if let Some(errors) = self.policy.pre_commit_check(&draft) {
            self.buffer.apply(&errors);
            info!(kind = P::KIND, ?errors, "line rejected by business rule");
            return Ok(CommitOutcome::Invalid(errors));
        }

        let editing = match &mode {
            Mode::Editing(id) => Some(id),
            Mode::New => None,
        };
        let id = match editing {
            Some(id) => id.clone(),
            None => LineId::Draft(utils::new_uuid_to_bech32(&self.config.draft_prefix)?),
        };
        let line = <P::Line as LineRecord>::new(
            id.clone(),
            product,
            parsed.quantity,
            parsed.unit_price,
        );

        let exists = self
            .lines
            .iter()
            .filter(|existing| Some(existing.id()) != editing)
            .any(|existing| self.policy.duplicate(existing, &line));

        if exists {
            let message = self.policy.duplicate_message();
            self.notify(message);
            info!(kind = P::KIND, product = parsed.product.0, "duplicate line rejected");
            return Ok(CommitOutcome::Duplicate);
        }

        if let Some(editing) = editing {
            self.lines.retain(|existing| existing.id() != editing);
        }
        self.lines.insert(0, line);
        self.reset_form();

        info!(kind = P::KIND, line = %id, total = %self.total(), "line committed");
        self.emit_change();
        Ok(CommitOutcome::Committed(id))
    }

    /// Discards the buffer and returns to idle. Never touches the list, so the
    /// value read right after reflects committed lines only.
    pub fn reset_form(&mut self) {
        self.buffer.reset();
        self.state = ListState::Idle;
    }

    /// Picks the product for the buffer and defaults the unit price to its
    /// list price.
    pub fn select_product(&mut self, id: Option<ProductId>) -> Result<(), ListError> {
        self.ensure_composing()?;
        self.touch();

        self.buffer.set_product(id);
        let Some(id) = id else {
            return Ok(());
        };
        match self.policy.resolve(id, &self.candidates) {
            Some(product) => self.buffer.set_unit_price(&product.price.to_string()),
            None => self.buffer.apply(
                &ValidationErrors::new().with(FieldName::Product, FieldError::UnknownProduct),
            ),
        }
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: &str) -> Result<(), ListError> {
        self.ensure_composing()?;
        self.touch();
        self.buffer.set_quantity(quantity);
        Ok(())
    }

    pub fn set_unit_price(&mut self, unit_price: &str) -> Result<(), ListError> {
        self.ensure_composing()?;
        self.touch();
        self.buffer.set_unit_price(unit_price);
        Ok(())
    }

    fn find(&self, id: &LineId) -> Result<&P::Line, ListError> {
        self.lines
            .iter()
            .find(|line| line.id() == id)
            .ok_or_else(|| ListError::UnknownLine(id.clone()))
    }

    fn ensure_writable(&self) -> Result<(), ListError> {
        if self.disabled {
            warn!(kind = P::KIND, "write attempted on a disabled item list");
            return Err(ListError::Disabled);
        }
        Ok(())
    }

    fn ensure_composing(&self) -> Result<(), ListError> {
        self.ensure_writable()?;
        if self.state == ListState::Idle {
            return Err(ListError::NotComposing);
        }
        Ok(())
    }

    fn touch(&mut self) {
        if self.touched {
            return;
        }
        self.touched = true;
        if let Some(callback) = self.on_touched.as_mut() {
            callback();
        }
    }

    /// Queues a message and drops the ones whose display time has passed.
    fn notify(&mut self, message: &str) {
        let now = Utc::now();
        self.notifications
            .retain(|note| note.raised_at + note.duration > now);
        self.notifications.push(Notification {
            message: message.to_owned(),
            raised_at: now,
            duration: self.config.notification_duration,
        });
    }

    fn emit_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.lines);
        }
    }
}
