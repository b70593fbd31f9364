//! The single in-progress line under composition and its field validators
use super::config::ItemListConfig;
use super::error::FieldError;
use super::line::LineRecord;
use super::types::{LineId, Money, ProductId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldName {
    Product,
    Quantity,
    UnitPrice,
}

/// Whether a composition creates a line or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    New,
    Editing(LineId),
}

/// Values that can be "empty" from the user's point of view.
pub trait FieldValue {
    fn is_empty_value(&self) -> bool;
}

/// One input of the buffer. Carries its own validity state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field<T> {
    value: T,
    errors: Vec<FieldError>,
}

/// Errors keyed by the buffer field they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FieldName, Vec<FieldError>>);

/// Buffer contents that passed every field validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine {
    pub product: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    id: Field<Option<LineId>>,
    product: Field<Option<ProductId>>,
    quantity: Field<String>,
    unit_price: Field<String>,
    has_validations: bool,
}

impl FieldValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for ProductId {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl FieldValue for LineId {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().is_none_or(FieldValue::is_empty_value)
    }
}

/// Absent, `None` and the empty string all count as "no content".
pub fn is_empty_field<T: FieldValue>(field: &Field<T>) -> bool {
    field.value.is_empty_value()
}

impl<T> Field<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
    pub(crate) fn set(&mut self, value: T) {
        self.value = value;
        self.errors.clear();
    }
    pub(crate) fn set_error(&mut self, error: FieldError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }
    fn clear_errors(&mut self) {
        self.errors.clear();
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, field: FieldName, error: FieldError) {
        let errors = self.0.entry(field).or_default();
        if !errors.contains(&error) {
            errors.push(error);
        }
    }
    pub fn with(mut self, field: FieldName, error: FieldError) -> Self {
        self.insert(field, error);
        self
    }
    pub fn get(&self, field: FieldName) -> &[FieldError] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldError)> {
        self.0
            .iter()
            .flat_map(|(field, errors)| errors.iter().map(move |e| (*field, e)))
    }
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.0 {
            for error in errors {
                self.insert(field, error);
            }
        }
    }
}

impl EditBuffer {
    pub fn id(&self) -> &Field<Option<LineId>> {
        &self.id
    }
    pub fn product(&self) -> &Field<Option<ProductId>> {
        &self.product
    }
    pub fn quantity(&self) -> &Field<String> {
        &self.quantity
    }
    pub fn unit_price(&self) -> &Field<String> {
        &self.unit_price
    }
    pub fn has_validations(&self) -> bool {
        self.has_validations
    }

    pub fn is_form_empty(&self) -> bool {
        is_empty_field(&self.id)
            && is_empty_field(&self.product)
            && is_empty_field(&self.quantity)
            && is_empty_field(&self.unit_price)
    }

    pub(crate) fn set_product(&mut self, product: Option<ProductId>) {
        self.product.set(product);
    }
    pub(crate) fn set_quantity(&mut self, quantity: &str) {
        self.quantity.set(quantity.to_owned());
    }
    pub(crate) fn set_unit_price(&mut self, unit_price: &str) {
        self.unit_price.set(unit_price.to_owned());
    }

    pub(crate) fn set_validations(&mut self) {
        self.has_validations = true;
    }

    pub(crate) fn remove_validations(&mut self) {
        self.has_validations = false;
        self.product.clear_errors();
        self.quantity.clear_errors();
        self.unit_price.clear_errors();
    }

    /// Switches validation off, then clears every field.
    pub(crate) fn reset(&mut self) {
        self.remove_validations();
        self.id.set(None);
        self.product.set(None);
        self.quantity.set(String::new());
        self.unit_price.set(String::new());
    }

    pub(crate) fn fill<L: LineRecord>(&mut self, line: &L) {
        self.id.set(Some(line.id().clone()));
        self.product.set(Some(line.product().id));
        self.quantity.set(line.quantity().to_string());
        self.unit_price.set(line.unit_price().to_string());
    }

    /// Runs the field validators without touching the stored errors.
    pub fn check(&self, config: &ItemListConfig) -> Result<ParsedLine, ValidationErrors> {
        let product = check_product(&self.product.value);
        let quantity = check_quantity(&self.quantity.value, config);
        let unit_price = check_unit_price(&self.unit_price.value, config);

        match (product, quantity, unit_price) {
            (Ok(product), Ok(quantity), Ok(unit_price)) => Ok(ParsedLine {
                product,
                quantity,
                unit_price,
            }),
            (product, quantity, unit_price) => {
                let mut errors = ValidationErrors::new();
                if let Err(e) = product {
                    errors.insert(FieldName::Product, e);
                }
                if let Err(e) = quantity {
                    errors.insert(FieldName::Quantity, e);
                }
                if let Err(e) = unit_price {
                    errors.insert(FieldName::UnitPrice, e);
                }
                Err(errors)
            }
        }
    }

    /// Errors currently stored on the fields.
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let fields = [
            (FieldName::Product, self.product.errors()),
            (FieldName::Quantity, self.quantity.errors()),
            (FieldName::UnitPrice, self.unit_price.errors()),
        ];
        for (name, field_errors) in fields {
            for e in field_errors {
                errors.insert(name, e.clone());
            }
        }
        errors
    }

    pub(crate) fn apply(&mut self, errors: &ValidationErrors) {
        for (field, error) in errors.iter() {
            match field {
                FieldName::Product => self.product.set_error(error.clone()),
                FieldName::Quantity => self.quantity.set_error(error.clone()),
                FieldName::UnitPrice => self.unit_price.set_error(error.clone()),
            }
        }
    }
}

fn check_product(value: &Option<ProductId>) -> Result<ProductId, FieldError> {
    value.ok_or(FieldError::Required)
}

fn check_quantity(raw: &str, config: &ItemListConfig) -> Result<u32, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::Required);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::Pattern);
    }

    let too_large = || FieldError::Max {
        max: config.max_quantity.to_string(),
    };
    // digits only, so a parse failure can only be an overflow
    let qty = raw.parse::<u64>().map_err(|_| too_large())?;

    if qty < u64::from(config.min_quantity) {
        return Err(FieldError::Min {
            min: config.min_quantity.to_string(),
        });
    }
    if qty > u64::from(config.max_quantity) {
        return Err(too_large());
    }
    u32::try_from(qty).map_err(|_| too_large())
}

fn check_unit_price(raw: &str, config: &ItemListConfig) -> Result<Money, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::Required);
    }
    let price: Money = raw.parse()?;

    if price > config.max_unit_price {
        return Err(FieldError::Max {
            max: config.max_unit_price.to_string(),
        });
    }
    Ok(price)
}
