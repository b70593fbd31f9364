//! Identifiers, money and the cached product projection shared by every line kind
use super::error::FieldError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Reference to a product (an `Item` on the server side).
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(#[n(0)] pub u64);

/// Reference to a supplier or customer.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartyId(#[n(0)] pub u64);

// Use integers for currency: the value is held in cents
#[derive(minicbor::Encode, minicbor::Decode, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(#[n(0)] u64);

/// Identity of a committed line.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LineId {
    /// Assigned by the server for lines loaded with an existing document.
    #[n(0)]
    Stored(#[n(0)] u64),
    /// Client-local placeholder, a bech32 encoded uuid7.
    #[n(1)]
    Draft(#[n(0)] String),
}

/// The subset of a product the line editor needs: name for prompts, list price
/// for defaulting and the stock figure for the sale rule.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Product {
    #[n(0)]
    pub id: ProductId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub price: Money,
    #[n(3)]
    pub stock: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocDate(NaiveDate);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }
    pub fn cents(&self) -> u64 {
        self.0
    }
    /// Line amount for `quantity` units. Saturates instead of wrapping.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// Accepts `^[0-9]{1,8}(\.[0-9]{2})?$`, the format the price input enforces
impl FromStr for Money {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (s, None),
        };

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        if whole.is_empty() || whole.len() > 8 || !is_digits(whole) {
            return Err(FieldError::Pattern);
        }
        let cents = match fraction {
            None => 0,
            Some(fraction) if fraction.len() == 2 && is_digits(fraction) => {
                fraction.parse::<u64>().map_err(|_| FieldError::Pattern)?
            }
            Some(_) => return Err(FieldError::Pattern),
        };
        let whole = whole.parse::<u64>().map_err(|_| FieldError::Pattern)?;

        Ok(Money(whole * 100 + cents))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.fold(0u64, |acc, m| acc.saturating_add(m.0)))
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineId::Stored(id) => write!(f, "{id}"),
            LineId::Draft(id) => f.write_str(id),
        }
    }
}

impl DocDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
    pub fn to_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DocDate {
    fn from(value: NaiveDate) -> Self {
        DocDate(value)
    }
}

impl fmt::Display for DocDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// Encoded as days since 0001-01-01 (CE)
impl<C> minicbor::Encode<C> for DocDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(self.0.num_days_from_ce())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for DocDate {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(DocDate)
            .ok_or(minicbor::decode::Error::message(
                "failed to convert day count to a calendar date",
            ))
    }
}
