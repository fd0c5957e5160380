use crate::entities::contracts;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Money amount held in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid amount '{0}' (expected e.g. 1500 or 1500.50)")]
pub struct ParseAmountError(pub String);

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAmountError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty() || frac.len() > 2 {
            return Err(err());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let whole: i64 = whole.parse().map_err(|_| err())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Self)
            .ok_or_else(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub id: i32,
    pub client_id: i32,
    pub commercial_id: Option<i32>,
    pub total_amount: Amount,
    pub amount_due: Amount,
    pub created_at: String,
    pub signed: bool,
}

impl From<contracts::Model> for Contract {
    fn from(model: contracts::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            commercial_id: model.commercial_id,
            total_amount: Amount::from_cents(model.total_amount),
            amount_due: Amount::from_cents(model.amount_due),
            created_at: model.created_at,
            signed: model.signed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub client_id: i32,
    pub total_amount: Amount,
    pub amount_due: Amount,
    pub signed: bool,
}

/// Field changes; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ContractUpdate {
    pub total_amount: Option<Amount>,
    pub amount_due: Option<Amount>,
    pub signed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractFilter {
    #[default]
    All,
    Unsigned,
    Unpaid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!("1500".parse::<Amount>(), Ok(Amount::from_cents(150_000)));
        assert_eq!("1500.5".parse::<Amount>(), Ok(Amount::from_cents(150_050)));
        assert_eq!(" 0.07 ".parse::<Amount>(), Ok(Amount::from_cents(7)));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", "abc", "-5", "1.234", ".5", "1,50"] {
            assert!(bad.parse::<Amount>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Amount::from_cents(150_050).to_string(), "1500.50");
        assert_eq!(Amount::from_cents(7).to_string(), "0.07");
    }
}
