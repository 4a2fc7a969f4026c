//! # Repositories
//!
//! One repository per aggregate. Each holds a pool handle, translates rows
//! to and from the vendo-core types, and keeps every aggregate mutation
//! inside a single transaction.
//!
//! ## Row Conventions
//! - UUIDs: hyphenated TEXT, parsed on read
//! - Money: exact decimal TEXT, parsed on read
//! - Parse failures surface as [`DbError::DecodeFailed`]

pub mod cart;
pub mod product;
pub mod sale;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use vendo_core::Money;

/// Parse a TEXT id column back into a Uuid.
pub(crate) fn parse_uuid(field: &'static str, value: &str) -> DbResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| DbError::decode(field, e))
}

/// Parse a TEXT money column back into Money.
pub(crate) fn parse_money(field: &'static str, value: &str) -> DbResult<Money> {
    value
        .parse::<Decimal>()
        .map(Money::new)
        .map_err(|e| DbError::decode(field, e))
}

/// Encode Money for a TEXT column.
pub(crate) fn money_text(money: Money) -> String {
    money.amount().to_string()
}
