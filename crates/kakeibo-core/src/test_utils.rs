//! Test utilities for kakeibo-core
//!
//! Builders for canonical transactions so tests only spell out the fields
//! they care about.

use chrono::NaiveDate;

use crate::models::Transaction;

/// Builder for a [`Transaction`] with sensible defaults
///
/// Defaults: 2025-01-15, a 1000 yen grocery expense, calculated, not a transfer.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            tx: Transaction {
                id: id.into(),
                date: date(2025, 1, 15),
                description: "テスト取引".to_string(),
                amount: -1000,
                institution: "テスト銀行".to_string(),
                category: "食費".to_string(),
                subcategory: "食料品".to_string(),
                memo: String::new(),
                is_transfer: false,
                is_calculated: true,
            },
        }
    }

    pub fn date(mut self, year: i32, month: u32, day: u32) -> Self {
        self.tx.date = date(year, month, day);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.tx.date = date;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.tx.description = description.to_string();
        self
    }

    pub fn amount(mut self, amount: i64) -> Self {
        self.tx.amount = amount;
        self
    }

    pub fn institution(mut self, institution: &str) -> Self {
        self.tx.institution = institution.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.tx.category = category.to_string();
        self
    }

    pub fn subcategory(mut self, subcategory: &str) -> Self {
        self.tx.subcategory = subcategory.to_string();
        self
    }

    pub fn memo(mut self, memo: &str) -> Self {
        self.tx.memo = memo.to_string();
        self
    }

    pub fn transfer(mut self, is_transfer: bool) -> Self {
        self.tx.is_transfer = is_transfer;
        self
    }

    pub fn calculated(mut self, is_calculated: bool) -> Self {
        self.tx.is_calculated = is_calculated;
        self
    }

    pub fn build(self) -> Transaction {
        self.tx
    }
}

/// Shorthand for a valid calendar date; panics on an invalid one
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Record with only id, date, and amount set
pub fn tx(id: &str, (year, month, day): (i32, u32, u32), amount: i64) -> Transaction {
    TransactionBuilder::new(id)
        .date(year, month, day)
        .amount(amount)
        .build()
}
