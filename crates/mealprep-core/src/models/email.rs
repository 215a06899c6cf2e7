// ABOUTME: Outbound email message and grocery list line items
// ABOUTME: EmailMessage is created by the composer and consumed once by the dispatcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// A composed plain-text email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Ingredient quantity as sent by clients: either a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Numeric amount (`2`, `0.5`)
    Number(f64),
    /// Free-form amount (`a handful`, `1/2`)
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One line of a grocery list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Item name
    pub item: String,
    /// Quantity to buy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<Quantity>,
    /// Unit of measure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.item)?;
        let qty = self.qty.as_ref().map(ToString::to_string);
        let unit = self.unit.as_deref().map(str::trim).filter(|u| !u.is_empty());
        match (qty, unit) {
            (Some(qty), Some(unit)) => write!(f, ": {qty} {unit}"),
            (Some(qty), None) => write!(f, ": {qty}"),
            (None, Some(unit)) => write!(f, " ({unit})"),
            (None, None) => Ok(()),
        }
    }
}
