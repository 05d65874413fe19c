//! Document models for inventory-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business document kind. Each kind owns a number series and a party role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Purchase,
    Order,
    Receipt,
    Return,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Purchase => "purchase",
            DocumentKind::Order => "order",
            DocumentKind::Receipt => "receipt",
            DocumentKind::Return => "return",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "order" => DocumentKind::Order,
            "receipt" => DocumentKind::Receipt,
            "return" => DocumentKind::Return,
            _ => DocumentKind::Purchase,
        }
    }

    /// Prefix of the kind's document-number series.
    pub fn series_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Purchase => "FAC",
            DocumentKind::Order => "PED",
            DocumentKind::Receipt => "REC",
            DocumentKind::Return => "DEV",
        }
    }

    /// Which side of the catalog the document's party comes from.
    pub fn party_role(&self) -> &'static str {
        match self {
            DocumentKind::Purchase | DocumentKind::Receipt => "supplier",
            DocumentKind::Order | DocumentKind::Return => "customer",
        }
    }
}

/// Document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Processed,
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processed => "processed",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "processed" => DocumentStatus::Processed,
            "cancelled" => DocumentStatus::Cancelled,
            _ => DocumentStatus::Pending,
        }
    }
}

/// One document line referencing a product with a quantity.
///
/// Within a document, `product_id` is unique and `quantity` is at least 1;
/// both invariants are enforced by the draft builder, never per screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// Persisted business document: header, lines, and the total derived from
/// them at submit time (stored denormalized, never authoritative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub kind: String,
    pub number: String,
    pub party_id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub payment_method: String,
    pub notes: String,
    pub lines: Vec<LineItem>,
    pub total: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub party_id: i64,
    pub date: NaiveDate,
    pub status: DocumentStatus,
    pub payment_method: String,
    pub notes: String,
    pub lines: Vec<LineItem>,
    pub total: Decimal,
}

/// Input for updating a document. The kind and number never change once
/// issued; everything else is replaced when present.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub party_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub lines: Option<Vec<LineItem>>,
    pub total: Option<Decimal>,
}

/// Filter parameters for listing documents.
///
/// Conjunctive: a document matches when every provided criterion matches;
/// omitted criteria impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct ListDocumentsFilter {
    pub kind: Option<DocumentKind>,
    pub party_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
}

impl ListDocumentsFilter {
    /// Evaluate the filter against one document. Date bounds are inclusive
    /// and compared at day granularity.
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(kind) = self.kind {
            if doc.kind != kind.as_str() {
                return false;
            }
        }
        if let Some(party_id) = self.party_id {
            if doc.party_id != party_id {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if doc.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if doc.date > to {
                return false;
            }
        }
        if let Some(status) = self.status {
            if doc.status != status.as_str() {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn doc(party_id: i64, date: &str) -> Document {
        Document {
            id: 0,
            kind: "purchase".to_string(),
            number: "FAC-0001".to_string(),
            party_id,
            date: date.parse().unwrap(),
            status: "pending".to_string(),
            payment_method: String::new(),
            notes: String::new(),
            lines: vec![],
            total: Decimal::ZERO,
            created_utc: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ListDocumentsFilter::default();
        assert!(filter.matches(&doc(1, "2025-06-01")));
        assert!(filter.matches(&doc(99, "1999-01-01")));
    }

    #[test]
    fn party_filter_is_exact() {
        let filter = ListDocumentsFilter {
            party_id: Some(2),
            ..Default::default()
        };
        assert!(filter.matches(&doc(2, "2025-06-01")));
        assert!(!filter.matches(&doc(3, "2025-06-01")));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let filter = ListDocumentsFilter {
            date_from: Some("2025-06-01".parse().unwrap()),
            date_to: Some("2025-06-30".parse().unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&doc(1, "2025-06-01")));
        assert!(filter.matches(&doc(1, "2025-06-30")));
        assert!(filter.matches(&doc(1, "2025-06-15")));
        assert!(!filter.matches(&doc(1, "2025-05-31")));
        assert!(!filter.matches(&doc(1, "2025-07-01")));
    }

    #[test]
    fn criteria_are_conjunctive() {
        let filter = ListDocumentsFilter {
            party_id: Some(2),
            date_from: Some("2025-06-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&doc(2, "2025-06-02")));
        assert!(!filter.matches(&doc(2, "2025-05-02")));
        assert!(!filter.matches(&doc(1, "2025-06-02")));
    }
}
