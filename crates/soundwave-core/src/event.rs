//! Analytics event records.
//!
//! Every record is written exactly once and never mutated. Identifiers for
//! content, users and sessions are opaque strings owned by the surrounding
//! marketplace; only the event id is generated here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform tag recorded when the client does not send one.
pub const DEFAULT_PLATFORM: &str = "web";

/// Currency recorded when the client does not send one.
pub const DEFAULT_CURRENCY: &str = "SUI";

/// Transaction status recorded when the client does not send one.
pub const DEFAULT_TRANSACTION_STATUS: &str = "completed";

/// A single view of a piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentViewEvent {
    /// Server-generated event identifier.
    pub id: Uuid,
    /// The viewed content.
    pub content_id: String,
    /// The viewer, if signed in.
    pub user_id: Option<String>,
    /// Client session; generated when the client omits it.
    pub session_id: String,
    /// How long the content was watched or listened to, in seconds.
    pub view_duration: Option<i32>,
    /// Client platform tag (`web`, `ios`, ...).
    pub platform: String,
    /// Viewer country, if known.
    pub country: Option<String>,
    /// Referring page, if known.
    pub referrer: Option<String>,
    /// Server-assigned timestamp.
    pub viewed_at: DateTime<Utc>,
}

/// A non-view interaction such as a comment, follow, search or like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementEvent {
    /// Server-generated event identifier.
    pub id: Uuid,
    /// The acting user.
    pub user_id: String,
    /// Free-form interaction tag.
    pub event_type: String,
    /// The content interacted with, if any.
    pub content_id: Option<String>,
    /// Opaque client metadata, stored as-is.
    pub metadata: Option<serde_json::Value>,
    /// Server-assigned timestamp.
    pub occurred_at: DateTime<Utc>,
}

/// A money movement: purchase, mint, royalty payout and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    /// Server-generated event identifier.
    pub id: Uuid,
    /// Client-supplied or generated transaction reference.
    pub transaction_id: String,
    /// The paying or receiving user.
    pub user_id: String,
    /// The content involved, if any.
    pub content_id: Option<String>,
    /// The ticketed event involved, if any.
    pub event_id: Option<String>,
    /// Transaction-type tag (`purchase`, `mint`, `royalty`, ...).
    pub transaction_type: String,
    /// Gross amount. Never negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// ISO-ish currency code.
    pub currency: String,
    /// Marketplace share of `amount`.
    #[serde(with = "rust_decimal::serde::float")]
    pub platform_fee: Decimal,
    /// Creator share of `amount`.
    #[serde(with = "rust_decimal::serde::float")]
    pub creator_revenue: Decimal,
    /// How the buyer paid, if known.
    pub payment_method: Option<String>,
    /// Settlement status.
    pub status: String,
    /// Server-assigned timestamp.
    pub created_at: DateTime<Utc>,
}
