//! Wire types for the supplier partner API (camelCase JSON).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One availability entry pushed to the partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub date_time: DateTime<Utc>,
    pub vacancies: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Body of an availability push.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvailabilityPush<'a> {
    pub product_id: &'a str,
    pub availabilities: &'a [Availability],
}

/// Inclusive date range a deal applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// A time-limited promotional deal to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub external_product_id: String,
    pub deal_name: String,
    pub date_range: DateRange,
    pub discount_percentage: u8,
    pub notice_period_days: u32,
}

/// A deal as reported back by the partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub deal_id: String,
    pub external_product_id: String,
    pub deal_name: String,
    pub date_range: DateRange,
    pub discount_percentage: u8,
    pub notice_period_days: u32,
}

/// The partner's uniform response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}
