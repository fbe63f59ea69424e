//! Catalog record models.
//!
//! Records are immutable once loaded; identity is the integer `id` assigned
//! in the bundled datasets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{EventId, ResourceId};

/// A local service or support program in the resource directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub category: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A community event in the events listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub attendees: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
