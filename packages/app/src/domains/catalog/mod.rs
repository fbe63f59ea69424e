//! Catalog domain - the static, read-only resource and event datasets.
//!
//! The datasets are version-controlled JSON compiled into the artifact with
//! `include_str!` and parsed exactly once on first access. There are no
//! mutation operations and no runtime reload; a new dataset means a new
//! deploy.

pub mod models;

pub use models::{EventRecord, ResourceRecord};

use lazy_static::lazy_static;

lazy_static! {
    static ref RESOURCES: Vec<ResourceRecord> =
        serde_json::from_str(include_str!("data/resources.json"))
            .expect("bundled resources.json must parse");
    static ref EVENTS: Vec<EventRecord> = serde_json::from_str(include_str!("data/events.json"))
        .expect("bundled events.json must parse");
}

/// All directory resources, in dataset order.
pub fn resources() -> &'static [ResourceRecord] {
    &RESOURCES
}

/// All community events, in dataset order.
pub fn events() -> &'static [EventRecord] {
    &EVENTS
}
