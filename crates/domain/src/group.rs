//! Group — a vendor-side grouping of device channels (rooms, switching groups, …).
//!
//! Groups are delivered with every state snapshot. Device adapters receive
//! the full group map on each synchronization pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::GroupId;

/// A HomematicIP group as reported by `getCurrentState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub group_type: String,
}

/// All groups of a home, keyed by id.
pub type GroupMap = BTreeMap<GroupId, Group>;
