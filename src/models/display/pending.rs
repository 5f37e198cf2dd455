//! Pending-action display model

use serde::Serialize;
use tabled::Tabled;

use crate::offline::PendingAction;
use crate::output::formatters::format_timestamp_millis;

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PendingActionDisplay {
    #[tabled(rename = "ID")]
    pub id: i64,

    #[tabled(rename = "ACTION")]
    pub action: String,

    #[tabled(rename = "QUEUED")]
    pub queued: String,

    #[tabled(rename = "SYNCED")]
    pub synced: bool,
}

impl From<&PendingAction> for PendingActionDisplay {
    fn from(action: &PendingAction) -> Self {
        Self {
            id: action.id,
            action: action.action.clone(),
            queued: format_timestamp_millis(action.timestamp),
            synced: action.synced,
        }
    }
}
