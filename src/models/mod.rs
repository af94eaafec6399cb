// src/models/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ───────────────────────────────────────
// Work item status (backend-sourced enum)
// ───────────────────────────────────────

/// Status reported by the distribution backend for a target item or one of its
/// sub-collections. Anything outside the three known values is kept verbatim in
/// `Unknown` so it can be reported as a data-quality defect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetStatus {
    Pending,
    Opened,
    Completed,
    Unknown(String),
}

impl From<String> for TargetStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Pending" => TargetStatus::Pending,
            "Opened" => TargetStatus::Opened,
            "Completed" => TargetStatus::Completed,
            _ => TargetStatus::Unknown(raw),
        }
    }
}

impl From<TargetStatus> for String {
    fn from(status: TargetStatus) -> Self {
        match status {
            TargetStatus::Pending => "Pending".into(),
            TargetStatus::Opened => "Opened".into(),
            TargetStatus::Completed => "Completed".into(),
            TargetStatus::Unknown(raw) => raw,
        }
    }
}

// ───────────────────────────────────────
// Work items (distributed target items)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubItems {
    pub total: u32,
    #[serde(default)]
    pub packed: u32,
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub status: Option<TargetStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageItems {
    #[serde(flatten)]
    pub items: SubItems,
    #[serde(default)]
    pub is_locked: bool, // locked by a manager
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub item_id: i64,
    pub order_id: i64,
    pub invoice_number: String,
    #[serde(alias = "selectedStatus")]
    pub overall_selected_status: TargetStatus,
    #[serde(default)]
    pub is_package_order: bool,
    #[serde(default)]
    pub additional_items: Option<SubItems>,
    #[serde(default)]
    pub package_items: Option<PackageItems>,
    #[serde(default)]
    pub is_complete: Option<bool>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkItem {
    /// Additional items are only considered present when the backend reports a
    /// non-zero total.
    pub fn additional(&self) -> Option<&SubItems> {
        self.additional_items.as_ref().filter(|a| a.total > 0)
    }

    pub fn package(&self) -> Option<&PackageItems> {
        self.package_items.as_ref().filter(|p| p.items.total > 0)
    }
}

// ───────────────────────────────────────
// Officers
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub id: i64,
    pub emp_id: String,
    #[serde(default)]
    pub first_name_english: String,
    #[serde(default)]
    pub last_name_english: String,
    #[serde(default)]
    pub first_name_sinhala: Option<String>,
    #[serde(default)]
    pub last_name_sinhala: Option<String>,
    #[serde(default)]
    pub first_name_tamil: Option<String>,
    #[serde(default)]
    pub last_name_tamil: Option<String>,
    pub job_role: String,
}

/// An officer as offered to the caller for reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignableOfficer {
    pub id: i64,
    pub emp_id: String,
    pub display_name: String,
    pub label: String,
    pub job_role: String,
}

// ───────────────────────────────────────
// Reassignment (target pass)
// ───────────────────────────────────────

/// An immutable pass request. The three id/number vectors are positionally
/// aligned: index `i` of each refers to the same work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentRequest {
    submission_id: Uuid,
    assignee_officer_id: i64,
    item_ids: Vec<i64>,
    invoice_numbers: Vec<String>,
    process_order_ids: Vec<i64>,
}

impl ReassignmentRequest {
    pub fn from_items<'a>(
        assignee_officer_id: i64,
        items: impl IntoIterator<Item = &'a WorkItem>,
    ) -> Self {
        let mut item_ids = Vec::new();
        let mut invoice_numbers = Vec::new();
        let mut process_order_ids = Vec::new();
        for item in items {
            item_ids.push(item.item_id);
            invoice_numbers.push(item.invoice_number.clone());
            process_order_ids.push(item.order_id);
        }
        Self {
            submission_id: Uuid::new_v4(),
            assignee_officer_id,
            item_ids,
            invoice_numbers,
            process_order_ids,
        }
    }

    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    pub fn assignee_officer_id(&self) -> i64 {
        self.assignee_officer_id
    }

    pub fn item_ids(&self) -> &[i64] {
        &self.item_ids
    }

    pub fn invoice_numbers(&self) -> &[String] {
        &self.invoice_numbers
    }

    pub fn process_order_ids(&self) -> &[i64] {
        &self.process_order_ids
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    pub fn to_body(&self) -> TargetPassBody {
        TargetPassBody {
            assignee_officer_id: self.assignee_officer_id,
            target_items: self.item_ids.clone(),
            invoice_numbers: self.invoice_numbers.clone(),
            process_order_id: self.process_order_ids.clone(),
        }
    }
}

// ───────────────────────────────────────
// Wire DTOs
// ───────────────────────────────────────

/// POST /distribution-manager/target-pass/{officerId}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPassBody {
    pub assignee_officer_id: i64,
    pub target_items: Vec<i64>,
    pub invoice_numbers: Vec<String>,
    pub process_order_id: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPassResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// List responses arrive either bare or wrapped in `{ success, message, data }`.
#[derive(Debug, Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de>"))]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Envelope {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        data: Option<Vec<T>>,
    },
}

/// Error bodies from the backend; only `message` is read.
#[derive(Debug, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
}
