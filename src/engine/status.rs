// src/engine/status.rs
//
// Status derivation for distributed target items.
//
// Everything here is a pure function of a single `WorkItem` snapshot; there is
// no hidden state, so deriving twice always gives the same answer.

use serde::{Deserialize, Serialize};

use crate::models::{TargetStatus, WorkItem};

/// The two groupings a target list is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    #[default]
    Todo,
    Completed,
}

/// An item is completed only when both completion flags agree. Anything else,
/// including `Completed` with a missing `isComplete`, stays in the to-do bucket.
pub fn bucket_of(item: &WorkItem) -> Bucket {
    if item.overall_selected_status == TargetStatus::Completed && item.is_complete == Some(true) {
        Bucket::Completed
    } else {
        Bucket::Todo
    }
}

/// Whether `item` may join a batch reassignment while the caller views `viewing`.
pub fn is_selectable(item: &WorkItem, viewing: Bucket) -> bool {
    if viewing != Bucket::Todo || item.overall_selected_status != TargetStatus::Pending {
        return false;
    }

    let additional = item.additional().map(|a| is_pending(a.status.as_ref()));
    let package = item.package().map(|p| is_pending(p.items.status.as_ref()));

    if item.is_package_order {
        match (additional, package) {
            (Some(a), Some(p)) => a && p,
            (None, Some(p)) => p,
            (Some(a), None) => a,
            (None, None) => false,
        }
    } else {
        additional.unwrap_or(false)
    }
}

fn is_pending(status: Option<&TargetStatus>) -> bool {
    matches!(status, Some(TargetStatus::Pending))
}

/// Status fields of `item` holding a value this engine does not recognise, as
/// `(field, raw value)` pairs. Such an item is never selectable.
pub fn unknown_statuses(item: &WorkItem) -> Vec<(&'static str, &str)> {
    let fields = [
        ("overallSelectedStatus", Some(&item.overall_selected_status)),
        (
            "additionalItems.status",
            item.additional_items.as_ref().and_then(|a| a.status.as_ref()),
        ),
        (
            "packageItems.status",
            item.package_items.as_ref().and_then(|p| p.items.status.as_ref()),
        ),
    ];
    fields
        .into_iter()
        .filter_map(|(field, status)| match status {
            Some(TargetStatus::Unknown(raw)) => Some((field, raw.as_str())),
            _ => None,
        })
        .collect()
}

// ───────────────────────────────────────
// Labels and locale display table
// ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: &'static str,
}

/// Canonical label and badge colour.
pub fn status_badge(status: &TargetStatus) -> StatusBadge {
    match status {
        TargetStatus::Pending => StatusBadge { label: "Pending", color: "#FF070733" },
        TargetStatus::Opened => StatusBadge { label: "Opened", color: "#FDFF9980" },
        TargetStatus::Completed => StatusBadge { label: "Completed", color: "#D4F7D4" },
        TargetStatus::Unknown(_) => StatusBadge { label: "Unknown", color: "#E5E7EB" },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayLocale {
    #[default]
    English,
    Sinhala,
    Tamil,
}

impl DisplayLocale {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(DisplayLocale::English),
            "si" => Some(DisplayLocale::Sinhala),
            "ta" => Some(DisplayLocale::Tamil),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DisplayLocale::English => "en",
            DisplayLocale::Sinhala => "si",
            DisplayLocale::Tamil => "ta",
        }
    }
}

/// Display-only text for a status. Never branch on the returned string.
pub fn display_text(status: &TargetStatus, locale: DisplayLocale) -> &'static str {
    use DisplayLocale::*;
    match (status, locale) {
        (TargetStatus::Pending, English) => "Pending",
        (TargetStatus::Pending, Sinhala) => "අපරිසමාප්ත",
        (TargetStatus::Pending, Tamil) => "நிலுவையில்",
        (TargetStatus::Opened, English) => "Opened",
        (TargetStatus::Opened, Sinhala) => "විවෘත කළ",
        (TargetStatus::Opened, Tamil) => "திறக்கப்பட்டது",
        (TargetStatus::Completed, English) => "Completed",
        (TargetStatus::Completed, Sinhala) => "සම්පූර්ණයි",
        (TargetStatus::Completed, Tamil) => "முடிக்கப்பட்டது",
        (TargetStatus::Unknown(_), English) => "Unknown",
        (TargetStatus::Unknown(_), Sinhala) => "නොදන්නා",
        (TargetStatus::Unknown(_), Tamil) => "தெரியாதது",
    }
}

// ───────────────────────────────────────
// Per-item view
// ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub packed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub item_id: i64,
    pub order_id: i64,
    pub invoice_number: String,
    pub bucket: Bucket,
    pub selectable: bool,
    pub selected: bool,
    pub status: StatusBadge,
    pub status_text: &'static str,
    pub locked: bool,
    pub additional: Option<Progress>,
    pub package: Option<Progress>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub fn classify(item: &WorkItem, viewing: Bucket, locale: DisplayLocale) -> ItemView {
    ItemView {
        item_id: item.item_id,
        order_id: item.order_id,
        invoice_number: item.invoice_number.clone(),
        bucket: bucket_of(item),
        selectable: is_selectable(item, viewing),
        selected: false,
        status: status_badge(&item.overall_selected_status),
        status_text: display_text(&item.overall_selected_status, locale),
        locked: item.package().map(|p| p.is_locked).unwrap_or(false),
        additional: item.additional().map(|a| Progress {
            packed: a.packed,
            total: a.total,
        }),
        package: item.package().map(|p| Progress {
            packed: p.items.packed,
            total: p.items.total,
        }),
        completed_at: item.completed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{completed_item, pending_item, sub};
    use crate::models::PackageItems;

    #[test]
    fn unknown_sub_statuses_are_reported_per_field() {
        let item = WorkItem {
            is_package_order: true,
            additional_items: Some(sub(2, Some(TargetStatus::Unknown("Held".into())))),
            package_items: Some(PackageItems {
                items: sub(1, Some(TargetStatus::Pending)),
                is_locked: false,
            }),
            ..pending_item(9)
        };
        assert!(!is_selectable(&item, Bucket::Todo));
        assert_eq!(unknown_statuses(&item), vec![("additionalItems.status", "Held")]);
        assert!(unknown_statuses(&pending_item(1)).is_empty());
    }

    const STATUSES: [Option<TargetStatus>; 4] = [
        None,
        Some(TargetStatus::Pending),
        Some(TargetStatus::Opened),
        Some(TargetStatus::Completed),
    ];

    fn build(
        is_package: bool,
        has_additional: bool,
        has_package: bool,
        additional_status: Option<TargetStatus>,
        package_status: Option<TargetStatus>,
        overall: TargetStatus,
    ) -> WorkItem {
        WorkItem {
            overall_selected_status: overall,
            is_package_order: is_package,
            additional_items: Some(sub(if has_additional { 2 } else { 0 }, additional_status)),
            package_items: Some(PackageItems {
                items: sub(if has_package { 5 } else { 0 }, package_status),
                is_locked: false,
            }),
            ..pending_item(1)
        }
    }

    /// The rule table written out case by case, independent of `is_selectable`.
    fn expected(
        is_package: bool,
        has_additional: bool,
        has_package: bool,
        additional: &Option<TargetStatus>,
        package: &Option<TargetStatus>,
        overall: &TargetStatus,
    ) -> bool {
        let pending = |s: &Option<TargetStatus>| *s == Some(TargetStatus::Pending);
        if *overall != TargetStatus::Pending {
            return false;
        }
        match (is_package, has_additional, has_package) {
            (true, true, true) => pending(additional) && pending(package),
            (true, false, true) => pending(package),
            (true, true, false) => pending(additional),
            (true, false, false) => false,
            (false, true, _) => pending(additional),
            (false, false, _) => false,
        }
    }

    #[test]
    fn selectability_truth_table_is_exhaustive() {
        let overalls = [
            TargetStatus::Pending,
            TargetStatus::Opened,
            TargetStatus::Completed,
            TargetStatus::Unknown("Dispatched".into()),
        ];
        let mut checked = 0;
        for is_package in [false, true] {
            for has_additional in [false, true] {
                for has_package in [false, true] {
                    for additional in STATUSES.iter() {
                        for package in STATUSES.iter() {
                            for overall in overalls.iter() {
                                let item = build(
                                    is_package,
                                    has_additional,
                                    has_package,
                                    additional.clone(),
                                    package.clone(),
                                    overall.clone(),
                                );
                                let want = expected(
                                    is_package,
                                    has_additional,
                                    has_package,
                                    additional,
                                    package,
                                    overall,
                                );
                                assert_eq!(
                                    is_selectable(&item, Bucket::Todo),
                                    want,
                                    "package={is_package} add={has_additional} pkg={has_package} \
                                     add_status={additional:?} pkg_status={package:?} overall={overall:?}"
                                );
                                assert!(!is_selectable(&item, Bucket::Completed));
                                checked += 1;
                            }
                        }
                    }
                }
            }
        }
        assert_eq!(checked, 2 * 2 * 2 * 4 * 4 * 4);
    }

    #[test]
    fn bucketing_requires_both_completion_flags() {
        for overall in [TargetStatus::Pending, TargetStatus::Opened, TargetStatus::Completed] {
            for is_complete in [None, Some(false), Some(true)] {
                let item = WorkItem {
                    overall_selected_status: overall.clone(),
                    is_complete,
                    ..pending_item(9)
                };
                let want = if overall == TargetStatus::Completed && is_complete == Some(true) {
                    Bucket::Completed
                } else {
                    Bucket::Todo
                };
                assert_eq!(bucket_of(&item), want, "{overall:?} / {is_complete:?}");
            }
        }
    }

    #[test]
    fn plain_pending_order_is_selectable_todo() {
        let item = pending_item(1);
        assert_eq!(bucket_of(&item), Bucket::Todo);
        assert!(is_selectable(&item, Bucket::Todo));
    }

    #[test]
    fn package_order_with_opened_additional_items_is_not_selectable() {
        let item = build(
            true,
            true,
            true,
            Some(TargetStatus::Opened),
            Some(TargetStatus::Pending),
            TargetStatus::Pending,
        );
        assert_eq!(bucket_of(&item), Bucket::Todo);
        assert!(!is_selectable(&item, Bucket::Todo));
    }

    #[test]
    fn completed_without_is_complete_stays_todo_and_unselectable() {
        let item = WorkItem {
            is_complete: None,
            ..completed_item(3)
        };
        assert_eq!(bucket_of(&item), Bucket::Todo);
        assert!(!is_selectable(&item, Bucket::Todo));
    }

    #[test]
    fn classification_is_stable_across_calls() {
        let item = build(
            true,
            false,
            true,
            None,
            Some(TargetStatus::Pending),
            TargetStatus::Pending,
        );
        let first = classify(&item, Bucket::Todo, DisplayLocale::Tamil);
        let second = classify(&item, Bucket::Todo, DisplayLocale::Tamil);
        assert_eq!(first, second);
        assert!(first.selectable);
        assert_eq!(first.status_text, "நிலுவையில்");
        assert_eq!(first.additional, None);
        assert_eq!(first.package, Some(Progress { packed: 0, total: 5 }));
    }

    #[test]
    fn labels_cover_unknown_statuses() {
        assert_eq!(status_badge(&TargetStatus::Opened).label, "Opened");
        assert_eq!(
            status_badge(&TargetStatus::Unknown("Lost".into())).label,
            "Unknown"
        );
        assert_eq!(display_text(&TargetStatus::Completed, DisplayLocale::English), "Completed");
        assert_eq!(DisplayLocale::from_code(" TA "), Some(DisplayLocale::Tamil));
        assert_eq!(DisplayLocale::from_code("fr"), None);
    }
}
