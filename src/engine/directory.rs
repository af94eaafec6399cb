// src/engine/directory.rs
//
// Assignable officer directory.

use std::sync::Arc;

use tracing::{info, warn};

use super::status::DisplayLocale;
use crate::api::{ApiError, DistributionApi};
use crate::error::AllocationError;
use crate::models::{AssignableOfficer, Officer};

pub const ASSIGNABLE_ROLE: &str = "Distribution Officer";

/// Identifiers of the officer that must never be offered as a target. The
/// backend may key an officer by numeric id or by employee id, so both are
/// compared against both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficerIdentity {
    pub id: i64,
    pub emp_id: Option<String>,
}

impl OfficerIdentity {
    pub fn new(id: i64, emp_id: Option<String>) -> Self {
        Self { id, emp_id }
    }

    pub fn matches(&self, officer: &Officer) -> bool {
        let id = self.id.to_string();
        matches_key(officer, &id)
            || self
                .emp_id
                .as_deref()
                .is_some_and(|emp| matches_key(officer, emp))
    }
}

/// True when `key` names `officer` by either of its identifiers.
pub fn matches_key(officer: &Officer, key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && (officer.id.to_string() == key || officer.emp_id.trim().eq_ignore_ascii_case(key))
}

pub fn display_name(officer: &Officer, locale: DisplayLocale) -> String {
    let (first, last) = match locale {
        DisplayLocale::English => (None, None),
        DisplayLocale::Sinhala => (
            officer.first_name_sinhala.as_deref(),
            officer.last_name_sinhala.as_deref(),
        ),
        DisplayLocale::Tamil => (
            officer.first_name_tamil.as_deref(),
            officer.last_name_tamil.as_deref(),
        ),
    };
    let localized = join_name(first.unwrap_or(""), last.unwrap_or(""));
    if !localized.is_empty() {
        return localized;
    }

    let english = join_name(&officer.first_name_english, &officer.last_name_english);
    if english.is_empty() {
        officer.emp_id.trim().to_owned()
    } else {
        english
    }
}

fn join_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_owned()
}

pub fn to_assignable(officer: &Officer, locale: DisplayLocale) -> AssignableOfficer {
    let display_name = display_name(officer, locale);
    let emp_id = officer.emp_id.trim().to_owned();
    let label = if display_name == emp_id {
        emp_id.clone()
    } else {
        format!("{display_name} ({emp_id})")
    };
    AssignableOfficer {
        id: officer.id,
        emp_id,
        display_name,
        label,
        job_role: officer.job_role.clone(),
    }
}

/// Keeps assignable-role officers that are not `exclude`.
pub fn filter_assignable(
    officers: &[Officer],
    exclude: &OfficerIdentity,
    locale: DisplayLocale,
) -> Vec<AssignableOfficer> {
    officers
        .iter()
        .filter(|o| o.job_role.trim().eq_ignore_ascii_case(ASSIGNABLE_ROLE))
        .filter(|o| !exclude.matches(o))
        .map(|o| to_assignable(o, locale))
        .collect()
}

#[derive(Clone)]
pub struct OfficerDirectory {
    api: Arc<dyn DistributionApi>,
    locale: DisplayLocale,
}

impl OfficerDirectory {
    pub fn new(api: Arc<dyn DistributionApi>, locale: DisplayLocale) -> Self {
        Self { api, locale }
    }

    pub fn locale(&self) -> DisplayLocale {
        self.locale
    }

    pub async fn list_assignable_officers(
        &self,
        exclude: &OfficerIdentity,
    ) -> Result<Vec<AssignableOfficer>, AllocationError> {
        let officers = self.api.fetch_distribution_officers().await.map_err(|e| {
            warn!(error = %e, "officer directory fetch failed");
            match e {
                ApiError::Malformed(detail) => AllocationError::MalformedResponse(detail),
                other => AllocationError::DirectoryUnavailable(other.user_message()),
            }
        })?;

        let assignable = filter_assignable(&officers, exclude, self.locale);
        info!(
            fetched = officers.len(),
            assignable = assignable.len(),
            excluded_officer = exclude.id,
            "officer directory loaded"
        );
        Ok(assignable)
    }
}
