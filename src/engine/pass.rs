// src/engine/pass.rs
//
// Target pass (reassignment) validation and submission.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::selection::SelectionSet;
use crate::api::{ApiError, DistributionApi};
use crate::error::AllocationError;
use crate::models::{AssignableOfficer, ReassignmentRequest, WorkItem};

/// What the user is asked to confirm. Holds the frozen request that `confirm`
/// will submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassConfirmation {
    pub assignee: AssignableOfficer,
    pub request: ReassignmentRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationSummary {
    pub submission_id: Uuid,
    pub item_count: usize,
    pub invoice_numbers: Vec<String>,
    pub assignee_id: i64,
    pub assignee_label: String,
}

impl PassConfirmation {
    pub fn summary(&self) -> ConfirmationSummary {
        ConfirmationSummary {
            submission_id: self.request.submission_id(),
            item_count: self.request.len(),
            invoice_numbers: self.request.invoice_numbers().to_vec(),
            assignee_id: self.assignee.id,
            assignee_label: self.assignee.label.clone(),
        }
    }
}

/// Checks the local preconditions and freezes the request. Items are taken in
/// feed order so the id and invoice arrays stay positionally aligned.
pub fn build_request(
    selection: &SelectionSet,
    items: &[WorkItem],
    assignee: Option<&AssignableOfficer>,
) -> Result<PassConfirmation, AllocationError> {
    if selection.is_empty() {
        return Err(AllocationError::NoSelection);
    }
    let assignee = assignee.ok_or(AllocationError::NoAssignee)?;

    let chosen: Vec<&WorkItem> = items
        .iter()
        .filter(|i| selection.contains(i.item_id))
        .collect();
    if chosen.len() != selection.len() {
        // Selection is cleared on every refetch, so this only happens if a
        // caller bypassed the session.
        return Err(AllocationError::StaleSnapshot(
            "selection references targets that are no longer listed".into(),
        ));
    }

    Ok(PassConfirmation {
        assignee: assignee.clone(),
        request: ReassignmentRequest::from_items(assignee.id, chosen),
    })
}

#[derive(Clone)]
pub struct PassTransaction {
    api: Arc<dyn DistributionApi>,
}

impl PassTransaction {
    pub fn new(api: Arc<dyn DistributionApi>) -> Self {
        Self { api }
    }

    /// Submits the whole batch in one request. The backend either applies all of
    /// it or none of it.
    pub async fn submit(
        &self,
        source_officer_id: i64,
        request: &ReassignmentRequest,
    ) -> Result<(), AllocationError> {
        let submission_id = request.submission_id();
        info!(
            %submission_id,
            source_officer_id,
            assignee = request.assignee_officer_id(),
            items = request.len(),
            "submitting target pass"
        );

        match self.api.pass_targets(source_officer_id, request).await {
            Ok(()) => {
                info!(%submission_id, "target pass accepted");
                Ok(())
            }
            Err(e @ ApiError::Network(_)) => {
                error!(%submission_id, error = %e, "target pass transport failure");
                Err(AllocationError::TransactionTransportFailure(e.user_message()))
            }
            Err(ApiError::Malformed(detail)) => {
                error!(%submission_id, %detail, "target pass response malformed");
                Err(AllocationError::MalformedResponse(detail))
            }
            Err(e) => {
                let message = e.user_message();
                warn!(%submission_id, error = %e, %message, "target pass rejected");
                Err(AllocationError::TransactionRejected(message))
            }
        }
    }
}
