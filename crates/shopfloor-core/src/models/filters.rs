//! Filter types for plan listing.

use super::PlanStatus;
use crate::params::ListPlans;

/// Filtering options for listing plans.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Restrict to a specific plan status
    pub status: Option<PlanStatus>,

    /// Include archived plans in the listing
    pub include_archived: bool,

    /// Restrict to plans for a specific order reference
    pub order_ref: Option<String>,
}

impl From<&ListPlans> for PlanFilter {
    fn from(params: &ListPlans) -> Self {
        Self {
            status: params.status,
            include_archived: params.archived,
            order_ref: params.order_ref.clone(),
        }
    }
}
