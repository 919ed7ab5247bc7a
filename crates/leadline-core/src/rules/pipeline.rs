use crate::domain::LeadStatus;
use crate::error::CoreError;

/// Kanban columns in display order.
pub const PIPELINE: [LeadStatus; 5] = LeadStatus::ALL;

pub fn advance_status(current: LeadStatus) -> Result<LeadStatus, CoreError> {
    current
        .next()
        .ok_or_else(|| CoreError::NoNextStatus(current.to_string()))
}

#[cfg(test)]
mod tests {
    use super::advance_status;
    use crate::domain::LeadStatus;
    use crate::error::CoreError;

    #[test]
    fn advance_walks_forward() {
        assert_eq!(advance_status(LeadStatus::Contacted), Ok(LeadStatus::Interested));
    }

    #[test]
    fn advance_rejects_terminal_states() {
        assert_eq!(
            advance_status(LeadStatus::Discarded),
            Err(CoreError::NoNextStatus("Discarded".to_string()))
        );
        assert!(advance_status(LeadStatus::Closed).is_err());
    }
}
