use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AppointmentError, AppointmentStatus, StatusTransitionOutcome};

/// Status transitions go through a single server-side function so concurrent
/// staff sessions never race on a read-modify-write. This service only gates
/// the target status and relays the outcome; it never reads current state
/// first, and it applies nothing locally on failure.
pub struct StatusTransitionService {
    supabase: SupabaseClient,
}

impl StatusTransitionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Appointments can only ever be confirmed or cancelled by staff; pending
    /// exists solely as the initial state of web bookings. Re-cancelling a
    /// cancelled appointment reports success without changes, and a cancelled
    /// appointment may be confirmed again.
    pub fn is_valid_target(target: AppointmentStatus) -> bool {
        matches!(target, AppointmentStatus::Confirmed | AppointmentStatus::Cancelled)
    }

    pub async fn transition(
        &self,
        appointment_id: Uuid,
        target: AppointmentStatus,
    ) -> Result<StatusTransitionOutcome, AppointmentError> {
        if !Self::is_valid_target(target) {
            return Err(AppointmentError::InvalidTargetStatus(target));
        }

        info!("Transitioning appointment {} to {}", appointment_id, target);

        let outcome: StatusTransitionOutcome = self.supabase.rpc(
            "update_appointment_status",
            json!({
                "appointment_id": appointment_id,
                "new_status": target
            }),
            None,
        ).await?;

        if !outcome.success {
            let reason = outcome.error.clone()
                .unwrap_or_else(|| "no reason given".to_string());
            warn!("Transition of {} to {} rejected: {}", appointment_id, target, reason);
            return Err(AppointmentError::TransitionRejected(reason));
        }

        info!("Appointment {} now {}", appointment_id,
              outcome.status.unwrap_or(target));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_confirmed_and_cancelled_are_valid_targets() {
        assert!(StatusTransitionService::is_valid_target(AppointmentStatus::Confirmed));
        assert!(StatusTransitionService::is_valid_target(AppointmentStatus::Cancelled));
        assert!(!StatusTransitionService::is_valid_target(AppointmentStatus::Pending));
    }
}
