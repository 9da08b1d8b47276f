use chrono::Utc;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::DashboardStats;

pub struct StatsService {
    supabase: SupabaseClient,
}

impl StatsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Exact-count head queries; no appointment rows are transferred.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let today = Utc::now().date_naive();
        debug!("Fetching dashboard stats (today: {})", today);

        let total = self.supabase
            .count("/rest/v1/appointments?select=id", None)
            .await?;
        let pending = self.supabase
            .count("/rest/v1/appointments?select=id&status=eq.pending", None)
            .await?;
        let confirmed = self.supabase
            .count("/rest/v1/appointments?select=id&status=eq.confirmed", None)
            .await?;
        let today_count = self.supabase
            .count(&format!("/rest/v1/appointments?select=id&appointment_date=eq.{}", today), None)
            .await?;

        Ok(DashboardStats {
            total_appointments: total,
            pending_appointments: pending,
            confirmed_appointments: confirmed,
            today_appointments: today_count,
        })
    }
}
