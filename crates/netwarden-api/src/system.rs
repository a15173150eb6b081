// System metrics endpoint

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;
use crate::models::SystemStatsResponse;

impl BackendClient {
    /// Get host resource metrics.
    ///
    /// `GET /api/system/stats`
    pub async fn get_system_stats(&self) -> Result<SystemStatsResponse, Error> {
        let url = self.url("api/system/stats")?;
        debug!("fetching system stats");
        self.get(url).await
    }
}
