// Detection-model status endpoint

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;
use crate::models::MlStatusResponse;

impl BackendClient {
    /// Get detection-model quality metrics and training metadata.
    ///
    /// `GET /ml/status`
    pub async fn get_ml_status(&self) -> Result<MlStatusResponse, Error> {
        let url = self.url("ml/status")?;
        debug!("fetching ML model status");
        self.get(url).await
    }
}
