/*
[INPUT]:  Nothing beyond the backend origin
[OUTPUT]: Backend liveness signal
[POS]:    HTTP layer - public health endpoint (no auth required)
[UPDATE]: When the liveness endpoint changes
*/

use reqwest::Method;

use crate::http::{ApiClient, Result};

impl ApiClient {
    /// Check that the backend answers at all
    ///
    /// GET /api/health
    pub async fn health(&self) -> Result<()> {
        let builder = self.request(Method::GET, "/api/health")?;
        self.send_empty(builder).await
    }
}
