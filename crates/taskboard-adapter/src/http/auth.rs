/*
[INPUT]:  Credentials and the client's session cookie
[OUTPUT]: Authenticated user profiles and session termination
[POS]:    HTTP layer - session endpoints (cookie based)
[UPDATE]: When auth endpoints or payloads change
*/

use reqwest::Method;
use tracing::debug;

use crate::http::{ApiClient, Result};
use crate::types::{LoginRequest, RegisterRequest, UserProfile};

impl ApiClient {
    /// Fetch the profile of the session owner
    ///
    /// GET /api/auth/profile
    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        let builder = self.request(Method::GET, "/api/auth/profile")?;
        self.send_json(builder).await
    }

    /// Check credentials and open a session
    ///
    /// POST /api/auth/login
    pub async fn login(&self, req: &LoginRequest) -> Result<UserProfile> {
        debug!(email = %req.email, "login request");
        let builder = self.request(Method::POST, "/api/auth/login")?.json(req);
        self.send_json(builder).await
    }

    /// Create an account and open a session
    ///
    /// POST /api/auth/register
    pub async fn register(&self, req: &RegisterRequest) -> Result<UserProfile> {
        debug!(username = %req.username, email = %req.email, "register request");
        let builder = self.request(Method::POST, "/api/auth/register")?.json(req);
        self.send_json(builder).await
    }

    /// Terminate the server-side session
    ///
    /// GET /api/auth/logout
    pub async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::GET, "/api/auth/logout")?;
        self.send_empty(builder).await
    }
}
