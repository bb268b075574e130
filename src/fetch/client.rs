use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes feed requests; wrap it to add headers, retries or fixtures.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
