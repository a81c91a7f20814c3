use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use super::{Payload, Submitter};

const TEST_PATH: &str = "/api/sn_devops/devops/tool/test";
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// DevOps integration user.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Basic base64(user:password)`.
    pub fn authorization(&self) -> String {
        let token = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(token))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Posts summaries to a ServiceNow DevOps instance.
pub struct ServiceNowClient {
    http: reqwest::Client,
    base_url: String,
    authorization: String,
    retries: u32,
}

impl ServiceNowClient {
    pub fn new(
        base_url: String,
        credentials: Credentials,
        timeout: Duration,
        retries: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: credentials.authorization(),
            retries,
        })
    }

    fn endpoint(&self, payload: &Payload) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}{}", self.base_url, TEST_PATH),
            [
                ("toolId", payload.tool_id.as_str()),
                ("testType", payload.test_type),
            ],
        )
        .with_context(|| format!("invalid endpoint base URL '{}'", self.base_url))
    }

    async fn post(&self, url: Url, body: String) -> Result<()> {
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .body(body)
            .send()
            .await
            .context("request to ServiceNow failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("ServiceNow responded with {}: {}", status, text.trim());
        }
        debug!(%status, "ServiceNow accepted the payload");
        Ok(())
    }
}

#[async_trait]
impl Submitter for ServiceNowClient {
    async fn submit(&self, payload: &Payload) -> Result<()> {
        let url = self.endpoint(payload)?;
        let body = serde_json::to_string(payload).context("failed to serialise payload")?;
        debug!(%url, "posting test summary");

        with_retries(self.retries, RETRY_BACKOFF, || {
            self.post(url.clone(), body.clone())
        })
        .await
        .with_context(|| format!("failed to POST test summary to ServiceNow\n\n{}", body))
    }

    fn name(&self) -> &str {
        "ServiceNow"
    }
}

/// Run `op` until it succeeds or `retries` extra attempts are used up,
/// waiting `backoff * attempt` between tries.
pub async fn with_retries<F, Fut>(retries: u32, backoff: Duration, mut op: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!(attempt, retries, "submission failed, retrying: {:#}", e);
                tokio::time::sleep(backoff * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn basic_authorization_header() {
        let credentials = Credentials::new("devops.user", "p@ss:word");
        assert_eq!(
            credentials.authorization(),
            "Basic ZGV2b3BzLnVzZXI6cEBzczp3b3Jk"
        );
        assert!(!format!("{:?}", credentials).contains("p@ss"));
    }

    #[test]
    fn endpoint_carries_tool_and_type() {
        let client = ServiceNowClient::new(
            "https://acme.service-now.com/".into(),
            Credentials::new("u", "p"),
            Duration::from_secs(5),
            0,
        )
        .unwrap();
        let payload = Payload {
            tool_id: "abc 123".into(),
            build_number: String::new(),
            build_id: String::new(),
            attempt_number: String::new(),
            stage_name: String::new(),
            workflow: String::new(),
            repository: String::new(),
            test_summaries: Vec::new(),
            file_content: String::new(),
            test_type: "NUnit",
        };
        assert_eq!(
            client.endpoint(&payload).unwrap().as_str(),
            "https://acme.service-now.com/api/sn_devops/devops/tool/test?toolId=abc+123&testType=NUnit"
        );
    }

    #[tokio::test]
    async fn retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        with_retries(3, Duration::ZERO, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                bail!("flaky");
            }
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_configured_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = with_retries(1, Duration::ZERO, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(anyhow::anyhow!("down"))
        })
        .await
        .unwrap_err();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(err.to_string(), "down");
    }
}
