use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const PASSWORD: &str = "password123";

/// The server binary running against `DATABASE_URL` on a free port.
/// Killed when dropped.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    child: Child,
}

impl TestServer {
    /// `None` when no database is configured, so callers can skip
    pub async fn start() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv();
        if std::env::var("DATABASE_URL").map_or(true, |url| url.is_empty()) {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return Ok(None);
        }

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let child = Command::new(env!("CARGO_BIN_EXE_alerte-compteur"))
            .arg("serve")
            .env("PORT", port.to_string())
            .env("SECRET_KEY", "integration-test-secret")
            .env("DATABASE_RUN_MIGRATIONS", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let mut server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            child,
        };
        server.wait_ready(Duration::from_secs(20)).await?;
        Ok(Some(server))
    }

    async fn wait_ready(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait()? {
                anyhow::bail!("server exited early with {}", status);
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a fresh account and return its email and bearer token
    pub async fn new_user(&self, prefix: &str) -> Result<(String, String)> {
        let email = unique_email(prefix);
        let res = self
            .client
            .post(self.url("/api/users/"))
            .json(&serde_json::json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let token = self.login(&email, PASSWORD).await?;
        Ok((email, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body: serde_json::Value = res.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("no access_token in login response")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Emails and PDLs must be unique across runs against a shared database
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}{}", std::process::id(), nanos % 1_000_000_000)
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, unique_suffix())
}

/// 14-character PDL derived from the clock
pub fn unique_pdl() -> String {
    let digits = unique_suffix();
    format!("{:0>14}", &digits[digits.len().saturating_sub(14)..])
}
