use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/pm-api-rust");
        cmd.env("PM_API_PORT", port.to_string())
            .env("AUTO_CREATE_TABLES", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/api/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Consider server ready on any non-404 response
                    if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Distinct owner id per call so suites sharing one database do not see
/// each other's rows.
pub fn unique_user_id() -> i32 {
    static COUNTER: AtomicI32 = AtomicI32::new(0);
    static BASE: OnceLock<i32> = OnceLock::new();

    let base = *BASE.get_or_init(|| {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs();
        ((secs % 20_000) as i32) * 100_000 + ((std::process::id() % 100) as i32) * 1_000
    });
    base + COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Caller-asserted auth object as the mother app frontend would send it.
pub fn auth(user_id: i32, is_admin: bool) -> Value {
    json!({
        "user_id": user_id,
        "first_name": "Test",
        "last_name": "User",
        "is_admin": is_admin,
    })
}

/// Create a project via the API and return its DTO. Panics on failure so
/// callers can focus on what they assert.
pub async fn create_project(
    client: &reqwest::Client,
    base_url: &str,
    auth: &Value,
    project_name: &str,
) -> Result<Value> {
    let res = client
        .post(format!("{}/api/projects", base_url))
        .json(&json!({ "auth": auth, "project_name": project_name }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "create failed");

    let body = res.json::<Value>().await?;
    assert_eq!(body["ok"], json!(true), "create not ok: {}", body);
    Ok(body["item"].clone())
}

/// PATCH a project's status and return (status code, body).
pub async fn patch_status(
    client: &reqwest::Client,
    base_url: &str,
    auth: &Value,
    project_id: i64,
    status: &str,
) -> Result<(StatusCode, Value)> {
    let res = client
        .patch(format!("{}/api/projects/{}/status", base_url, project_id))
        .json(&json!({ "auth": auth, "status": status }))
        .send()
        .await?;
    let code = res.status();
    let body = res.json::<Value>().await?;
    Ok((code, body))
}

/// POST /api/projects/list and return the items array.
pub async fn list_projects(
    client: &reqwest::Client,
    base_url: &str,
    auth: &Value,
    filters: Value,
) -> Result<Vec<Value>> {
    let res = client
        .post(format!("{}/api/projects/list", base_url))
        .json(&json!({ "auth": auth, "filters": filters }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "list failed");

    let body = res.json::<Value>().await?;
    assert_eq!(body["ok"], json!(true), "list not ok: {}", body);
    Ok(body["items"].as_array().cloned().unwrap_or_default())
}
