#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use hostel_complaints::config::{AdminEmails, AppConfig};
use hostel_complaints::database::MemoryStore;
use hostel_complaints::{app, AppState};

pub const PASSWORD: &str = "password123";
pub const ADMIN1_EMAIL: &str = "warden1@lnmiit.ac.in";
pub const ADMIN2_EMAIL: &str = "warden2@lnmiit.ac.in";

/// The router over a fresh memory store, with two admin slots configured.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.admins = AdminEmails::new([Some(ADMIN1_EMAIL), Some(ADMIN2_EMAIL), None, None]);
        let store = Arc::new(MemoryStore::new());
        let router = app(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// A browser with an empty cookie jar.
    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Registers `email` in `hostel` and returns a browser logged in as it.
    pub async fn logged_in(&self, email: &str, hostel: u8) -> Result<Browser> {
        let mut browser = self.browser();
        let res = browser.register(email, hostel).await?;
        assert_eq!(res.location(), Some("/auth/login"), "registration of {} failed: {}", email, res.body);
        let res = browser.login(email, PASSWORD).await?;
        assert_eq!(res.location(), Some("/"), "login of {} failed", email);
        Ok(browser)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Drives the router in-process, carrying the session cookie between
/// requests the way a browser would.
pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

impl Browser {
    pub async fn get(&mut self, path: &str) -> Result<TestResponse> {
        let request = self.request("GET", path).body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Result<TestResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))?;
        self.send(request).await
    }

    /// Follows the redirect in `res`, if any.
    pub async fn follow(&mut self, res: TestResponse) -> Result<TestResponse> {
        match res.location {
            Some(location) => self.get(&location).await,
            None => Ok(res),
        }
    }

    pub async fn register(&mut self, email: &str, hostel: u8) -> Result<TestResponse> {
        let hostel = hostel.to_string();
        self.post_form(
            "/auth/register",
            &[
                ("email", email),
                ("password", PASSWORD),
                ("password2", PASSWORD),
                ("hostelNumber", hostel.as_str()),
            ],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<TestResponse> {
        self.post_form("/auth/login", &[("email", email), ("password", password)])
            .await
    }

    pub async fn submit_complaint(&mut self, title: &str) -> Result<TestResponse> {
        self.post_form(
            "/complaints/add",
            &[
                ("roomNo", "B-214"),
                ("mobileNo", "9876543210"),
                ("rollNo", "21UCS001"),
                ("title", title),
                ("description", "Needs fixing soon"),
            ],
        )
        .await
    }

    pub async fn update_status(&mut self, complaint_id: &str, status: &str) -> Result<TestResponse> {
        self.post_form(
            "/complaints/update-status",
            &[("complaintId", complaint_id), ("status", status)],
        )
        .await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str()?;
            let pair = value.split(';').next().unwrap_or_default().to_string();
            if value.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                self.cookie = Some(pair);
            }
        }

        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().map(str::to_string))
            .transpose()?;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = String::from_utf8(bytes.to_vec())?;

        Ok(TestResponse { status, location, body })
    }
}

/// The real binary on a free port, killed when dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_hostel-complaints"))
            .arg("serve")
            .env("APP_ENV", "development")
            .env("STORE_BACKEND", "memory")
            .env("HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
