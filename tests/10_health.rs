mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn binary_serves_health_and_pages() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("Hostel Complaints"));

    let res = client
        .get(format!("{}/complaints/my-complaints", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/auth/login");

    Ok(())
}

#[tokio::test]
async fn health_reports_store_in_process() -> Result<()> {
    let app = common::TestApp::new();
    let mut browser = app.browser();

    let res = browser.get("/health").await?;
    assert_eq!(res.status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&res.body)?;
    assert_eq!(body["data"]["store"], "ok");
    Ok(())
}
