mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{TestApp, ADMIN2_EMAIL, PASSWORD};

#[tokio::test]
async fn foreign_email_is_rejected_and_no_user_created() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();

    let res = browser.register("student@gmail.com", 1).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.contains("Email must end with @lnmiit.ac.in"));
    assert_eq!(app.store.user_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn invalid_form_reports_every_rule() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();

    let res = browser
        .post_form(
            "/auth/register",
            &[
                ("email", "student@lnmiit.ac.in"),
                ("password", "short"),
                ("password2", "different"),
                ("hostelNumber", "7"),
            ],
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.contains("Password should be of minimum length 8"));
    assert!(res.body.contains("Passwords do not match"));
    assert!(res.body.contains("Hostel number must be between 1 and 5"));
    // a valid email is kept in the form
    assert!(res.body.contains("value=\"student@lnmiit.ac.in\""));
    Ok(())
}

#[tokio::test]
async fn registration_flashes_on_login_page() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();

    let res = browser.register("student@lnmiit.ac.in", 2).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/auth/login"));

    let page = browser.follow(res).await?;
    assert!(page.body.contains("Successfully registered! Please Log in..."));

    // flash messages are shown once
    let again = browser.get("/auth/login").await?;
    assert!(!again.body.contains("Successfully registered!"));
    Ok(())
}

#[tokio::test]
async fn flash_waits_through_non_page_responses() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();

    let res = browser.register("student@lnmiit.ac.in", 2).await?;
    assert_eq!(res.location(), Some("/auth/login"));

    let health = browser.get("/health").await?;
    assert_eq!(health.status, StatusCode::OK);
    let css = browser.get("/static/style.css").await?;
    assert_eq!(css.status, StatusCode::OK);

    let page = browser.get("/auth/login").await?;
    assert!(page.body.contains("Successfully registered! Please Log in..."));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_keeps_single_user() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();

    browser.register("student@lnmiit.ac.in", 2).await?;
    let res = browser.register("Student@lnmiit.ac.in", 3).await?;
    assert_eq!(res.location(), Some("/auth/register"));

    let page = browser.follow(res).await?;
    assert!(page.body.contains("Email already exists"));
    assert_eq!(app.store.user_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_share_one_message() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();
    browser.register("student@lnmiit.ac.in", 2).await?;

    for (email, password) in [
        ("student@lnmiit.ac.in", "wrong-password"),
        ("ghost@lnmiit.ac.in", PASSWORD),
    ] {
        let res = browser.login(email, password).await?;
        assert_eq!(res.location(), Some("/auth/login"));
        let page = browser.follow(res).await?;
        assert!(page.body.contains("Invalid email or password"));
    }
    Ok(())
}

#[tokio::test]
async fn login_then_logout() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.logged_in("student@lnmiit.ac.in", 2).await?;

    let profile = browser.get("/user/profile").await?;
    assert_eq!(profile.status, StatusCode::OK);
    assert!(profile.body.contains("student@lnmiit.ac.in"));

    // logged-in users are kept off the login and registration pages
    let res = browser.get("/auth/login").await?;
    assert_eq!(res.location(), Some("/"));
    let res = browser.get("/auth/register").await?;
    assert_eq!(res.location(), Some("/"));

    let res = browser.get("/auth/logout").await?;
    assert_eq!(res.location(), Some("/"));

    let res = browser.get("/user/profile").await?;
    assert_eq!(res.location(), Some("/auth/login"));
    let page = browser.follow(res).await?;
    assert!(page.body.contains("Please log in to view that resource"));
    Ok(())
}

#[tokio::test]
async fn configured_admin_email_gets_admin_pages() -> Result<()> {
    let app = TestApp::new();
    let mut admin = app.logged_in(ADMIN2_EMAIL, 2).await?;

    let res = admin.get("/admin").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("admin2"));

    let profile = admin.get("/user/profile").await?;
    assert!(profile.body.contains("admin2"));
    Ok(())
}

#[tokio::test]
async fn admin_pages_turn_away_others() -> Result<()> {
    let app = TestApp::new();

    let mut anonymous = app.browser();
    let res = anonymous.get("/admin").await?;
    assert_eq!(res.location(), Some("/auth/login"));

    let mut client = app.logged_in("student@lnmiit.ac.in", 2).await?;
    for path in ["/admin", "/complaints/resolved"] {
        let res = client.get(path).await?;
        assert_eq!(res.location(), Some("/"), "{} let a client through", path);
        let page = client.follow(res).await?;
        assert!(page.body.contains("You are not authorized to see this route"));
    }
    Ok(())
}

#[tokio::test]
async fn unknown_path_renders_not_found_page() -> Result<()> {
    let app = TestApp::new();
    let mut browser = app.browser();

    let res = browser.get("/no/such/page").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("404"));
    Ok(())
}
