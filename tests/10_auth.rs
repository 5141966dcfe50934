mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{unique_email, TestServer, PASSWORD};

#[tokio::test]
async fn health_endpoint_reports_database() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_login_and_me() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };
    let email = unique_email("auth");

    let register = || {
        server
            .client
            .post(server.url("/api/users/"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
    };

    let first = register().await?;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = register().await?;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let token = server.login(&email, PASSWORD).await?;
    let me: Value = server
        .client
        .get(server.url("/api/users/me"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["email"], email.as_str());

    let wrong = server
        .client
        .post(server.url("/api/token"))
        .form(&[("username", email.as_str()), ("password", "password124")])
        .send()
        .await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.headers()["www-authenticate"], "Bearer");

    let deleted = server
        .client
        .delete(server.url("/api/users/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_rejected() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let res = server.client.get(server.url("/api/properties/")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["www-authenticate"], "Bearer");

    let body: Value = res.json().await?;
    assert_eq!(body["detail"], "Could not validate credentials");
    Ok(())
}
