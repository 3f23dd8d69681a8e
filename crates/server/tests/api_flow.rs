mod common;

use common::{bearer, TestApp};
use serde_json::json;

#[tokio::test]
async fn register_login_refresh_revoke() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, user) = app
        .call("POST", "/api/users", None, Some(json!({"email": "walt@breakingbad.com", "password": "04234"})))
        .await?;
    assert_eq!(status, 201);
    assert_eq!(user, json!({"id": 1, "email": "walt@breakingbad.com", "is_chirpy_red": false}));

    let (status, session) = app
        .call("POST", "/api/login", None, Some(json!({"email": "walt@breakingbad.com", "password": "04234"})))
        .await?;
    assert_eq!(status, 200);
    assert_eq!(session["id"], 1);
    assert_eq!(session["is_chirpy_red"], false);
    let refresh = session["refresh_token"].as_str().unwrap_or_default().to_string();
    assert_eq!(refresh.len(), 64);

    let (status, body) = app.call("POST", "/api/refresh", Some(&bearer(&refresh)), None).await?;
    assert_eq!(status, 200);
    let access = body["token"].as_str().unwrap_or_default().to_string();
    assert_eq!(app.state.auth.validate_access_token(&access)?, 1);

    let (status, _) = app.call("POST", "/api/revoke", Some(&bearer(&refresh)), None).await?;
    assert_eq!(status, 204);
    let (status, body) = app.call("POST", "/api/refresh", Some(&bearer(&refresh)), None).await?;
    assert_eq!(status, 401);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_401() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    app.signup("a@b.c", "right").await?;

    let (status, body) = app
        .call("POST", "/api/login", None, Some(json!({"email": "a@b.c", "password": "wrong"})))
        .await?;
    assert_eq!(status, 401);
    assert!(body.get("token").is_none());

    let (status, _) = app
        .call("POST", "/api/login", None, Some(json!({"email": "x@y.z", "password": "right"})))
        .await?;
    assert_eq!(status, 401);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_409() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let creds = json!({"email": "a@b.c", "password": "pw"});
    assert_eq!(app.call("POST", "/api/users", None, Some(creds.clone())).await?.0, 201);
    let (status, body) = app.call("POST", "/api/users", None, Some(creds)).await?;
    assert_eq!(status, 409);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))?;
    let resp = app.send(req).await?;
    assert_eq!(resp.status(), 400);

    let (status, _) = app.call("POST", "/api/users", None, Some(json!({"email": "a@b.c"}))).await?;
    assert_eq!(status, 400);
    Ok(())
}

#[tokio::test]
async fn update_user_requires_token_and_keeps_red_flag() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (id, token, _) = app.signup("a@b.c", "one").await?;

    let new_creds = json!({"email": "new@b.c", "password": "two"});
    let (status, _) = app.call("PUT", "/api/users", None, Some(new_creds.clone())).await?;
    assert_eq!(status, 401);
    let (status, _) = app.call("PUT", "/api/users", Some("Bearer garbage"), Some(new_creds.clone())).await?;
    assert_eq!(status, 401);

    let (status, _) = app
        .call("POST", "/api/polka/webhooks", None, Some(json!({"event": "user.upgraded", "data": {"user_id": id}})))
        .await?;
    assert_eq!(status, 204);

    let (status, body) = app.call("PUT", "/api/users", Some(&bearer(&token)), Some(new_creds)).await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"id": id, "email": "new@b.c", "is_chirpy_red": true}));

    let (status, _) = app
        .call("POST", "/api/login", None, Some(json!({"email": "new@b.c", "password": "two"})))
        .await?;
    assert_eq!(status, 200);
    Ok(())
}

#[tokio::test]
async fn webhook_ignores_unknown_events_and_404s_unknown_users() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (id, _, _) = app.signup("a@b.c", "pw").await?;

    let (status, _) = app
        .call("POST", "/api/polka/webhooks", None, Some(json!({"event": "user.payment_failed", "data": {"user_id": id}})))
        .await?;
    assert_eq!(status, 204);
    let (status, _) = app
        .call("POST", "/api/polka/webhooks", None, Some(json!({"event": "user.upgraded", "data": {"user_id": 999}})))
        .await?;
    assert_eq!(status, 404);

    let (_, session) = app
        .call("POST", "/api/login", None, Some(json!({"email": "a@b.c", "password": "pw"})))
        .await?;
    assert_eq!(session["is_chirpy_red"], false);
    Ok(())
}

#[tokio::test]
async fn webhook_enforces_configured_api_key() -> anyhow::Result<()> {
    let app = TestApp::with_api_key(Some("f271c81ff7084ee5b99a5091b42d486e")).await?;
    let (id, _, _) = app.signup("a@b.c", "pw").await?;
    let event = json!({"event": "user.upgraded", "data": {"user_id": id}});

    let (status, _) = app.call("POST", "/api/polka/webhooks", None, Some(event.clone())).await?;
    assert_eq!(status, 401);
    let (status, _) = app
        .call("POST", "/api/polka/webhooks", Some("ApiKey wrong"), Some(event.clone()))
        .await?;
    assert_eq!(status, 401);
    let (status, _) = app
        .call("POST", "/api/polka/webhooks", Some("ApiKey f271c81ff7084ee5b99a5091b42d486e"), Some(event))
        .await?;
    assert_eq!(status, 204);
    Ok(())
}

#[tokio::test]
async fn forged_access_tokens_are_401() -> anyhow::Result<()> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let app = TestApp::new().await?;
    let (id, _, _) = app.signup("a@b.c", "pw").await?;
    let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_secs() as i64;
    let creds = json!({"email": "new@b.c", "password": "pw2"});

    // expired, correctly signed
    let expired = encode(
        &Header::default(),
        &json!({"iss": "chirpy", "sub": id.to_string(), "iat": now - 120, "exp": now - 60}),
        &EncodingKey::from_secret(common::SECRET.as_bytes()),
    )?;
    let (status, body) = app.call("PUT", "/api/users", Some(&bearer(&expired)), Some(creds.clone())).await?;
    assert_eq!(status, 401);
    assert!(body["error"].is_string());

    // valid claims, wrong key
    let wrong_key = encode(
        &Header::default(),
        &json!({"iss": "chirpy", "sub": id.to_string(), "iat": now, "exp": now + 3600}),
        &EncodingKey::from_secret(b"someone-elses-secret"),
    )?;
    let (status, _) = app.call("PUT", "/api/users", Some(&bearer(&wrong_key)), Some(creds.clone())).await?;
    assert_eq!(status, 401);

    // wrong issuer
    let wrong_issuer = encode(
        &Header::default(),
        &json!({"iss": "not-chirpy", "sub": id.to_string(), "iat": now, "exp": now + 3600}),
        &EncodingKey::from_secret(common::SECRET.as_bytes()),
    )?;
    let (status, _) = app.call("PUT", "/api/users", Some(&bearer(&wrong_issuer)), Some(creds)).await?;
    assert_eq!(status, 401);

    // user unchanged
    let (status, _) = app
        .call("POST", "/api/login", None, Some(json!({"email": "a@b.c", "password": "pw"})))
        .await?;
    assert_eq!(status, 200);
    Ok(())
}
