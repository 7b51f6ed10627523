mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, titles};
use serde_json::json;

#[tokio::test]
async fn home_is_logged_out_without_session() {
    let app = TestApp::spawn().await;

    let resp = app.get("/", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["mode"], "logged_out");
    assert_eq!(resp.body["login_url"], "/login");
    assert_eq!(resp.body["signup_url"], "/signup");
    assert!(resp.body.get("links").is_none());
}

#[tokio::test]
async fn home_warns_until_username_is_set() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    let resp = app.get("/", Some(cookie.as_str())).await;
    assert_eq!(resp.body["mode"], "logged_in");
    assert_eq!(resp.body["welcome"], "ann@example.com");
    assert_eq!(resp.body["username_warning"], "No username set");
    assert!(resp.body["public_url"].is_null());

    app.set_username(&cookie, "Ann_B").await;
    let resp = app.get("/", Some(cookie.as_str())).await;
    assert_eq!(resp.body["welcome"], "ann_b");
    assert_eq!(resp.body["public_url"], "/ann_b");
    assert!(resp.body["username_warning"].is_null());
}

#[tokio::test]
async fn links_are_listed_oldest_first() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    for title in ["first", "second", "third"] {
        let resp = app.add_link(&cookie, title, "https://example.com").await;
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(resp.body["title"], title);
    }

    let home = app.get("/", Some(cookie.as_str())).await;
    assert_eq!(titles(&home.body["links"]), ["first", "second", "third"]);

    let listed = app.get("/links", Some(cookie.as_str())).await;
    assert_eq!(titles(&listed.body), ["first", "second", "third"]);
}

#[tokio::test]
async fn empty_title_or_url_is_rejected() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    let resp = app.add_link(&cookie, "", "https://example.com").await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["error"]["code"], "INVALID_INPUT");

    let resp = app.add_link(&cookie, "Blog", "").await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

    let resp = app
        .post("/links", Some(cookie.as_str()), json!({ "title": "Blog" }))
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

    let listed = app.get("/links", Some(cookie.as_str())).await;
    assert!(titles(&listed.body).is_empty());
}

#[tokio::test]
async fn non_http_url_is_rejected() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    let resp = app.add_link(&cookie, "x", "javascript:alert(1)").await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn adding_requires_a_session() {
    let app = TestApp::spawn().await;

    let resp = app
        .post(
            "/links",
            None,
            json!({ "title": "Blog", "url": "https://example.com" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn remove_deletes_exactly_one_owned_link() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    let a = app.add_link(&cookie, "a", "https://a.example").await;
    let b = app.add_link(&cookie, "b", "https://b.example").await;
    app.add_link(&cookie, "c", "https://c.example").await;
    let b_id = b.body["id"].as_i64().expect("id");

    let resp = app
        .send(Method::DELETE, &format!("/links/{b_id}"), Some(cookie.as_str()), None)
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let listed = app.get("/links", Some(cookie.as_str())).await;
    assert_eq!(titles(&listed.body), ["a", "c"]);

    // The form-friendly route does the same.
    let a_id = a.body["id"].as_i64().expect("id");
    let resp = app
        .post(&format!("/links/{a_id}/delete"), Some(cookie.as_str()), json!({}))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let listed = app.get("/links", Some(cookie.as_str())).await;
    assert_eq!(titles(&listed.body), ["c"]);
}

#[tokio::test]
async fn cannot_remove_another_users_link() {
    let app = TestApp::spawn().await;
    let ann = app.sign_up("ann@example.com").await;
    let bob = app.sign_up("bob@example.com").await;

    let link = app.add_link(&ann, "ann's", "https://a.example").await;
    let id = link.body["id"].as_i64().expect("id");

    let resp = app
        .send(Method::DELETE, &format!("/links/{id}"), Some(bob.as_str()), None)
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"]["message"], "Link not found");

    let listed = app.get("/links", Some(ann.as_str())).await;
    assert_eq!(titles(&listed.body), ["ann's"]);
}

#[tokio::test]
async fn duplicate_links_are_kept() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    app.add_link(&cookie, "same", "https://example.com").await;
    app.add_link(&cookie, "same", "https://example.com").await;

    let listed = app.get("/links", Some(cookie.as_str())).await;
    assert_eq!(titles(&listed.body), ["same", "same"]);
}

#[tokio::test]
async fn non_numeric_link_id_uses_error_envelope() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_up("ann@example.com").await;

    let resp = app
        .send(Method::DELETE, "/links/abc", Some(&cookie), None)
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["error"]["code"], "INVALID_INPUT");
}
