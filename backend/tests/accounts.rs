//! Sign-up, log-in and log-out.

// Shared helpers include ones this suite does not use.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use rstest::rstest;

use quill::domain::DUPLICATE_USERNAME_MESSAGE;
use quill::domain::ports::UserRepository;
use quill::domain::Username;
use quill::inbound::http::accounts::INVALID_LOGIN_MESSAGE;
use quill::test_support::{TEST_PASSWORD, TestWorld};
use support::{body_text, location, login_request, session_cookie};

fn signup_request(username: &str, password1: &str, password2: &str) -> TestRequest {
    TestRequest::post().uri("/auth/signup/").set_form([
        ("username", username),
        ("password1", password1),
        ("password2", password2),
    ])
}

#[actix_web::test]
async fn signing_up_creates_the_account_and_signs_in() {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let res = test::call_service(
        &app,
        signup_request("newbie", "a long passphrase", "a long passphrase").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res).as_deref(), Some("/"));
    let cookie = session_cookie(&res);

    let username = Username::new("newbie").expect("valid username");
    assert!(
        UserRepository::find_by_username(&world.store, &username)
            .await
            .expect("lookup")
            .is_some()
    );

    let feed = test::call_service(
        &app,
        TestRequest::get().uri("/follow/").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(feed.status(), StatusCode::OK);
    assert!(body_text(feed).await.contains(r#"<span class="viewer">newbie</span>"#));
}

#[rstest]
#[case::mismatch("newbie", "a long passphrase", "another passphrase", "password2")]
#[case::short("newbie", "short", "short", "password1")]
#[case::blank_username("", "a long passphrase", "a long passphrase", "username")]
#[actix_web::test]
async fn invalid_sign_ups_redisplay_the_form(
    #[case] username: &str,
    #[case] password1: &str,
    #[case] password2: &str,
    #[case] field: &str,
) {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let res = test::call_service(
        &app,
        signup_request(username, password1, password2).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains(r#"<ul class="errorlist">"#), "{field} should be flagged");
    assert!(html.contains(r#"action="/auth/signup/""#));
}

#[actix_web::test]
async fn taken_usernames_are_refused() {
    let world = TestWorld::new();
    world.user("ann").await;
    let app = test::init_service(world.app()).await;

    let res = test::call_service(
        &app,
        signup_request("ann", "a long passphrase", "a long passphrase").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains(DUPLICATE_USERNAME_MESSAGE));
}

#[actix_web::test]
async fn logging_in_follows_local_next_only() {
    let world = TestWorld::new();
    world.user("ann").await;
    let app = test::init_service(world.app()).await;

    let local = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "ann"),
                ("password", TEST_PASSWORD),
                ("next", "/follow/"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(location(&local).as_deref(), Some("/follow/"));

    let external = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "ann"),
                ("password", TEST_PASSWORD),
                ("next", "//evil.example/"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(location(&external).as_deref(), Some("/"));
}

#[actix_web::test]
async fn login_form_carries_next() {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let html = body_text(
        test::call_service(
            &app,
            TestRequest::get()
                .uri("/auth/login/?next=%2Fcreate%2F")
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(html.contains(r#"value="/create/""#));
}

#[rstest]
#[case::wrong_password("ann", "not the password")]
#[case::unknown_user("nobody", TEST_PASSWORD)]
#[case::blank("", "")]
#[actix_web::test]
async fn bad_credentials_redisplay_the_form(#[case] username: &str, #[case] password: &str) {
    let world = TestWorld::new();
    world.user("ann").await;
    let app = test::init_service(world.app()).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.response()
            .cookies()
            .all(|cookie| cookie.name() != "session")
    );
    assert!(body_text(res).await.contains(INVALID_LOGIN_MESSAGE));
}

#[actix_web::test]
async fn logging_out_ends_the_session() {
    let world = TestWorld::new();
    world.user("ann").await;
    let app = test::init_service(world.app()).await;
    let cookie = session_cookie(&test::call_service(&app, login_request("ann").to_request()).await);

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/auth/logout/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res);
    assert!(cleared.value().is_empty());

    let feed = test::call_service(
        &app,
        TestRequest::get().uri("/follow/").cookie(cleared).to_request(),
    )
    .await;
    assert_eq!(feed.status(), StatusCode::FOUND);
}
