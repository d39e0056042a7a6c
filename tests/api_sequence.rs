use actix_web::web::Data;
use actix_web::{test, App};
use anyhow::Result;
use party_planner::auth::TokenContext;
use party_planner::db::{migrations, DbInterface};
use party_planner::{configure_app, settings};
use serde_json::{json, Value};
use serial_test::serial;

mod common;

/// Test the full party planning API sequence
///
/// This test needs an empty postgres database reachable via `DATABASE_URL`
/// (see [`common::database_url`] for the default).
///
/// Calls all exposed API endpoints in their intended manner.
#[actix_rt::test]
#[serial]
#[ignore]
async fn party_planning_sequence() -> Result<()> {
    common::setup_logging();
    common::cleanup_database().await?;

    let url = common::database_url();
    migrations::start_migration(&url).await?;

    let db_ctx = Data::new(DbInterface::connect(&settings::Database {
        url,
        max_connections: 2,
    })?);
    let token_ctx = Data::new(TokenContext::new("test_secret".to_string()));

    let app =
        test::init_service(App::new().configure(configure_app(db_ctx, token_ctx))).await;

    // Health check
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Healthy");

    // Sign up
    log::debug!("signing up alice...");
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(&json!({
            "username": "alice",
            "email": "alice@x.com",
            "password": "secret1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let alice: Value = test::read_body_json(resp).await;
    let alice_id = alice["id"].as_i64().unwrap();
    assert_eq!(alice["username"], "alice");
    assert_eq!(alice["email"], "alice@x.com");
    assert!(alice.get("password").is_none());
    assert!(alice.get("password_digest").is_none());

    // Duplicate signup must fail with 400
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(&json!({
            "username": "alice",
            "email": "other@x.com",
            "password": "secret1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Too short password must fail with 400
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(&json!({
            "username": "short",
            "email": "short@x.com",
            "password": "12345"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Login with wrong password must fail with 401
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form(&json!({ "username": "alice", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // Login
    log::debug!("logging in...");
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form(&json!({ "username": "alice", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let token_body: Value = test::read_body_json(resp).await;
    assert_eq!(token_body["token_type"], "bearer");
    let token = token_body["access_token"].as_str().unwrap().to_string();
    let bearer = format!("Bearer {}", token);

    // Create an event
    log::debug!("creating event...");
    let req = test::TestRequest::post()
        .uri("/events/")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({
            "title": "Party",
            "date": "2026-08-29T18:00:00",
            "location": "Home"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let event: Value = test::read_body_json(resp).await;
    let event_id = event["id"].as_i64().unwrap();
    assert_eq!(event["owner_id"].as_i64().unwrap(), alice_id);
    assert_eq!(event["title"], "Party");
    assert_eq!(event["location"], "Home");
    assert!(event["description"].is_null());

    // List owned events
    let req = test::TestRequest::get()
        .uri("/events/")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let events: Value = test::read_body_json(resp).await;
    assert_eq!(events.as_array().unwrap().len(), 1);

    // Partial update, only the location changes
    let req = test::TestRequest::put()
        .uri(&format!("/events/{}", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({ "location": "Garden" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"].as_i64().unwrap(), event_id);
    assert_eq!(updated["title"], "Party");
    assert_eq!(updated["location"], "Garden");

    // Empty update body returns the event unchanged
    let req = test::TestRequest::put()
        .uri(&format!("/events/{}", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let unchanged: Value = test::read_body_json(resp).await;
    assert_eq!(unchanged["location"], "Garden");

    // Batch invite bob
    log::debug!("inviting bob...");
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/invite/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({ "guest_emails": ["bob@x.com"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let invited: Value = test::read_body_json(resp).await;
    let invited = invited.as_array().unwrap();
    assert_eq!(invited.len(), 1);
    assert_eq!(invited[0]["name"], "bob");
    assert_eq!(invited[0]["email"], "bob@x.com");

    // Inviting the same email again creates no additional guest
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/invite/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({ "guest_emails": ["bob@x.com"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let invited: Value = test::read_body_json(resp).await;
    assert!(invited.as_array().unwrap().is_empty());

    // Add a single guest
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/guests/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({ "name": "Carol", "email": "carol@x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // List guests, bob and carol
    let req = test::TestRequest::get()
        .uri(&format!("/events/{}/guests/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let guests: Value = test::read_body_json(resp).await;
    assert_eq!(guests.as_array().unwrap().len(), 2);

    // RSVP as the owner
    log::debug!("submitting RSVP...");
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let rsvp: Value = test::read_body_json(resp).await;
    let rsvp_id = rsvp["id"].as_i64().unwrap();
    assert_eq!(rsvp["status"], "accepted");
    assert_eq!(rsvp["user_id"].as_i64().unwrap(), alice_id);

    // Submitting again updates the same row
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(&json!({ "status": "declined" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let rsvp: Value = test::read_body_json(resp).await;
    assert_eq!(rsvp["id"].as_i64().unwrap(), rsvp_id);
    assert_eq!(rsvp["status"], "declined");

    // Read the RSVP back
    let req = test::TestRequest::get()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let rsvp: Value = test::read_body_json(resp).await;
    assert_eq!(rsvp["id"].as_i64().unwrap(), rsvp_id);
    assert_eq!(rsvp["status"], "declined");

    // An unknown status is rejected before reaching the handler
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bearer))
        .set_json(&json!({ "status": "perhaps" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());

    Ok(())
}

/// Test that resources of one user are not visible to another
#[actix_rt::test]
#[serial]
#[ignore]
async fn ownership_scoping() -> Result<()> {
    common::setup_logging();
    common::cleanup_database().await?;

    let url = common::database_url();
    migrations::start_migration(&url).await?;

    let db_ctx = Data::new(DbInterface::connect(&settings::Database {
        url,
        max_connections: 2,
    })?);
    let token_ctx = Data::new(TokenContext::new("test_secret".to_string()));

    let app =
        test::init_service(App::new().configure(configure_app(db_ctx, token_ctx))).await;

    // Protected routes reject requests without a token
    let req = test::TestRequest::get().uri("/events/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let mut bearers = Vec::new();

    for (username, email) in &[("alice", "alice@x.com"), ("bob", "bob@x.com")] {
        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(&json!({
                "username": username,
                "email": email,
                "password": "secret1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_form(&json!({ "username": username, "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let token_body: Value = test::read_body_json(resp).await;
        bearers.push(format!("Bearer {}", token_body["access_token"].as_str().unwrap()));
    }

    let (alice_bearer, bob_bearer) = (bearers[0].clone(), bearers[1].clone());

    // Alice creates an event
    let req = test::TestRequest::post()
        .uri("/events/")
        .insert_header(("Authorization", alice_bearer.clone()))
        .set_json(&json!({
            "title": "Party",
            "date": "2026-08-29T18:00:00",
            "location": "Home"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let event: Value = test::read_body_json(resp).await;
    let event_id = event["id"].as_i64().unwrap();

    // Bob cannot see it in his list
    let req = test::TestRequest::get()
        .uri("/events/")
        .insert_header(("Authorization", bob_bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let events: Value = test::read_body_json(resp).await;
    assert!(events.as_array().unwrap().is_empty());

    // Bob cannot read, modify or delete it, nor touch its guests
    let gets = [
        format!("/events/{}", event_id),
        format!("/events/{}/guests/", event_id),
    ];
    for uri in &gets {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", bob_bearer.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404, "GET {} must be hidden", uri);
    }

    let req = test::TestRequest::put()
        .uri(&format!("/events/{}", event_id))
        .insert_header(("Authorization", bob_bearer.clone()))
        .set_json(&json!({ "title": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let req = test::TestRequest::delete()
        .uri(&format!("/events/{}", event_id))
        .insert_header(("Authorization", bob_bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    // Without an invite bob must not RSVP
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bob_bearer.clone()))
        .set_json(&json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    // After an invite matching his email the RSVP goes through
    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/invite/", event_id))
        .insert_header(("Authorization", alice_bearer.clone()))
        .set_json(&json!({ "guest_emails": ["bob@x.com"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::post()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bob_bearer.clone()))
        .set_json(&json!({ "status": "maybe" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Deleting the event removes its guests and RSVPs as well
    let req = test::TestRequest::delete()
        .uri(&format!("/events/{}", event_id))
        .insert_header(("Authorization", alice_bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Event deleted");

    let req = test::TestRequest::get()
        .uri(&format!("/events/{}/rsvp/", event_id))
        .insert_header(("Authorization", bob_bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    Ok(())
}
