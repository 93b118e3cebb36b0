use std::{future::Future, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use serde_json::{Value, json};
use stackr_core::identity::{IdentityProvider, VerifiedIdentity};
use stackr_store_sqlite::SqliteStore;
use tower::ServiceExt;

use crate::{AppState, api_router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("credential rejected")]
struct Rejected;

/// Accepts credentials of the form `subject|email|name`.
struct FakeIdentity;

impl IdentityProvider for FakeIdentity {
  type Error = Rejected;

  fn verify(
    &self,
    credential: String,
  ) -> impl Future<Output = Result<VerifiedIdentity, Rejected>> + Send + '_ {
    async move {
      let mut parts = credential.splitn(3, '|');
      match (parts.next(), parts.next(), parts.next()) {
        (Some(sub), Some(email), Some(name)) => {
          Ok(VerifiedIdentity::new(sub, email, name, "https://img/a.png"))
        }
        _ => Err(Rejected),
      }
    }
  }
}

async fn make_state() -> AppState<SqliteStore, FakeIdentity> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(Arc::new(store), Arc::new(FakeIdentity))
}

async fn call(
  state: &AppState<SqliteStore, FakeIdentity>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  api_router(state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn sign_in(state: &AppState<SqliteStore, FakeIdentity>, credential: &str) -> Value {
  let resp = call(state, "POST", "/auth/signin", Some(json!({ "credential": credential }))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  json_body(resp).await
}

async fn create_stack(
  state: &AppState<SqliteStore, FakeIdentity>,
  creator_id: &str,
  title: &str,
  category: &str,
) -> Value {
  let body = json!({
    "title": title,
    "description": "A stack",
    "category": category,
    "creator_id": creator_id,
  });
  let resp = call(state, "POST", "/stacks", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  json_body(resp).await
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn signin_is_idempotent_per_subject() {
  let state = make_state().await;
  let first = sign_in(&state, "sub-1|ada@example.com|Ada Lovelace").await;
  let again = sign_in(&state, "sub-1|ada@example.com|Ada Lovelace").await;

  assert_eq!(first["id"], again["id"]);
  assert_eq!(first["username"], "adalovelace");
}

#[tokio::test]
async fn signin_with_bad_credential_is_unauthorized() {
  let state = make_state().await;
  let resp = call(&state, "POST", "/auth/signin", Some(json!({ "credential": "garbage" }))).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(json_body(resp).await["kind"], "verification_failed");
}

#[tokio::test]
async fn signin_with_taken_email_conflicts() {
  let state = make_state().await;
  sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let resp = call(
    &state,
    "POST",
    "/auth/signin",
    Some(json!({ "credential": "sub-2|ada@example.com|Impostor" })),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert_eq!(json_body(resp).await["kind"], "duplicate_identity");
}

#[tokio::test]
async fn login_for_unknown_identity_is_not_found() {
  let state = make_state().await;
  let resp = call(
    &state,
    "POST",
    "/auth/login",
    Some(json!({ "credential": "sub-9|nobody@example.com|Nobody" })),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Creators ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_creator_merges_fields() {
  let state = make_state().await;
  let creator = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let id = creator["id"].as_str().unwrap();

  let resp = call(
    &state,
    "PATCH",
    &format!("/creators/{id}"),
    Some(json!({ "bio": "Analyst", "github": "ada" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let got = json_body(call(&state, "GET", &format!("/creators/{id}"), None).await).await;
  assert_eq!(got["bio"], "Analyst");
  assert_eq!(got["github"], "ada");
  assert_eq!(got["name"], "Ada");
}

#[tokio::test]
async fn get_unknown_creator_is_not_found() {
  let state = make_state().await;
  let resp = call(&state, "GET", "/creators/CR-000000", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["kind"], "not_found");
}

#[tokio::test]
async fn creator_stacks_are_paginated() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let grace = sign_in(&state, "sub-2|grace@example.com|Grace").await;
  let ada_id = ada["id"].as_str().unwrap();
  for n in 0..3 {
    create_stack(&state, ada_id, &format!("Ada {n}"), "programming").await;
  }
  create_stack(&state, grace["id"].as_str().unwrap(), "Grace", "design").await;

  let resp = call(&state, "GET", &format!("/creators/{ada_id}/stacks?limit=2"), None).await;
  let body = json_body(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 2);
  assert_eq!(body["metadata"]["total"], 3);
  assert_eq!(body["metadata"]["next"], json!({ "page": 2, "limit": 2 }));
}

// ─── Stacks ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_stack() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let stack = create_stack(&state, ada["id"].as_str().unwrap(), "Rust web", "programming").await;
  let id = stack["id"].as_str().unwrap();

  let got = json_body(call(&state, "GET", &format!("/stacks/{id}"), None).await).await;
  assert_eq!(got["title"], "Rust web");
  assert_eq!(got["creator"]["username"], "ada");
  assert_eq!(got["rating"], 0.0);
  assert_eq!(got["reviews"], json!([]));
}

#[tokio::test]
async fn create_stack_for_unknown_creator_is_not_found() {
  let state = make_state().await;
  let body = json!({
    "title": "Orphan",
    "description": "No owner",
    "category": "design",
    "creator_id": "CR-ffffff",
  });
  let resp = call(&state, "POST", "/stacks", Some(body)).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["kind"], "creator_not_found");
}

#[tokio::test]
async fn create_stack_with_long_title_is_bad_request() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let body = json!({
    "title": "x".repeat(101),
    "description": "Too long",
    "category": "design",
    "creator_id": ada["id"],
  });
  let resp = call(&state, "POST", "/stacks", Some(body)).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["kind"], "validation_failed");
}

#[tokio::test]
async fn list_uses_default_page_and_limit() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let id = ada["id"].as_str().unwrap();
  for n in 0..12 {
    create_stack(&state, id, &format!("Stack {n}"), "programming").await;
  }

  let body = json_body(call(&state, "GET", "/stacks", None).await).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 10);
  assert_eq!(body["metadata"]["total"], 12);
  assert_eq!(body["metadata"]["total_pages"], 2);
  assert_eq!(body["metadata"]["next"], json!({ "page": 2, "limit": 10 }));
  assert!(body["metadata"].get("previous").is_none());
}

#[tokio::test]
async fn list_filters_by_category() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let id = ada["id"].as_str().unwrap();
  create_stack(&state, id, "Figma kit", "design").await;
  create_stack(&state, id, "Rust kit", "programming").await;

  let body = json_body(call(&state, "GET", "/stacks?category=design", None).await).await;
  let data = body["data"].as_array().unwrap();
  assert_eq!(data.len(), 1);
  assert_eq!(data[0]["title"], "Figma kit");
}

#[tokio::test]
async fn list_combines_paging_with_category() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let id = ada["id"].as_str().unwrap();
  for n in 0..7 {
    create_stack(&state, id, &format!("Design {n}"), "design").await;
  }
  create_stack(&state, id, "Rust kit", "programming").await;

  let body =
    json_body(call(&state, "GET", "/stacks?page=2&limit=5&category=design", None).await).await;
  let titles: Vec<_> = body["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["title"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(titles, ["Design 5", "Design 6"]);
  assert_eq!(body["metadata"]["total"], 7);
  assert_eq!(body["metadata"]["page"], 2);
  assert_eq!(body["metadata"]["limit"], 5);
  assert_eq!(body["metadata"]["previous"], json!({ "page": 1, "limit": 5 }));
  assert!(body["metadata"].get("next").is_none());
}

#[tokio::test]
async fn list_at_the_largest_page_number_is_empty() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  create_stack(&state, ada["id"].as_str().unwrap(), "Only", "design").await;

  let resp = call(&state, "GET", &format!("/stacks?page={}", u64::MAX), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert!(body["data"].as_array().unwrap().is_empty());
  assert!(body["metadata"].get("next").is_none());
  assert_eq!(body["metadata"]["page"], u64::MAX);
}

#[tokio::test]
async fn list_rejects_page_zero() {
  let state = make_state().await;
  let resp = call(&state, "GET", "/stacks?page=0", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_rejects_unknown_category() {
  let state = make_state().await;
  let resp = call(&state, "GET", "/stacks?category=cooking", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_and_delete_stack() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let stack = create_stack(&state, ada["id"].as_str().unwrap(), "Draft", "business").await;
  let uri = format!("/stacks/{}", stack["id"].as_str().unwrap());

  let patched = json_body(call(&state, "PATCH", &uri, Some(json!({ "title": "Final" }))).await).await;
  assert_eq!(patched["title"], "Final");
  assert_eq!(patched["category"], "business");

  let resp = call(&state, "DELETE", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let resp = call(&state, "GET", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Reviews and ratings ─────────────────────────────────────────────────────

#[tokio::test]
async fn reviews_surface_in_top_rated_after_recompute() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let ada_id = ada["id"].as_str().unwrap();
  let low = create_stack(&state, ada_id, "Low", "marketing").await;
  let high = create_stack(&state, ada_id, "High", "marketing").await;

  for (stack, rate) in [(&low, 2.0), (&high, 5.0), (&high, 4.0)] {
    let uri = format!("/stacks/{}/reviews", stack["id"].as_str().unwrap());
    let body = json!({ "creator_id": ada_id, "rate": rate, "comment": "ok" });
    let resp = call(&state, "POST", &uri, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  // Ratings are stale until a recomputation pass runs.
  let top = json_body(call(&state, "GET", "/stacks/top", None).await).await;
  assert!(top.as_array().unwrap().iter().all(|s| s["rating"] == 0.0));

  let resp = call(&state, "POST", "/ratings/recompute", None).await;
  assert_eq!(json_body(resp).await["updated"], 2);

  let top = json_body(call(&state, "GET", "/stacks/top?limit=1", None).await).await;
  let top = top.as_array().unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0]["title"], "High");
  assert_eq!(top[0]["rating"], 4.5);
}

#[tokio::test]
async fn review_on_missing_stack_is_not_found() {
  let state = make_state().await;
  let ada = sign_in(&state, "sub-1|ada@example.com|Ada").await;
  let body = json!({ "creator_id": ada["id"], "rate": 3.0, "comment": "?" });
  let resp = call(&state, "POST", "/stacks/SR-000000/reviews", Some(body)).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["kind"], "stack_not_found");
}

// ─── Technologies ────────────────────────────────────────────────────────────

#[tokio::test]
async fn technologies_are_grouped_by_category() {
  let state = make_state().await;
  let body = json!([
    { "name": "Rust", "category": "Languages" },
    { "name": "Figma", "category": "Design tools" },
    { "name": "Go", "category": "Languages" },
  ]);
  let resp = call(&state, "POST", "/technologies", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["inserted"], 3);

  let grouped = json_body(call(&state, "GET", "/technologies", None).await).await;
  assert_eq!(grouped["Languages"].as_array().unwrap().len(), 2);
  assert_eq!(grouped["Design tools"][0]["name"], "Figma");
}
