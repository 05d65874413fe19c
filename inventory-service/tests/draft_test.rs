//! Draft builder integration tests for inventory-service.

mod common;

use common::TestApp;
use serde_json::{json, Value};

fn draft_id(draft: &Value) -> &str {
    draft["draft_id"].as_str().expect("draft_id missing")
}

#[tokio::test]
async fn opening_drafts_continues_each_number_series() {
    let app = TestApp::spawn().await;

    // Seeded last numbers: FAC-0012, PED-0001, REC-0015, DEV-0010.
    assert_eq!(app.open_draft("purchase").await["number"], "FAC-0013");
    assert_eq!(app.open_draft("order").await["number"], "PED-0002");
    assert_eq!(app.open_draft("receipt").await["number"], "REC-0016");
    assert_eq!(app.open_draft("return").await["number"], "DEV-0011");
}

#[tokio::test]
async fn purchase_draft_end_to_end() {
    let app = TestApp::spawn().await;

    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);
    assert_eq!(draft["state"], "editing");
    assert_eq!(draft["party_id"], 0);
    assert_eq!(draft["total"], "0");

    // Add the Router by id and the Switch by typeahead text.
    let body: Value = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_id": 1 }))
        .send()
        .await
        .expect("Failed to add line")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["lines"][0]["quantity"], 1);

    let body: Value = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_query": "switch - pr-1002" }))
        .send()
        .await
        .expect("Failed to add line")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["lines"].as_array().map(Vec::len), Some(2));

    // A second line for the same product is rejected, not merged.
    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Quantity update by position: 2 * 1200 + 1 * 3000 = 5400.
    let body: Value = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/lines/0")))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("Failed to update quantity")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["total"], "5400");
    assert_eq!(body["state"], "editing");

    // Submitting without a party fails, names the precondition, and does
    // not touch the store.
    let before = app.document_count("?kind=purchase").await;
    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/submit")))
        .send()
        .await
        .expect("Failed to send submit");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Body was not JSON");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("supplier"), "unexpected message: {message}");
    assert_eq!(app.document_count("?kind=purchase").await, before);

    // Pick the supplier through the typeahead text.
    let body: Value = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/header")))
        .json(&json!({ "party_query": "Distribuidora ABC", "payment_method": "cash" }))
        .send()
        .await
        .expect("Failed to patch header")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["party_id"], 1);
    assert_eq!(body["state"], "submittable");

    // Submit: the document persists and the same session continues with a
    // fresh draft carrying the next number.
    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/submit")))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body was not JSON");
    assert_eq!(body["document"]["number"], "FAC-0013");
    assert_eq!(body["document"]["total"], "5400");
    assert_eq!(body["draft"]["draft_id"].as_str(), Some(id));
    assert_eq!(body["draft"]["state"], "editing");
    assert_eq!(body["draft"]["number"], "FAC-0014");
    assert_eq!(body["draft"]["party_id"], 0);
    assert_eq!(body["draft"]["lines"].as_array().map(Vec::len), Some(0));

    assert_eq!(app.document_count("?kind=purchase").await, before + 1);
}

#[tokio::test]
async fn quantity_below_one_is_rejected() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    app.client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_id": 1 }))
        .send()
        .await
        .expect("Failed to add line");

    for quantity in [0, -5] {
        let response = app
            .client
            .patch(app.url(&format!("/api/drafts/{id}/lines/0")))
            .json(&json!({ "quantity": quantity }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 400);
    }

    let body: Value = app
        .client
        .get(app.url(&format!("/api/drafts/{id}")))
        .send()
        .await
        .expect("Failed to get draft")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["lines"][0]["quantity"], 1);
}

#[tokio::test]
async fn stale_line_index_is_a_request_error() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    let response = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/lines/7")))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn removing_a_line_is_idempotent() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    app.client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_id": 1 }))
        .send()
        .await
        .expect("Failed to add line");

    for _ in 0..2 {
        let body: Value = app
            .client
            .delete(app.url(&format!("/api/drafts/{id}/lines/1")))
            .send()
            .await
            .expect("Failed to remove line")
            .json()
            .await
            .expect("Body was not JSON");
        assert_eq!(body["lines"].as_array().map(Vec::len), Some(0));
    }
}

#[tokio::test]
async fn unknown_product_cannot_be_added() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_id": 999 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/lines")))
        .json(&json!({ "product_query": "Printer - PR-9999" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn typeahead_party_miss_clears_the_selection() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    let body: Value = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/header")))
        .json(&json!({ "party_id": 1 }))
        .send()
        .await
        .expect("Failed to patch header")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["party_id"], 1);

    let body: Value = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/header")))
        .json(&json!({ "party_query": "Distribuidora AB" }))
        .send()
        .await
        .expect("Failed to patch header")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["party_id"], 0);
}

#[tokio::test]
async fn return_drafts_resolve_parties_against_customers() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("return").await;
    let id = draft_id(&draft);

    let body: Value = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/header")))
        .json(&json!({ "party_query": "juan pérez" }))
        .send()
        .await
        .expect("Failed to patch header")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["party_id"], 1);

    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/submit")))
        .send()
        .await
        .expect("Failed to send submit");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Body was not JSON");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(
        message.contains("at least one line"),
        "unexpected message: {message}"
    );
}

#[tokio::test]
async fn edit_draft_updates_the_persisted_document() {
    let app = TestApp::spawn().await;

    // Create a document to edit.
    let created: Value = app
        .client
        .post(app.url("/api/documents"))
        .json(&json!({
            "kind": "purchase",
            "party_id": 1,
            "date": "2025-07-01",
            "lines": [{ "product_id": 1 }]
        }))
        .send()
        .await
        .expect("Failed to create document")
        .json()
        .await
        .expect("Body was not JSON");
    let document_id = created["id"].as_i64().expect("id missing");

    // Open an edit session seeded from it.
    let response = app
        .client
        .post(app.url("/api/drafts"))
        .json(&json!({ "document_id": document_id }))
        .send()
        .await
        .expect("Failed to open edit draft");
    assert_eq!(response.status(), 201);
    let draft: Value = response.json().await.expect("Body was not JSON");
    assert_eq!(draft["mode"], "edit");
    assert_eq!(draft["number"], created["number"]);
    assert_eq!(draft["lines"].as_array().map(Vec::len), Some(1));
    let id = draft_id(&draft);

    // Adjust and submit.
    app.client
        .patch(app.url(&format!("/api/drafts/{id}/header")))
        .json(&json!({ "notes": "recounted", "status": "processed" }))
        .send()
        .await
        .expect("Failed to patch header");
    app.client
        .patch(app.url(&format!("/api/drafts/{id}/lines/0")))
        .json(&json!({ "quantity": 4 }))
        .send()
        .await
        .expect("Failed to update quantity");

    let response = app
        .client
        .post(app.url(&format!("/api/drafts/{id}/submit")))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Body was not JSON");
    assert_eq!(body["draft"]["state"], "submitted");

    // The persisted document reflects the edit; the session is finished.
    let body: Value = app
        .client
        .get(app.url(&format!("/api/documents/{document_id}")))
        .send()
        .await
        .expect("Failed to get document")
        .json()
        .await
        .expect("Body was not JSON");
    assert_eq!(body["notes"], "recounted");
    assert_eq!(body["status"], "processed");
    assert_eq!(body["total"], "4800");

    let response = app
        .client
        .get(app.url(&format!("/api/drafts/{id}")))
        .send()
        .await
        .expect("Failed to get draft");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn discarding_a_draft_ends_the_session() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    let response = app
        .client
        .delete(app.url(&format!("/api/drafts/{id}")))
        .send()
        .await
        .expect("Failed to discard draft");
    assert_eq!(response.status(), 204);

    let response = app
        .client
        .get(app.url(&format!("/api/drafts/{id}")))
        .send()
        .await
        .expect("Failed to get draft");
    assert_eq!(response.status(), 404);

    // Discarding again stays a quiet no-op.
    let response = app
        .client
        .delete(app.url(&format!("/api/drafts/{id}")))
        .send()
        .await
        .expect("Failed to discard draft");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn submitted_draft_refuses_mutation_after_edit_submit() {
    let app = TestApp::spawn().await;
    let draft = app.open_draft("purchase").await;
    let id = draft_id(&draft);

    // Mutating an unknown line reference on a live draft is a 400; once the
    // draft is gone the same call is a 404.
    let response = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/lines/0")))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    app.client
        .delete(app.url(&format!("/api/drafts/{id}")))
        .send()
        .await
        .expect("Failed to discard draft");

    let response = app
        .client
        .patch(app.url(&format!("/api/drafts/{id}/lines/0")))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
