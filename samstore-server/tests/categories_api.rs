use axum::http::StatusCode;
use serde_json::{Value, json};

mod support;
use support::{create_category, id_of, test_server};

#[tokio::test]
async fn single_category_is_listed_alone() {
    let server = test_server();
    create_category(&server, "category_0", None).await;

    let response = server.get("/api/categories/").await;
    response.assert_status_ok();
    response.assert_json(&json!([
        { "name": "category_0", "slug": "category_0", "parent": null }
    ]));
}

#[tokio::test]
async fn child_category_resolves_its_parent() {
    let server = test_server();
    let root = create_category(&server, "category_0", None).await;
    let child = create_category(&server, "category_1", Some(id_of(&root))).await;
    assert_eq!(child["parent_id"], root["id"]);

    let listing: Value = server.get("/api/categories/").await.json();
    assert_eq!(listing[1]["name"], "category_1");
    assert_eq!(listing[1]["parent"], root["id"]);

    let ancestors: Value = server
        .get(&format!("/api/categories/{}/ancestors/", id_of(&child)))
        .await
        .json();
    assert_eq!(ancestors[0]["name"], "category_0");

    let children: Value = server
        .get(&format!("/api/categories/{}/children/", id_of(&root)))
        .await
        .json();
    assert_eq!(children.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn deleting_a_parent_category_conflicts() {
    let server = test_server();
    let root = create_category(&server, "category_0", None).await;
    let child = create_category(&server, "category_1", Some(id_of(&root))).await;

    let response = server
        .delete(&format!("/api/categories/{}/", id_of(&root)))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 409);

    server
        .delete(&format!("/api/categories/{}/", id_of(&child)))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/categories/{}/", id_of(&root)))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reparenting_under_a_descendant_is_rejected() {
    let server = test_server();
    let root = create_category(&server, "category_0", None).await;
    let child = create_category(&server, "category_1", Some(id_of(&root))).await;

    let response = server
        .put(&format!("/api/categories/{}/", id_of(&root)))
        .json(&json!({
            "name": "category_0",
            "slug": "category_0",
            "parent": id_of(&child)
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_slug_conflicts_and_bad_slug_is_rejected() {
    let server = test_server();
    create_category(&server, "shoes", None).await;

    server
        .post("/api/categories/")
        .json(&json!({ "name": "other", "slug": "shoes" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .post("/api/categories/")
        .json(&json!({ "name": "bad", "slug": "not a slug" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_category_is_not_found() {
    let server = test_server();
    let response = server.get("/api/categories/404/").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 404);
}
