use axum::http::StatusCode;
use serde_json::{Value, json};

mod support;
use support::{create_category, create_product, id_of, test_server};

#[tokio::test]
async fn product_lines_get_sequential_orders() {
    let server = test_server();
    let product = create_product(&server, "Boot", "boot").await;
    let lines_url = format!("/api/products/{}/lines/", id_of(&product));

    let first = server
        .post(&lines_url)
        .json(&json!({ "price": "10.00", "sku": "BOOT-1", "stock_qty": 4 }))
        .await;
    first.assert_status(StatusCode::CREATED);
    let second = server
        .post(&lines_url)
        .json(&json!({ "price": "12.50", "sku": "BOOT-2", "stock_qty": 2 }))
        .await;
    second.assert_status(StatusCode::CREATED);

    assert_eq!(first.json::<Value>()["order"], 1);
    assert_eq!(second.json::<Value>()["order"], 2);

    server
        .post(&lines_url)
        .json(&json!({ "price": "9.00", "sku": "BOOT-3", "stock_qty": 1, "order": 2 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn line_after_the_last_possible_order_is_rejected() {
    let server = test_server();
    let product = create_product(&server, "Boot", "boot").await;
    let lines_url = format!("/api/products/{}/lines/", id_of(&product));

    server
        .post(&lines_url)
        .json(&json!({ "price": "10.00", "sku": "BOOT-1", "stock_qty": 1, "order": i32::MAX }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post(&lines_url)
        .json(&json!({ "price": "10.00", "sku": "BOOT-2", "stock_qty": 1 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn line_prices_are_stored_in_cents() {
    let server = test_server();
    let product = create_product(&server, "Boot", "boot").await;
    let lines_url = format!("/api/products/{}/lines/", id_of(&product));

    let padded: Value = server
        .post(&lines_url)
        .json(&json!({ "price": "19.990", "sku": "BOOT-1", "stock_qty": 1 }))
        .await
        .json();
    assert_eq!(padded["price"], "19.99");

    let short: Value = server
        .post(&lines_url)
        .json(&json!({ "price": "19.9", "sku": "BOOT-2", "stock_qty": 1 }))
        .await
        .json();
    assert_eq!(short["price"], "19.90");

    let updated: Value = server
        .put(&format!("/api/product-lines/{}/", id_of(&short)))
        .json(&json!({ "price": "7.500", "sku": "BOOT-2", "stock_qty": 1 }))
        .await
        .json();
    assert_eq!(updated["price"], "7.50");

    server
        .post(&lines_url)
        .json(&json!({
            "price": "1000000000000000000000000000",
            "sku": "BOOT-3",
            "stock_qty": 1
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_and_category_views_are_assembled() {
    let server = test_server();
    let shoes = create_category(&server, "shoes", None).await;

    let color: Value = server
        .post("/api/attributes/")
        .json(&json!({ "name": "color" }))
        .await
        .json();
    let red: Value = server
        .post(&format!("/api/attributes/{}/values/", id_of(&color)))
        .json(&json!({ "value": "red" }))
        .await
        .json();
    let boots: Value = server
        .post("/api/product-types/")
        .json(&json!({ "name": "boots" }))
        .await
        .json();
    server
        .post(&format!("/api/product-types/{}/attributes/", id_of(&boots)))
        .json(&json!({ "attribute": id_of(&color) }))
        .await
        .assert_status_ok();

    let product: Value = server
        .post("/api/product/")
        .json(&json!({
            "name": "Boot",
            "slug": "boot",
            "active": true,
            "category": id_of(&shoes),
            "product_type": id_of(&boots)
        }))
        .await
        .json();
    let line: Value = server
        .post(&format!("/api/products/{}/lines/", id_of(&product)))
        .json(&json!({ "price": "49.99", "sku": "BOOT-1", "stock_qty": 3 }))
        .await
        .json();
    server
        .post(&format!("/api/product-lines/{}/images/", id_of(&line)))
        .json(&json!({ "image_url": "boot.jpg", "alt_text": "boot" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post(&format!("/api/product-lines/{}/attribute-values/", id_of(&line)))
        .json(&json!({ "attribute_value": id_of(&red) }))
        .await
        .assert_status_ok();

    let detail: Value = server.get("/api/product/boot/").await.json();
    let color_key = id_of(&color).to_string();
    assert_eq!(detail[0]["category_name"], "shoes");
    assert_eq!(detail[0]["product_line"][0]["specification"][&color_key], "red");
    assert_eq!(detail[0]["type specification"][&color_key], "color");
    assert_eq!(detail[0]["product_line"][0]["images"][0]["order"], 1);

    let cards: Value = server.get("/api/product/category/shoes/").await.json();
    assert_eq!(cards[0]["name"], "Boot");
    assert_eq!(cards[0]["price"], "49.99");
    assert_eq!(cards[0]["image"][0]["image_url"], "boot.jpg");

    server
        .get("/api/product/missing/")
        .await
        .assert_status_not_found();
    server
        .get("/api/product/category/missing/")
        .await
        .assert_json(&json!([]));
}

#[tokio::test]
async fn second_value_of_a_kind_on_a_line_is_rejected() {
    let server = test_server();
    let product = create_product(&server, "Boot", "boot").await;
    let line: Value = server
        .post(&format!("/api/products/{}/lines/", id_of(&product)))
        .json(&json!({ "price": "1.00", "sku": "BOOT-1", "stock_qty": 1 }))
        .await
        .json();
    let color: Value = server
        .post("/api/attributes/")
        .json(&json!({ "name": "color" }))
        .await
        .json();
    let values_url = format!("/api/attributes/{}/values/", id_of(&color));
    let red: Value = server.post(&values_url).json(&json!({ "value": "red" })).await.json();
    let blue: Value = server.post(&values_url).json(&json!({ "value": "blue" })).await.json();

    let bind_url = format!("/api/product-lines/{}/attribute-values/", id_of(&line));
    let first: Value = server
        .post(&bind_url)
        .json(&json!({ "attribute_value": id_of(&red) }))
        .await
        .json();
    let again: Value = server
        .post(&bind_url)
        .json(&json!({ "attribute_value": id_of(&red) }))
        .await
        .json();
    assert_eq!(first["id"], again["id"]);

    server
        .post(&bind_url)
        .json(&json!({ "attribute_value": id_of(&blue) }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .delete(&format!("{bind_url}{}/", id_of(&red)))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .post(&bind_url)
        .json(&json!({ "attribute_value": id_of(&blue) }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn inactive_products_are_hidden_from_listings() {
    let server = test_server();
    create_product(&server, "Boot", "boot").await;
    server
        .post("/api/product/")
        .json(&json!({ "name": "Draft", "slug": "draft", "active": false }))
        .await
        .assert_status(StatusCode::CREATED);

    let listing: Value = server.get("/api/product/").await.json();
    let names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, ["Boot"]);
    server.get("/api/product/draft/").await.assert_status_not_found();
}

#[tokio::test]
async fn ping_and_health_respond() {
    let server = test_server();
    server.get("/ping").await.assert_status_ok();
    let health: Value = server.get("/health").await.json();
    assert_eq!(health["status"], "healthy");
}
