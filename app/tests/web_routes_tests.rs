// tests/web_routes_tests.rs
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use base64::Engine;
use catalog_app::config::AppConfig;
use catalog_app::models::Product;
use catalog_app::state::AppState;
use catalog_app::web::configure_app_routes;
use common::*;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn app_state(fx: &Fixture) -> AppState {
  AppState {
    catalog: fx.service.clone(),
    config: Arc::new(AppConfig {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      uploads_path: PathBuf::from("/assets"),
      list: test_settings(),
      seed_db: false,
    }),
  }
}

macro_rules! init_app {
  ($fx:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new(app_state(&$fx)))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
  resp
    .headers()
    .get(header::LOCATION)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_string()
}

#[actix_web::test]
async fn test_list_streams_ndjson_with_uppercase_names() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/list?success=done").to_request()).await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/x-ndjson");
  assert_eq!(resp.headers().get("x-flash-success").unwrap(), "done");
  let body = test::read_body(resp).await;
  let products: Vec<Product> = std::str::from_utf8(&body)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();
  assert_eq!(products.len(), 14);
  assert!(products.iter().all(|p| p.name == p.name.to_uppercase()));
}

#[actix_web::test]
async fn test_invalid_flash_message_is_dropped_not_fatal() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/list?success=a%0Ab&error=gone").to_request()).await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.headers().get("x-flash-success").is_none());
  assert_eq!(resp.headers().get("x-flash-error").unwrap(), "gone");
  let body = test::read_body(resp).await;
  assert_eq!(std::str::from_utf8(&body).unwrap().lines().count(), 14);
}

#[actix_web::test]
async fn test_full_listing_is_amplified() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/list-full").to_request()).await;
  let body = test::read_body(resp).await;

  assert_eq!(std::str::from_utf8(&body).unwrap().lines().count(), 4 * 14);
}

#[actix_web::test]
async fn test_save_with_image_redirects_to_success() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);
  let category_id = fx.category("Electronics").id.unwrap();
  let payload = json!({
    "name": "Webcam",
    "price": 59.9,
    "category_id": category_id,
    "upload": {
      "filename": "web cam.png",
      "content_base64": base64::engine::general_purpose::STANDARD.encode(b"img"),
    }
  });

  let resp = test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&payload).to_request()).await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/list?success=Product+saved+successfully");
  let writes = fx.assets.writes.lock().clone();
  assert_eq!(writes.len(), 1);
  assert!(writes[0].0.ends_with("-webcam.png"));
  assert_eq!(writes[0].1, b"img".to_vec());
  assert_eq!(fx.store.inner().product_count(), 15);
}

#[actix_web::test]
async fn test_save_with_unknown_category_redirects_with_error() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);
  let payload = json!({ "name": "Orphan", "price": 1.0, "category_id": "nope" });

  let resp = test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&payload).to_request()).await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/list?error=category+does+not+exist");
  assert_eq!(fx.store.saves(), 0);
}

#[actix_web::test]
async fn test_blank_name_is_a_bad_request() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);
  let category_id = fx.category("Sports").id.unwrap();
  let payload = json!({ "name": "  ", "price": 1.0, "category_id": category_id });

  let resp = test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&payload).to_request()).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(fx.store.saves(), 0);
}

#[actix_web::test]
async fn test_missing_product_routes() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/delete/missing").to_request()).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/list?error=product+does+not+exist");
  assert_eq!(fx.store.deletes(), 0);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/details/missing").to_request()).await;
  assert_eq!(location(&resp), "/list?error=product+does+not+exist+to+view+its+details");

  let resp = test::call_service(&app, test::TestRequest::get().uri("/form-v2/missing").to_request()).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  // Plain edit answers with an empty form instead.
  let blank: Product = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/form/missing").to_request()).await;
  assert_eq!(blank, Product::default());

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/products/missing").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_existing_redirects_to_success() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);
  let id = fx.stored_products().await[0].id.clone().unwrap();

  let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/delete/{}", id)).to_request()).await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/list?success=Product+deleted+successfully");
  assert_eq!(fx.store.inner().product_count(), 13);
}

#[actix_web::test]
async fn test_rest_listing_and_health() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);

  let products: Vec<Product> =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
  let ids = |list: &[Product]| list.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
  assert_eq!(ids(&products), ids(&fx.stored_products().await));

  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

async fn stored_webcam(fx: &Fixture) -> Product {
  fx.stored_products().await.into_iter().find(|p| p.name == "Webcam").unwrap()
}

#[actix_web::test]
async fn test_resave_without_image_or_date_keeps_stored_ones() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);
  let category_id = fx.category("Electronics").id.unwrap();
  let create = json!({
    "name": "Webcam",
    "price": 59.9,
    "created_at": "2020-01-02",
    "category_id": category_id,
    "upload": {
      "filename": "cam.png",
      "content_base64": base64::engine::general_purpose::STANDARD.encode(b"img"),
    }
  });
  test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&create).to_request()).await;
  let created = stored_webcam(&fx).await;
  assert!(created.image.as_deref().unwrap().ends_with("-cam.png"));

  let resave = json!({
    "id": created.id,
    "name": "Webcam HD",
    "price": 64.9,
    "category_id": category_id,
  });
  let resp = test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&resave).to_request()).await;

  assert_eq!(location(&resp), "/list?success=Product+saved+successfully");
  let updated = fx
    .stored_products()
    .await
    .into_iter()
    .find(|p| p.id == created.id)
    .unwrap();
  assert_eq!(updated.name, "Webcam HD");
  assert_eq!(updated.image, created.image);
  assert_eq!(updated.created_at, chrono::NaiveDate::from_ymd_opt(2020, 1, 2));
  assert_eq!(fx.assets.writes.lock().len(), 1);
}

#[actix_web::test]
async fn test_edit_form_can_be_posted_back_as_is() {
  let fx = seeded_fixture(test_settings()).await;
  let app = init_app!(fx);
  let category_id = fx.category("Electronics").id.unwrap();
  let create = json!({
    "name": "Webcam",
    "price": 59.9,
    "category_id": category_id,
    "upload": {
      "filename": "cam.png",
      "content_base64": base64::engine::general_purpose::STANDARD.encode(b"img"),
    }
  });
  test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&create).to_request()).await;
  let created = stored_webcam(&fx).await;
  let edit_uri = format!("/form/{}", created.id.clone().unwrap());

  let mut form: serde_json::Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri(&edit_uri).to_request()).await;
  form["name"] = json!("Webcam Pro");
  let resp = test::call_service(&app, test::TestRequest::post().uri("/form").set_json(&form).to_request()).await;

  assert_eq!(location(&resp), "/list?success=Product+saved+successfully");
  let products = fx.stored_products().await;
  assert_eq!(products.len(), 15);
  let updated = products.into_iter().find(|p| p.id == created.id).unwrap();
  assert_eq!(updated.name, "Webcam Pro");
  assert_eq!(updated.image, created.image);
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(updated.category_id(), Some(category_id.as_str()));
}
