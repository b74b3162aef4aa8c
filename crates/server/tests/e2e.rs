use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use configs::{DatabaseConfig, MEMORY_DATABASE_URL};
use server::startup;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Boot the full router on an ephemeral port backed by the in-memory store.
async fn start_server(seed: bool) -> anyhow::Result<TestApp> {
    let db = DatabaseConfig { url: MEMORY_DATABASE_URL.into(), seed_data: seed, ..DatabaseConfig::default() };
    let state = startup::build_state(&db).await?;
    let app = startup::build_app(state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_returns_location_and_empty_body() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let res = c.post(app.url("/restaurants/restaurant"))
        .json(&json!({"name": "Supreme Eats", "state": "CO", "menus": [{"dish": "Burger", "price": 9.99}]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let location = res.headers().get("location").and_then(|v| v.to_str().ok()).map(str::to_string);
    assert!(res.text().await?.is_empty());

    let location = location.expect("location header");
    assert!(location.starts_with("/restaurants/restaurant/"));
    let res = c.get(app.url(&location)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Supreme Eats");
    assert_eq!(body["seat_capacity"], 0);
    assert_eq!(body["menus"][0]["dish"], "Burger");
    assert!(body["menus"][0]["id"].as_i64().unwrap_or_default() > 0);

    let res = c.get(app.url("/restaurants/restaurant/name/Supreme%20Eats")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let counts = c.get(app.url("/restaurants/menucounts")).send().await?.json::<Value>().await?;
    assert_eq!(counts, json!([{"restaurant_id": body["id"], "name": "Supreme Eats", "count": 1}]));
    Ok(())
}

#[tokio::test]
async fn e2e_seeded_searches() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let all = c.get(app.url("/restaurants/restaurants")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(all.len(), 3);

    let cake = c.get(app.url("/restaurants/restaurant/likedish/cak")).send().await?.json::<Vec<Value>>().await?;
    let names: Vec<&str> = cake.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["Apple", "Eagle Cafe"]);

    let vt = c.get(app.url("/restaurants/restaurant/state/vt")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(vt.len(), 1);
    assert_eq!(vt[0]["payments"].as_array().map(Vec::len), Some(3));

    let eats = c.get(app.url("/restaurants/restaurant/likename/EATS")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(eats.len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_replace_merge_and_delete() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let apple = c.get(app.url("/restaurants/restaurant/name/Apple")).send().await?.json::<Value>().await?;
    let id = apple["id"].as_i64().unwrap_or_default();
    let path = format!("/restaurants/restaurant/{}", id);

    let merged = c.patch(app.url(&path))
        .json(&json!({"seat_capacity": 0}))
        .send().await?;
    assert_eq!(merged.status(), HttpStatusCode::OK);
    let merged = merged.json::<Value>().await?;
    assert_eq!(merged["seat_capacity"], 0);
    assert_eq!(merged["menus"], apple["menus"]);
    assert_eq!(merged["address"], apple["address"]);

    let replaced = c.put(app.url(&path))
        .json(&json!({"name": "Apple", "state": "CO"}))
        .send().await?
        .json::<Value>().await?;
    assert_eq!(replaced["id"], id);
    assert_eq!(replaced["address"], Value::Null);
    assert_eq!(replaced["menus"], json!([]));
    assert_eq!(replaced["payments"], json!([]));

    let res = c.delete(app.url(&path)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(app.url(&path)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(app.url(&path)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn e2e_patch_with_null_collections_keeps_children() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let eagle = c.get(app.url("/restaurants/restaurant/name/Eagle%20Cafe")).send().await?.json::<Value>().await?;
    let path = format!("/restaurants/restaurant/{}", eagle["id"]);

    let res = c.patch(app.url(&path))
        .json(&json!({"telephone": "555-000-0000", "menus": null, "payments": null}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let merged = res.json::<Value>().await?;
    assert_eq!(merged["telephone"], "555-000-0000");
    assert_eq!(merged["menus"], eagle["menus"]);
    assert_eq!(merged["payments"], eagle["payments"]);
    Ok(())
}

#[tokio::test]
async fn e2e_overlong_fields_are_bad_requests() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let res = c.post(app.url("/restaurants/restaurant"))
        .json(&json!({"name": "Long State", "state": "x".repeat(40)}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Validation Error");

    let all = c.get(app.url("/restaurants/restaurants")).send().await?.json::<Vec<Value>>().await?;
    assert!(all.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_errors_are_json() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let res = c.post(app.url("/restaurants/restaurant")).json(&json!({"state": "CO"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Validation Error");

    let res = c.post(app.url("/restaurants/restaurant"))
        .json(&json!({"name": "Ghost Kitchen", "payments": [{"id": 9999}]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.get(app.url("/restaurants/restaurant/name/Ghost%20Kitchen")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.put(app.url("/restaurants/restaurant/4242")).json(&json!({"name": "Nobody"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_metrics_and_openapi() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();
    c.get(app.url("/health")).send().await?;

    let metrics = c.get(app.url("/metrics")).send().await?.text().await?;
    assert!(metrics.contains("crudy_restaurants_http_requests_total"));

    let doc = c.get(app.url("/api-docs/openapi.json")).send().await?.json::<Value>().await?;
    assert!(doc["paths"]["/restaurants/restaurant/{id}"].is_object());
    assert!(doc["components"]["schemas"]["RestaurantDoc"].is_object());
    Ok(())
}
