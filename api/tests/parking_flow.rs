use adapter::database::connect_database_with;
use api::route::routes;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use kernel::model::{role::Role, user::event::CreateUser};
use registry::AppRegistry;
use serde_json::{json, Value};
use shared::config::{AdminConfig, AppConfig, AuthConfig, DatabaseConfig, ServerConfig};
use tower::ServiceExt;

async fn build_app() -> anyhow::Result<Router> {
    let config = AppConfig {
        database: DatabaseConfig::in_memory(),
        auth: AuthConfig { ttl: 3600 },
        admin: AdminConfig {
            email: "admin@parking.app".into(),
            password: "admin".into(),
            name: "Administrator".into(),
        },
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
    };
    let pool = connect_database_with(&config.database).await?;
    pool.migrate().await?;
    let registry = AppRegistry::new(pool, &config);

    registry
        .user_repository()
        .create(CreateUser {
            email: config.admin.email.clone(),
            password: config.admin.password.clone(),
            full_name: config.admin.name.clone(),
            address: "-".into(),
            pin_code: "-".into(),
            role: Role::Admin,
        })
        .await?;

    Ok(routes().with_state(registry))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Option<String>, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    // "name=value; Path=/; ..." から "name=value" だけを取り出す
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, set_cookie, value))
}

async fn register_and_login(app: &Router, email: &str) -> anyhow::Result<String> {
    let (status, _, _) = send(
        app,
        Method::POST,
        "/user_register",
        None,
        Some(json!({
            "email": email,
            "password": "secret",
            "fullName": "Parking User",
            "address": "12 Main Street",
            "pinCode": "560001"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, cookie, _) = send(
        app,
        Method::POST,
        "/user_login",
        None,
        Some(json!({ "email": email, "password": "secret" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(cookie.expect("login should set a session cookie"))
}

async fn admin_login(app: &Router) -> anyhow::Result<String> {
    let (status, cookie, body) = send(
        app,
        Method::POST,
        "/admin_login",
        None,
        Some(json!({ "email": "admin@parking.app", "password": "admin" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    let cookie = cookie.expect("login should set a session cookie");
    assert!(cookie.starts_with("admin_session="));
    Ok(cookie)
}

async fn create_lot(app: &Router, admin: &str, name: &str, capacity: i64) -> anyhow::Result<i64> {
    let (status, _, body) = send(
        app,
        Method::POST,
        "/admin_parking_lots",
        Some(admin),
        Some(json!({
            "primeLocationName": name,
            "pricePerHour": 10.0,
            "address": "Station Road",
            "pinCode": "560001",
            "maximumNumberOfSpots": capacity
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["lotId"].as_i64().expect("lotId should be a number"))
}

#[tokio::test]
async fn index_and_health() -> anyhow::Result<()> {
    let app = build_app().await?;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    assert_eq!(&bytes[..], b"Welcome to the Vehicle Parking App!");

    let (status, _, _) = send(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, Method::GET, "/health/db", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn registration_and_login_rules() -> anyhow::Result<()> {
    let app = build_app().await?;
    let user = register_and_login(&app, "driver@example.com").await?;
    assert!(user.starts_with("user_session="));

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/user_register",
        None,
        Some(json!({
            "email": "driver@example.com",
            "password": "secret",
            "fullName": "Someone Else",
            "address": "Elsewhere",
            "pinCode": "1"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/user_register",
        None,
        Some(json!({
            "email": "blank@example.com",
            "password": "secret",
            "fullName": "   ",
            "address": "Elsewhere",
            "pinCode": "1"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 一般ユーザーは管理者画面からログインできない
    let (status, _, _) = send(
        &app,
        Method::POST,
        "/admin_login",
        None,
        Some(json!({ "email": "driver@example.com", "password": "secret" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/user_login",
        None,
        Some(json!({ "email": "driver@example.com", "password": "wrong" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // ユーザーのセッションでは管理者ページに入れない
    let (status, _, _) = send(&app, Method::GET, "/admin_dashboard", Some(&user), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, Method::POST, "/logout", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, Method::GET, "/user_dashboard", Some(&user), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn book_and_release_flow() -> anyhow::Result<()> {
    let app = build_app().await?;
    let admin = admin_login(&app).await?;
    let user = register_and_login(&app, "driver@example.com").await?;
    let lot_id = create_lot(&app, &admin, "Central", 2).await?;

    let (status, _, body) = send(&app, Method::GET, "/user_dashboard", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lots"][0]["availableSpots"], 2);
    assert!(body["activeReservation"].is_null());

    let (status, _, _) = send(
        &app,
        Method::POST,
        &format!("/book_parking_spot/{lot_id}"),
        Some(&user),
        Some(json!({ "vehicleNumber": "  " })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::POST,
        &format!("/book_parking_spot/{lot_id}"),
        Some(&user),
        Some(json!({ "vehicleNumber": "KA01AB1234XYZ98765432" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, booked) = send(
        &app,
        Method::POST,
        &format!("/book_parking_spot/{lot_id}"),
        Some(&user),
        Some(json!({ "vehicleNumber": "  KA01AB1234XYZ9876  " })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["vehicleNumber"], "KA01AB1234XYZ9876");
    assert_eq!(booked["spot"]["spotNumber"], 1);
    assert_eq!(booked["status"], "Parked");
    let reservation_id = booked["reservationId"].as_i64().unwrap();

    let (status, _, _) = send(
        &app,
        Method::POST,
        &format!("/book_parking_spot/{lot_id}"),
        Some(&user),
        Some(json!({ "vehicleNumber": "KA01AB9999" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 駐車中の区画がある駐車場は削除も縮小もできない
    let (status, _, _) = send(
        &app,
        Method::DELETE,
        &format!("/admin_parking_lots/{lot_id}"),
        Some(&admin),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, detail) = send(
        &app,
        Method::GET,
        &format!("/admin_parking_lots/{lot_id}"),
        Some(&admin),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["occupiedSpots"], 1);
    assert_eq!(detail["spots"][0]["status"], "Occupied");
    assert_eq!(
        detail["spots"][0]["occupant"]["vehicleNumber"],
        "KA01AB1234XYZ9876"
    );

    let other = register_and_login(&app, "other@example.com").await?;
    let (status, _, _) = send(
        &app,
        Method::POST,
        &format!("/release_parking_spot/{reservation_id}"),
        Some(&other),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, released) = send(
        &app,
        Method::POST,
        &format!("/release_parking_spot/{reservation_id}"),
        Some(&user),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(released["status"], "Released");
    assert!(released["totalCost"].is_number());

    let (status, _, _) = send(
        &app,
        Method::POST,
        &format!("/release_parking_spot/{reservation_id}"),
        Some(&user),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, history) = send(&app, Method::GET, "/user_history", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["items"].as_array().unwrap().len(), 1);

    let (status, _, summary) = send(&app, Method::GET, "/admin_summary", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalLots"], 1);
    assert_eq!(summary["occupiedSpots"], 0);
    assert_eq!(summary["totalUsers"], 2);

    let (status, _, users) = send(&app, Method::GET, "/admin_users", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users["items"].as_array().unwrap().len(), 2);

    let (status, _, _) = send(
        &app,
        Method::DELETE,
        &format!("/admin_parking_lots/{lot_id}"),
        Some(&admin),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn admin_lot_management() -> anyhow::Result<()> {
    let app = build_app().await?;
    let admin = admin_login(&app).await?;
    let lot_id = create_lot(&app, &admin, "Harbour", 3).await?;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/admin_parking_lots",
        Some(&admin),
        Some(json!({
            "primeLocationName": "Harbour",
            "pricePerHour": 5.0,
            "address": "Dock",
            "pinCode": "1",
            "maximumNumberOfSpots": 1
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/admin_parking_lots",
        Some(&admin),
        Some(json!({
            "primeLocationName": "Free",
            "pricePerHour": 0.0,
            "address": "Dock",
            "pinCode": "1",
            "maximumNumberOfSpots": 1
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 区画数の上限を超える登録と変更は受け付けない
    let (status, _, _) = send(
        &app,
        Method::POST,
        "/admin_parking_lots",
        Some(&admin),
        Some(json!({
            "primeLocationName": "Huge",
            "pricePerHour": 5.0,
            "address": "Dock",
            "pinCode": "1",
            "maximumNumberOfSpots": 1001
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::PUT,
        &format!("/admin_parking_lots/{lot_id}"),
        Some(&admin),
        Some(json!({
            "primeLocationName": "Harbour",
            "pricePerHour": 10.0,
            "address": "Station Road",
            "pinCode": "560001",
            "maximumNumberOfSpots": i64::MAX
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::PUT,
        &format!("/admin_parking_lots/{lot_id}"),
        Some(&admin),
        Some(json!({
            "primeLocationName": "Harbour East",
            "pricePerHour": 12.5,
            "address": "Dock 2",
            "pinCode": "560002",
            "maximumNumberOfSpots": 5
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, _, lots) = send(
        &app,
        Method::GET,
        "/admin_parking_lots?q=east",
        Some(&admin),
        None,
    )
    .await?;
    let items = lots["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["maximumNumberOfSpots"], 5);
    assert_eq!(items[0]["pricePerHour"], 12.5);

    let (_, _, dashboard) = send(&app, Method::GET, "/admin_dashboard", Some(&admin), None).await?;
    let spots = dashboard["lots"][0]["spots"].as_array().unwrap();
    assert_eq!(spots.len(), 5);
    let last_spot_id = spots[4]["spotId"].as_i64().unwrap();

    let (status, _, _) = send(
        &app,
        Method::DELETE,
        &format!("/admin_parking_spots/{last_spot_id}"),
        Some(&admin),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, _, detail) = send(
        &app,
        Method::GET,
        &format!("/admin_parking_lots/{lot_id}"),
        Some(&admin),
        None,
    )
    .await?;
    assert_eq!(detail["maximumNumberOfSpots"], 4);

    let (status, _, _) = send(&app, Method::GET, "/admin_parking_lots/999", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
