use axum::http::StatusCode;
use image::ImageFormat;
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;
use wiremock::MockServer;

mod common;
use common::{
    assert_no_temp_files, body_json, card_image, init_test_logger, mount_resource, ocr_request,
    test_router, StubRecognizer,
};

#[tokio::test]
async fn test_card_with_rut_is_recognized() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "/carnet.jpg",
        card_image(ImageFormat::Jpeg),
        Some("image/jpeg"),
        1,
    )
    .await;

    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new(
        "REPUBLICA DE CHILE\r\nCEDULA DE IDENTIDAD\r\n\r\n\r\nRUN   12.345.678-5",
        88.0,
    );
    let app = test_router(recognizer.clone(), tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/carnet.jpg", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "ok": true,
            "texto": "REPUBLICA DE CHILE\nCEDULA DE IDENTIDAD\n\nRUN 12.345.678-5",
            "ruts": ["12.345.678-5"],
            "confidence": 88.0,
        })
    );
    assert_eq!(recognizer.calls(), 1);
    assert_no_temp_files(tmp.path());
}

#[tokio::test]
async fn test_k_check_digit_is_kept() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "/k.png",
        card_image(ImageFormat::Png),
        Some("image/png"),
        1,
    )
    .await;

    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new("RUT 9.876.543-K / rut 9.876.543-k", 75.5);
    let app = test_router(recognizer, tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/k.png", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ruts"], json!(["9.876.543-K", "9.876.543-k"]));
}

#[tokio::test]
async fn test_repeated_rut_is_reported_once() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "/dup.png",
        card_image(ImageFormat::Png),
        Some("image/png"),
        1,
    )
    .await;

    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new(
        "Titular 12.345.678-5\nCodeudor 7.654.321-0\nTitular 12.345.678-5",
        80.0,
    );
    let app = test_router(recognizer, tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/dup.png", server.uri())))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["ruts"], json!(["12.345.678-5", "7.654.321-0"]));
}

#[tokio::test]
async fn test_html_page_is_rejected() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "/index.html",
        b"<html><body>hola</body></html>".to_vec(),
        Some("text/html"),
        1,
    )
    .await;

    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new("unused", 0.0);
    let app = test_router(recognizer.clone(), tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/index.html", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "ok": false,
            "error": "La URL no devuelve una imagen (content-type inválido)",
            "detalle": "text/html",
        })
    );
    assert_eq!(recognizer.calls(), 0);
    assert_no_temp_files(tmp.path());
}

#[tokio::test]
async fn test_missing_content_type_is_reported_as_unknown() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(&server, "/raw", card_image(ImageFormat::Png), None, 1).await;

    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(StubRecognizer::new("unused", 0.0), tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/raw", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detalle"], "desconocido");
}

#[tokio::test]
async fn test_unreachable_host_is_internal_error() {
    init_test_logger();
    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new("unused", 0.0);
    let app = test_router(recognizer.clone(), tmp.path());

    let response = app
        .oneshot(ocr_request("http://127.0.0.1:1/carnet.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Error interno");
    assert!(json["detalle"].is_string());
    assert_eq!(recognizer.calls(), 0);
    assert_no_temp_files(tmp.path());
}

#[tokio::test]
async fn test_corrupt_image_is_unsupported() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "/broken.png",
        b"\x89PNG\r\n\x1a\ntruncated".to_vec(),
        Some("image/png"),
        1,
    )
    .await;

    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new("unused", 0.0);
    let app = test_router(recognizer.clone(), tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/broken.png", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Imagen no soportada por el procesador");
    assert_eq!(recognizer.calls(), 0);
    assert_no_temp_files(tmp.path());
}

#[tokio::test]
async fn test_image_without_text_yields_empty_ruts() {
    init_test_logger();
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "/noise.webp.png",
        card_image(ImageFormat::Png),
        Some("image/png"),
        1,
    )
    .await;

    let tmp = tempfile::tempdir().unwrap();
    let app = test_router(StubRecognizer::new("  .,;  ~ ", 9.0), tmp.path());

    let response = app
        .oneshot(ocr_request(&format!("{}/noise.webp.png", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["texto"], ".,; ~");
    assert_eq!(json["ruts"], json!([]));
    assert_eq!(json["confidence"], 9.0);
    assert_no_temp_files(tmp.path());
}

#[tokio::test]
async fn test_blank_image_url_is_missing() {
    init_test_logger();
    let tmp = tempfile::tempdir().unwrap();
    let recognizer = StubRecognizer::new("unused", 0.0);
    let app = test_router(recognizer.clone(), tmp.path());

    let response = app.oneshot(ocr_request("   ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "error": "Falta imageUrl" })
    );
    assert_eq!(recognizer.calls(), 0);
}
