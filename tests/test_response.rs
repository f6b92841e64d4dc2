use hearth::http::response::{Response, ResponseBuilder, StatusCode};
use hearth::http::writer::{serialize_response, ResponseWriter};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Created.as_u16(), 201);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Created.reason_phrase(), "Created");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_auto_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(&b"This is the body"[..])
        .build();

    assert_eq!(response.header("Content-Length"), Some("16"));
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body("test")
        .build();

    assert_eq!(response.header("content-length"), Some("999"));
    assert_eq!(response.headers.len(), 1);
}

#[test]
fn test_response_builder_replaces_header_in_place() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("X-Other", "1")
        .header("content-type", "text/plain")
        .build();

    assert_eq!(response.headers[0], ("Content-Type".to_string(), "text/plain".to_string()));
    assert_eq!(response.headers.len(), 3);
}

#[test]
fn test_response_empty_body() {
    let response = Response::empty(StatusCode::Created);

    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
    assert!(!response.force_close);
}

#[test]
fn test_response_helpers() {
    assert_eq!(Response::not_found().status, StatusCode::NotFound);
    assert_eq!(Response::bad_request().status, StatusCode::BadRequest);
    assert_eq!(Response::internal_error().status, StatusCode::InternalServerError);

    let ok = Response::ok("content");
    assert_eq!(ok.status, StatusCode::Ok);
    assert_eq!(&ok.body[..], b"content");
}

#[test]
fn test_close_override() {
    let response = ResponseBuilder::new(StatusCode::BadRequest).close().build();
    assert!(response.force_close);
}

#[test]
fn test_serialize_keep_alive() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .body("abc")
        .build();

    let wire = serialize_response(&response, true);
    assert_eq!(
        &wire[..],
        &b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\nConnection: keep-alive\r\n\r\nabc"[..]
    );
}

#[test]
fn test_serialize_close_on_error() {
    let wire = serialize_response(&Response::not_found(), false);
    assert_eq!(
        &wire[..],
        &b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"[..]
    );
}

#[test]
fn test_serialize_overrides_handler_connection_header() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Connection", "upgrade")
        .build();

    let wire = String::from_utf8(serialize_response(&response, false).to_vec()).unwrap();
    assert_eq!(wire.matches("Connection:").count(), 1);
    assert!(wire.contains("Connection: close\r\n"));
}

#[tokio::test]
async fn test_writer_writes_everything() {
    let body = vec![b'x'; 100_000];
    let response = Response::ok(body.clone());
    let mut writer = ResponseWriter::new(&response, true);
    let expected = writer.as_bytes().to_vec();

    let mut out: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut out).await.unwrap();

    assert_eq!(out, expected);
    assert!(out.ends_with(&body));
}
