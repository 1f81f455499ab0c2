//! End-to-end tests over a real TCP connection.
//!
//! Verifies:
//! 1. JSON contracts decode the body and encode the response
//! 2. Multipart uploads reach the handler byte-exact
//! 3. HEAD answers with GET's headers and no body
//! 4. Oversized bodies are rejected with 413
//! 5. Unknown routes and methods get 404 and 405
//! 6. JSON bodies decode whatever content type the client declares

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use strongcontract_core::{
    ContractDescriptor, ContractResponse, Empty, HasFormat, MultiFormPayload, RawBytes,
};
use strongcontract_extract::{RawRequest, ResponseAdaptor};
use strongcontract_server::{
    register_empty, register_json, register_multipart, HandlerError, RegisterOptions, Routes,
    Server, ShutdownSignal,
};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Deserialize)]
struct Echo {
    message: String,
}

#[derive(Debug, Serialize)]
struct Echoed {
    message: String,
}

impl ContractResponse for Echoed {}

#[derive(Debug, Deserialize)]
struct ImageMeta {
    format: String,
}

impl HasFormat for ImageMeta {
    fn format(&self) -> &str {
        &self.format
    }
}

fn routes() -> Routes {
    let mut routes = Routes::new();

    register_json(
        &mut routes,
        &ContractDescriptor::<Echo, Echoed>::post("/v1/echo"),
        |payload: Echo, _request: RawRequest| async move {
            Ok::<_, HandlerError>(ResponseAdaptor::new(Echoed {
                message: payload.message,
            }))
        },
        RegisterOptions::verbose(),
    )
    .unwrap();

    register_multipart(
        &mut routes,
        &ContractDescriptor::<MultiFormPayload<ImageMeta>, RawBytes>::put("/v1/images/:id"),
        |payload: MultiFormPayload<ImageMeta>, _request: RawRequest| async move {
            let (_meta, data) = payload.into_parts();
            Ok::<_, HandlerError>(ResponseAdaptor::binary(RawBytes::from(data)))
        },
        RegisterOptions::default(),
    )
    .unwrap();

    register_empty(
        &mut routes,
        &ContractDescriptor::<Empty, Echoed>::get("/v1/status"),
        |_payload: Empty, _request: RawRequest| async {
            Ok::<_, HandlerError>(ResponseAdaptor::new(Echoed {
                message: "up".to_string(),
            }))
        },
        RegisterOptions::default(),
    )
    .unwrap();

    routes
}

/// Starts a server on an ephemeral port.
async fn start(max_body_size: usize) -> (SocketAddr, ShutdownSignal) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();

    let server = Server::builder()
        .max_body_size(max_body_size)
        .shutdown_timeout(Duration::from_secs(1))
        .routes(routes())
        .build();
    tokio::spawn(server.serve(listener, shutdown.clone()));

    (addr, shutdown)
}

fn request(
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> Request<Full<Bytes>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Full::new(Bytes::copy_from_slice(body))).unwrap()
}

/// Sends one request on a fresh connection and collects the whole reply.
async fn send(addr: SocketAddr, request: Request<Full<Bytes>>) -> Response<Bytes> {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, connection) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("client connection failed: {e}");
        }
    });

    let response = tokio::time::timeout(Duration::from_secs(5), sender.send_request(request))
        .await
        .unwrap()
        .unwrap();
    let (parts, body) = response.into_parts();
    let body = body.collect().await.unwrap().to_bytes();
    Response::from_parts(parts, body)
}

fn header_of<'a>(response: &'a Response<Bytes>, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn json_contract_round_trip() {
    let (addr, shutdown) = start(1024 * 1024).await;

    let reply = send(
        addr,
        request(
            Method::POST,
            "/v1/echo",
            Some("application/json"),
            br#"{"message":"hi"}"#,
        ),
    )
    .await;

    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(
        header_of(&reply, header::CONTENT_TYPE),
        Some("application/json")
    );
    assert_eq!(reply.body().as_ref(), br#"{"message":"hi"}"#);
    assert_eq!(
        header_of(&reply, header::CONTENT_LENGTH),
        Some(reply.body().len().to_string().as_str())
    );

    shutdown.trigger();
}

#[tokio::test]
async fn json_body_sent_as_form_still_decodes() {
    let (addr, shutdown) = start(1024 * 1024).await;

    let reply = send(
        addr,
        request(
            Method::POST,
            "/v1/echo",
            Some("application/x-www-form-urlencoded"),
            br#"{"message":"hi"}"#,
        ),
    )
    .await;

    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(reply.body().as_ref(), br#"{"message":"hi"}"#);

    shutdown.trigger();
}

#[tokio::test]
async fn multipart_upload_is_byte_exact() {
    let (addr, shutdown) = start(1024 * 1024).await;

    let file: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    let mut body = Vec::new();
    body.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"metaData\"\r\n\r\n");
    body.extend_from_slice(br#"{"format":"png"}"#);
    body.extend_from_slice(
        b"\r\n--XyZ\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\r\n",
    );
    body.extend_from_slice(file);
    body.extend_from_slice(b"\r\n--XyZ--\r\n");

    let reply = send(
        addr,
        request(
            Method::PUT,
            "/v1/images/7",
            Some("multipart/form-data; boundary=XyZ"),
            &body,
        ),
    )
    .await;

    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(
        header_of(&reply, header::CONTENT_TYPE),
        Some("application/octet-stream")
    );
    assert_eq!(reply.body().as_ref(), file);

    shutdown.trigger();
}

#[tokio::test]
async fn head_has_headers_but_no_body() {
    let (addr, shutdown) = start(1024 * 1024).await;

    let get = send(addr, request(Method::GET, "/v1/status", None, b"")).await;
    let head = send(addr, request(Method::HEAD, "/v1/status", None, b"")).await;

    assert_eq!(get.status(), StatusCode::OK);
    assert_eq!(head.status(), StatusCode::OK);
    assert_eq!(get.body().as_ref(), br#"{"message":"up"}"#);
    assert!(head.body().is_empty());
    assert_eq!(
        header_of(&head, header::CONTENT_TYPE),
        header_of(&get, header::CONTENT_TYPE)
    );

    shutdown.trigger();
}

#[tokio::test]
async fn oversized_body_is_413() {
    let (addr, shutdown) = start(8).await;

    let reply = send(
        addr,
        request(
            Method::POST,
            "/v1/echo",
            Some("application/json"),
            br#"{"message":"this is too long"}"#,
        ),
    )
    .await;

    assert_eq!(reply.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");

    shutdown.trigger();
}

#[tokio::test]
async fn unknown_route_and_method() {
    let (addr, shutdown) = start(1024 * 1024).await;

    let missing = send(addr, request(Method::GET, "/v1/nothing", None, b"")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let wrong = send(addr, request(Method::DELETE, "/v1/echo", None, b"")).await;
    assert_eq!(wrong.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_of(&wrong, header::ALLOW), Some("POST"));

    shutdown.trigger();
}

#[tokio::test]
async fn decode_failure_is_400() {
    let (addr, shutdown) = start(1024 * 1024).await;

    let reply = send(
        addr,
        request(
            Method::POST,
            "/v1/echo",
            Some("application/json"),
            br#"{"msg":"wrong field"}"#,
        ),
    )
    .await;

    assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(json["error"]["code"], "DECODE_FAILURE");

    shutdown.trigger();
}
