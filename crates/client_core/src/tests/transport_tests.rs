use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use shared::protocol::{Payload, Severity};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;
use crate::{
    config::{ClientSettings, DispatchMode},
    dispatcher::Dispatcher,
    error::DispatchError,
    registry::{Service, ServiceRegistry},
};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    target: String,
    service_name: Option<String>,
    file_name: Option<String>,
    file_token: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct ServerState {
    seen: Arc<Mutex<Vec<Recorded>>>,
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn json_reply(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

async fn handle(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    state.seen.lock().await.push(Recorded {
        method: method.clone(),
        target: target.clone(),
        service_name: header_text(&headers, SERVICE_NAME_HEADER),
        file_name: header_text(&headers, FILE_NAME_HEADER),
        file_token: header_text(&headers, FILE_TOKEN_HEADER),
        body: body.to_vec(),
    });

    match (method.as_str(), uri.path()) {
        ("GET", "/rest/owner/id/7") => json_reply(
            StatusCode::OK,
            json!({"_requestStatus": "ok", "ownerId": 7, "firstName": "Jane"}),
        ),
        ("POST", "/rest/owner") => json_reply(StatusCode::OK, json!({"ownerId": 12})),
        ("POST", "/rest/visit") => json_reply(
            StatusCode::OK,
            json!({
                "_requestStatus": "error",
                "_messages": [
                    {"messageType": "error", "fieldName": "description", "text": "Description is required"},
                    {"messageType": "warning", "text": "Visit date defaulted"}
                ]
            }),
        ),
        ("POST", "/rest/pet") => json_reply(
            StatusCode::BAD_REQUEST,
            json!({
                "_requestStatus": "error",
                "_messages": [{"messageType": "error", "text": "Pet type is unknown"}]
            }),
        ),
        ("POST", "/a._s") => json_reply(StatusCode::OK, json!({"served": true})),
        ("GET", "/rest/vet") => (StatusCode::OK, "<html>not json</html>").into_response(),
        ("GET", "/rest/petType") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        ("POST", "/a._f") => json_reply(StatusCode::OK, json!({"_fileToken": "tok-9"})),
        ("GET", "/a._f") => (StatusCode::OK, "stored-bytes").into_response(),
        ("POST", "/a._o") => StatusCode::OK.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_form_server() -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = ServerState::default();
    let app = Router::new().fallback(handle).with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn settings_for(server_url: &str) -> ClientSettings {
    ClientSettings {
        server_url: server_url.to_string(),
        ..ClientSettings::default()
    }
}

fn http_dispatcher(server_url: &str) -> Dispatcher {
    let transport = HttpTransport::new(&settings_for(server_url)).expect("transport");
    Dispatcher::new(Arc::new(transport), ServiceRegistry::standard())
}

#[test]
fn base_url_gains_a_trailing_slash() {
    let transport = HttpTransport::new(&settings_for("http://127.0.0.1:9/petclinic")).unwrap();
    assert_eq!(transport.base_url().as_str(), "http://127.0.0.1:9/petclinic/");
}

#[test]
fn unparsable_server_url_is_rejected() {
    let result = HttpTransport::new(&settings_for("not a url"));
    assert!(matches!(result, Err(TransportError::Url { .. })));
}

#[tokio::test]
async fn get_moves_path_param_into_url_and_rest_into_query() {
    let (server_url, state) = spawn_form_server().await;
    let dispatcher = http_dispatcher(&server_url);

    let response = dispatcher
        .call(
            Service::GetOwner,
            Payload::new().with("ownerId", "7").with("note", "a b&c"),
        )
        .await
        .expect("get owner");
    assert_eq!(response.text("firstName").as_deref(), Some("Jane"));

    let seen = state.seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].target, "/rest/owner/id/7?note=a%20b%26c");
    assert!(seen[0].body.is_empty());
}

#[tokio::test]
async fn post_sends_payload_as_json_body() {
    let (server_url, state) = spawn_form_server().await;
    let dispatcher = http_dispatcher(&server_url);

    let response = dispatcher
        .call(
            Service::SaveOwner,
            Payload::new().with("firstName", "Jane").with("lastName", "Doe"),
        )
        .await
        .expect("save owner");
    assert_eq!(response.text("ownerId").as_deref(), Some("12"));

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].target, "/rest/owner");
    let body: Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(body, json!({"firstName": "Jane", "lastName": "Doe"}));
}

#[tokio::test]
async fn error_envelope_becomes_rejection_with_messages() {
    let (server_url, _state) = spawn_form_server().await;
    let dispatcher = http_dispatcher(&server_url);

    let err = dispatcher
        .call(Service::SaveVisit, Payload::new().with("petId", "3"))
        .await
        .unwrap_err();
    let messages = err.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].field_name.as_deref(), Some("description"));
    assert_eq!(messages[1].severity, Severity::Warning);
}

#[tokio::test]
async fn error_envelope_on_non_success_status_is_still_read() {
    let (server_url, _state) = spawn_form_server().await;
    let dispatcher = http_dispatcher(&server_url);

    let err = dispatcher
        .call(Service::SavePet, Payload::new().with("name", "Rex"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Rejected { .. }));
    assert_eq!(err.messages()[0].text, "Pet type is unknown");
}

#[tokio::test]
async fn named_mode_posts_everything_to_the_gateway() {
    let (server_url, state) = spawn_form_server().await;
    let dispatcher = http_dispatcher(&server_url).with_mode(DispatchMode::Named);

    let response = dispatcher
        .call(Service::GetOwner, Payload::new().with("ownerId", "7"))
        .await
        .expect("gateway call");
    assert_eq!(response.get("served"), Some(&json!(true)));

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].target, "/a._s");
    assert_eq!(seen[0].service_name.as_deref(), Some("pet.owner.get"));
    let body: Value = serde_json::from_slice(&seen[0].body).unwrap();
    assert_eq!(body, json!({"ownerId": "7"}));
}

#[tokio::test]
async fn undecodable_and_failed_responses_are_transport_errors() {
    let (server_url, _state) = spawn_form_server().await;
    let dispatcher = http_dispatcher(&server_url);

    let err = dispatcher.call(Service::GetVets, Payload::new()).await.unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Transport(TransportError::Decode { .. })
    ));

    let err = dispatcher
        .call(Service::GetPetTypes, Payload::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Transport(TransportError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn upload_returns_token_and_download_sends_it_back() {
    let (server_url, state) = spawn_form_server().await;
    let transport = HttpTransport::new(&settings_for(&server_url)).unwrap();

    let token = transport
        .upload_file(FileUpload::new("cv.pdf", "application/pdf", b"%PDF".to_vec()))
        .await
        .expect("upload");
    assert_eq!(token, "tok-9");

    let bytes = transport
        .download_file(&token, "cv.pdf", "application/pdf")
        .await
        .expect("download");
    assert_eq!(bytes, b"stored-bytes");

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].file_name.as_deref(), Some("cv.pdf"));
    assert_eq!(seen[0].body, b"%PDF");
    assert_eq!(seen[1].method, Method::GET);
    assert_eq!(seen[1].file_token.as_deref(), Some("tok-9"));
}

#[tokio::test]
async fn logout_posts_to_the_logout_endpoint() {
    let (server_url, state) = spawn_form_server().await;
    let transport = HttpTransport::new(&settings_for(&server_url)).unwrap();

    transport.logout().await.expect("logout");

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].target, "/a._o");
}

#[test]
fn mime_type_is_guessed_from_the_extension() {
    assert_eq!(guess_mime_type("report.PDF"), "application/pdf");
    assert_eq!(guess_mime_type("notes"), DEFAULT_MIME_TYPE);
}
