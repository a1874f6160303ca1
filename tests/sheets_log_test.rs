//! Google Sheets interaction log against a local stand-in for the
//! token, Drive and Sheets endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use psu_reg_bot::application::errors::SheetsError;
use psu_reg_bot::domain::entities::Interaction;
use psu_reg_bot::domain::traits::InteractionLog;
use psu_reg_bot::infrastructure::sheets::{GoogleSheetsLog, SpreadsheetRef};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const TEST_KEY_PEM: &str = include_str!("fixtures/test_service_account.pem");

#[derive(Clone)]
struct FakeGoogle {
    append_status: StatusCode,
    calls: Arc<Mutex<Vec<String>>>,
    drive_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    appended: Arc<Mutex<Vec<(String, String, HashMap<String, String>, Value)>>>,
}

impl FakeGoogle {
    fn new(append_status: StatusCode) -> Self {
        Self {
            append_status,
            calls: Arc::default(),
            drive_queries: Arc::default(),
            appended: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn token(
    State(fake): State<FakeGoogle>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.calls.lock().unwrap().push("token".to_string());
    let grant_ok = form.get("grant_type").map(String::as_str)
        == Some("urn:ietf:params:oauth:grant-type:jwt-bearer");
    if !grant_ok || form.get("assertion").map_or(true, |a| a.split('.').count() != 3) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"})));
    }
    (StatusCode::OK, Json(json!({"access_token": "ya29.test", "expires_in": 3599, "token_type": "Bearer"})))
}

async fn drive_files(
    State(fake): State<FakeGoogle>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    fake.calls.lock().unwrap().push(format!("drive {:?}", bearer(&headers)));
    fake.drive_queries.lock().unwrap().push(query);
    Json(json!({"files": [{"id": "SID", "name": "Bot log"}]}))
}

async fn spreadsheet_meta(State(fake): State<FakeGoogle>, Path(id): Path<String>) -> Json<Value> {
    fake.calls.lock().unwrap().push(format!("meta {}", id));
    Json(json!({"sheets": [{"properties": {"title": "Sheet1"}}, {"properties": {"title": "Archive"}}]}))
}

async fn append_values(
    State(fake): State<FakeGoogle>,
    Path((id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.calls.lock().unwrap().push(format!("append {}", id));
    fake.appended.lock().unwrap().push((id, range, query, body));
    if fake.append_status.is_success() {
        (fake.append_status, Json(json!({"spreadsheetId": "SID", "updates": {"updatedRows": 1}})))
    } else {
        (fake.append_status, Json(json!({"error": {"code": 403, "message": "The caller does not have permission"}})))
    }
}

/// Start the stand-in and return its base URL
async fn start_fake(fake: FakeGoogle) -> String {
    let app = Router::new()
        .route("/token", post(token))
        .route("/drive/files", get(drive_files))
        .route("/sheets/spreadsheets/:id", get(spreadsheet_meta))
        .route("/sheets/spreadsheets/:id/values/:range", post(append_values))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

/// Service-account key file whose token URI is the stand-in
fn write_key_file(dir: &tempfile::TempDir, base: &str) -> std::path::PathBuf {
    let path = dir.path().join("service_account.json");
    let key = json!({
        "type": "service_account",
        "client_email": "reg-bot@psu-test.iam.gserviceaccount.com",
        "private_key": TEST_KEY_PEM,
        "token_uri": format!("{}/token", base),
    });
    std::fs::write(&path, key.to_string()).expect("write key file");
    path
}

fn log_for(base: &str, key_file: std::path::PathBuf, spreadsheet: SpreadsheetRef) -> GoogleSheetsLog {
    GoogleSheetsLog::new(key_file, spreadsheet)
        .with_base_urls(format!("{}/sheets", base), format!("{}/drive", base))
}

#[tokio::test]
async fn append_by_name_finds_spreadsheet_and_first_sheet() {
    let fake = FakeGoogle::new(StatusCode::OK);
    let base = start_fake(fake.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let log = log_for(&base, write_key_file(&dir, &base), SpreadsheetRef::Name("Bot log".to_string()));

    log.append(&Interaction::new("q", "a")).await.expect("append should succeed");

    assert_eq!(
        fake.calls(),
        vec![
            "token".to_string(),
            "drive Some(\"Bearer ya29.test\")".to_string(),
            "meta SID".to_string(),
            "append SID".to_string(),
        ]
    );

    let queries = fake.drive_queries.lock().unwrap();
    assert_eq!(
        queries[0].get("q").map(String::as_str),
        Some("name = 'Bot log' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false")
    );

    let appended = fake.appended.lock().unwrap();
    let (id, range, query, body) = &appended[0];
    assert_eq!(id, "SID");
    assert_eq!(range, "'Sheet1':append");
    assert_eq!(query.get("valueInputOption").map(String::as_str), Some("RAW"));
    assert_eq!(query.get("insertDataOption").map(String::as_str), Some("INSERT_ROWS"));
    assert_eq!(body, &json!({"values": [["q", "a"]]}));
}

#[tokio::test]
async fn append_by_id_skips_drive_lookup() {
    let fake = FakeGoogle::new(StatusCode::OK);
    let base = start_fake(fake.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let log = log_for(&base, write_key_file(&dir, &base), SpreadsheetRef::Id("SID".to_string()));

    log.append(&Interaction::new("เวลาเรียน", "https://regist.pn.psu.ac.th/")).await.unwrap();

    assert_eq!(fake.calls(), vec!["token", "meta SID", "append SID"]);
    assert_eq!(
        fake.appended.lock().unwrap()[0].3,
        json!({"values": [["เวลาเรียน", "https://regist.pn.psu.ac.th/"]]})
    );
}

#[tokio::test]
async fn rejected_append_is_api_error() {
    let fake = FakeGoogle::new(StatusCode::FORBIDDEN);
    let base = start_fake(fake.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let log = log_for(&base, write_key_file(&dir, &base), SpreadsheetRef::Id("SID".to_string()));

    let err = log.append(&Interaction::new("q", "a")).await.unwrap_err();

    match err {
        SheetsError::Api(msg) => assert!(msg.contains("403"), "unexpected message: {}", msg),
        other => panic!("expected Api error, got {:?}", other),
    }
}
