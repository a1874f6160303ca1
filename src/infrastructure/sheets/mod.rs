//! Google Sheets interaction log
//!
//! Appends one (question, answer) row per answered message to the first
//! worksheet of a spreadsheet.

pub mod auth;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;

use crate::application::errors::SheetsError;
use crate::domain::entities::Interaction;
use crate::domain::traits::InteractionLog;
use auth::{fetch_access_token, ServiceAccountKey};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4";
const DRIVE_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Which spreadsheet rows go to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    Id(String),
    /// Looked up through Drive on every append
    Name(String),
}

/// Service-account backed Sheets logger
pub struct GoogleSheetsLog {
    client: Client,
    credentials_file: PathBuf,
    spreadsheet: SpreadsheetRef,
    sheets_base: String,
    drive_base: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

impl GoogleSheetsLog {
    pub fn new(credentials_file: impl Into<PathBuf>, spreadsheet: SpreadsheetRef) -> Self {
        Self {
            client: Client::new(),
            credentials_file: credentials_file.into(),
            spreadsheet,
            sheets_base: SHEETS_BASE.to_string(),
            drive_base: DRIVE_BASE.to_string(),
        }
    }

    /// Point the Sheets and Drive calls at another host (proxies, tests)
    pub fn with_base_urls(mut self, sheets: impl Into<String>, drive: impl Into<String>) -> Self {
        self.sheets_base = sheets.into().trim_end_matches('/').to_string();
        self.drive_base = drive.into().trim_end_matches('/').to_string();
        self
    }

    async fn spreadsheet_id(&self, token: &str) -> Result<String, SheetsError> {
        let name = match &self.spreadsheet {
            SpreadsheetRef::Id(id) => return Ok(id.clone()),
            SpreadsheetRef::Name(name) => name,
        };

        let query = drive_query(name);
        let response = self.client
            .get(format!("{}/files", self.drive_base))
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)"), ("pageSize", "1")])
            .send()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let list: FileList = read_json(response).await?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::NotFound(name.clone()))
    }

    async fn first_sheet_title(&self, token: &str, spreadsheet_id: &str) -> Result<String, SheetsError> {
        let response = self.client
            .get(format!("{}/spreadsheets/{}", self.sheets_base, spreadsheet_id))
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let meta: SpreadsheetMeta = read_json(response).await?;
        meta.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| SheetsError::NotFound(format!("no worksheets in {}", spreadsheet_id)))
    }
}

/// Drive search for a spreadsheet with exactly this name
fn drive_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false",
        escaped
    )
}

/// A1 range covering a whole worksheet, percent-encoded for the URL path
fn sheet_range(title: &str) -> String {
    let quoted = format!("'{}'", title.replace('\'', "''"));
    urlencoding::encode(&quoted).into_owned()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, SheetsError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SheetsError::Api(format!("status: {}, body: {}", status, body)));
    }
    response
        .json()
        .await
        .map_err(|e| SheetsError::Api(e.to_string()))
}

#[async_trait]
impl InteractionLog for GoogleSheetsLog {
    async fn append(&self, interaction: &Interaction) -> Result<(), SheetsError> {
        let key = ServiceAccountKey::load(&self.credentials_file).await?;
        let token = fetch_access_token(&self.client, &key).await?;

        let spreadsheet_id = self.spreadsheet_id(&token).await?;
        let title = self.first_sheet_title(&token, &spreadsheet_id).await?;

        let url = format!(
            "{}/spreadsheets/{}/values/{}:append",
            self.sheets_base,
            spreadsheet_id,
            sheet_range(&title)
        );
        let body = serde_json::json!({ "values": [interaction.as_row()] });

        let response = self.client
            .post(url)
            .bearer_auth(&token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let _: serde_json::Value = read_json(response).await?;
        tracing::debug!("Appended interaction to sheet '{}'", title);
        Ok(())
    }
}
