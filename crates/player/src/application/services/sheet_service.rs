//! Sheet Service - load, save and import character sheets.
//!
//! Save decides create vs update from the [`SheetSession`]: with no
//! current id it POSTs and adopts the returned id, otherwise it PATCHes.
//! On success it always re-fetches the sheet and hands back the
//! server-confirmed document, so the form is re-rendered from what the
//! server actually stored (guarding against server-side normalization).

use std::sync::Arc;

use serde_json::Value;

use vellum_shared::{unwrap_list, SavePayload, SheetData, SheetDocument, SheetSummary};

use crate::application::error::{parse_value, ServiceError};
use crate::ports::{FileUpload, HttpPort, UploadPart};
use crate::session::SheetSession;

const SHEETS_PATH: &str = "/api/sheets/";
const DEFAULT_SHEET_NAME: &str = "Untitled sheet";
const DEFAULT_IMPORT_NAME: &str = "Imported sheet";

fn sheet_path(id: i64) -> String {
    format!("/api/sheets/{id}/")
}

#[derive(Clone)]
pub struct SheetService {
    api: Arc<dyn HttpPort>,
}

impl SheetService {
    pub fn new(api: Arc<dyn HttpPort>) -> Self {
        Self { api }
    }

    /// List sheets for the picker.
    pub async fn list(&self) -> Result<Vec<SheetSummary>, ServiceError> {
        let value = self.api.get_json(SHEETS_PATH).await?;
        Ok(unwrap_list(value))
    }

    /// Fetch a sheet without touching the session.
    pub async fn fetch(&self, id: i64) -> Result<SheetDocument, ServiceError> {
        parse_value(self.api.get_json(&sheet_path(id)).await?)
    }

    /// Fetch a sheet and make it the current one.
    pub async fn load(
        &self,
        session: &mut SheetSession,
        id: i64,
    ) -> Result<SheetDocument, ServiceError> {
        let document = self.fetch(id).await?;
        session.adopt(document.id);
        Ok(document)
    }

    /// Persist the serialized form, then re-fetch the stored sheet.
    ///
    /// `avatar` switches the request to multipart so the image file
    /// travels with the same save.
    pub async fn save(
        &self,
        session: &mut SheetSession,
        data: SheetData,
        avatar: Option<FileUpload>,
    ) -> Result<SheetDocument, ServiceError> {
        let id = match session.current_id() {
            Some(id) => {
                match avatar {
                    Some(file) => {
                        let parts = save_parts(None, &data, file)?;
                        self.api.patch_multipart(&sheet_path(id), parts).await?;
                    }
                    None => {
                        let body = save_body(None, &data)?;
                        self.api.patch_json(&sheet_path(id), &body).await?;
                    }
                }
                id
            }
            None => {
                let created = match avatar {
                    Some(file) => {
                        let parts = save_parts(Some(DEFAULT_SHEET_NAME), &data, file)?;
                        self.api.post_multipart(SHEETS_PATH, parts).await?
                    }
                    None => {
                        let body = save_body(Some(DEFAULT_SHEET_NAME), &data)?;
                        self.api.post_json(SHEETS_PATH, &body).await?
                    }
                };
                let created: SheetDocument = parse_value(created)?;
                session.adopt(created.id);
                created.id
            }
        };
        self.fetch(id).await
    }

    /// Upload a PDF to the parsing endpoint; the response is a freshly
    /// created sheet that becomes the current one.
    pub async fn import(
        &self,
        session: &mut SheetSession,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<SheetDocument, ServiceError> {
        let name = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(file_name)
            .trim();
        let name = if name.is_empty() { DEFAULT_IMPORT_NAME } else { name };

        let parts = vec![
            UploadPart::file("pdf", file_name, "application/pdf", bytes),
            UploadPart::text("name", name),
        ];
        let document: SheetDocument =
            parse_value(self.api.post_multipart(SHEETS_PATH, parts).await?)?;
        session.adopt(document.id);
        Ok(document)
    }
}

fn save_body(name: Option<&str>, data: &SheetData) -> Result<Value, ServiceError> {
    let payload = SavePayload {
        name: name.map(String::from),
        data: data.clone(),
    };
    serde_json::to_value(payload).map_err(|e| ServiceError::Parse(e.to_string()))
}

fn save_parts(
    name: Option<&str>,
    data: &SheetData,
    avatar: FileUpload,
) -> Result<Vec<UploadPart>, ServiceError> {
    let data = serde_json::to_string(data).map_err(|e| ServiceError::Parse(e.to_string()))?;
    let mut parts = Vec::new();
    if let Some(name) = name {
        parts.push(UploadPart::text("name", name));
    }
    parts.push(UploadPart::text("data", data));
    parts.push(UploadPart::file(
        "avatar",
        avatar.file_name,
        avatar.mime,
        avatar.bytes,
    ));
    Ok(parts)
}
