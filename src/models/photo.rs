use serde::Serialize;

/// Listing entry for a client's photo; the bytes are fetched separately
#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
#[sqlx(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub struct PhotoSummary {
    pub id: i64,
    pub file_name: String,
}

/// Stored image bytes with their content type
#[derive(sqlx::FromRow, Debug, Clone)]
#[sqlx(rename_all = "PascalCase")]
pub struct PhotoContent {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A photo received from an upload, not yet stored
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
