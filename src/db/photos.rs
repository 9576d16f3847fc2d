use crate::models::{NewPhoto, PhotoContent, PhotoSummary};

use super::{Database, DbError, DbResult};

impl Database {
    // Photo operations
    pub async fn add_photos(&self, client_id: i64, photos: &[NewPhoto]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock from its first
        // statement. The client check rides along in the insert.
        for photo in photos {
            let result = sqlx::query(
                r#"
                INSERT INTO "client_photos" ("ClientId", "FileName", "MimeType", "Data")
                SELECT ?, ?, ?, ?
                WHERE EXISTS (SELECT 1 FROM "client" WHERE "Id" = ?)
                "#,
            )
            .bind(client_id)
            .bind(photo.file_name.as_str())
            .bind(photo.mime_type.as_str())
            .bind(photo.data.as_slice())
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::NotFound("Client"));
            }
        }

        tx.commit().await?;

        tracing::debug!(client_id, count = photos.len(), "photos stored");

        Ok(())
    }

    pub async fn list_photos(&self, client_id: i64) -> DbResult<Vec<PhotoSummary>> {
        let photos = sqlx::query_as::<_, PhotoSummary>(
            r#"
            SELECT "Id", "FileName" FROM "client_photos"
            WHERE "ClientId" = ?
            ORDER BY "Id"
            "#,
        )
        .bind(client_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(photos)
    }

    pub async fn photo_content(&self, id: i64) -> DbResult<PhotoContent> {
        let photo = sqlx::query_as::<_, PhotoContent>(
            "SELECT \"MimeType\", \"Data\" FROM \"client_photos\" WHERE \"Id\" = ?",
        )
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?
        .ok_or(DbError::NotFound("Photo"))?;

        Ok(photo)
    }

    pub async fn delete_photo(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM \"client_photos\" WHERE \"Id\" = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Photo"));
        }

        Ok(())
    }
}
