mod photos;
mod schema;
mod statements;

use std::str::FromStr;

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use crate::config::Config;
use crate::models::{
    AnamnesisRecord, ClientFields, ClientView, FieldKind, StorageValue, ANAMNESIS_FIELDS,
};
use statements::STATEMENTS;

/// Errors surfaced by the store
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> DbResult<Self> {
        Self::connect(config.database_url(), config.max_connections).await
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create any missing table
    pub async fn ensure_schema(&self) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        for statement in schema::create_statements() {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    // Client operations
    pub async fn list_clients(&self) -> DbResult<Vec<ClientView>> {
        let rows = sqlx::query(&STATEMENTS.select_clients)
            .fetch_all(self.get_pool())
            .await?;

        let clients = rows
            .iter()
            .map(client_view)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(clients)
    }

    pub async fn get_client(&self, id: i64) -> DbResult<ClientView> {
        let row = sqlx::query(&STATEMENTS.select_client_by_id)
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?
            .ok_or(DbError::NotFound("Client"))?;

        Ok(client_view(&row)?)
    }

    /// Insert a client and its anamnesis row atomically, returning the new id
    pub async fn create_client(
        &self,
        client: &ClientFields,
        anamnesis: &AnamnesisRecord,
    ) -> DbResult<i64> {
        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await?;

        let mut insert = sqlx::query_scalar::<Sqlite, i64>(&STATEMENTS.insert_client);
        for value in client.values() {
            insert = insert.bind(value);
        }
        let id = insert.fetch_one(&mut *tx).await?;

        bind_anamnesis(sqlx::query(&STATEMENTS.insert_anamnesis).bind(id), anamnesis)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(client_id = id, "client created");

        Ok(id)
    }

    /// Update the client columns and replace its whole anamnesis row
    pub async fn update_client(
        &self,
        id: i64,
        client: &ClientFields,
        anamnesis: &AnamnesisRecord,
    ) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let mut update = sqlx::query::<Sqlite>(&STATEMENTS.update_client);
        for value in client.values() {
            update = update.bind(value);
        }
        let result = update.bind(id).execute(&mut *tx).await?;

        // Without a client row the upsert would leave an orphan anamnesis row
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Client"));
        }

        bind_anamnesis(sqlx::query(&STATEMENTS.upsert_anamnesis).bind(id), anamnesis)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(client_id = id, "client updated");

        Ok(())
    }

    /// Delete a client together with its photos and anamnesis
    pub async fn delete_client(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM \"client_photos\" WHERE \"ClientId\" = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM \"client_anamnesis\" WHERE \"ClientId\" = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM \"client\" WHERE \"Id\" = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Client"));
        }

        tx.commit().await?;

        tracing::debug!(client_id = id, "client deleted");

        Ok(())
    }
}

fn bind_anamnesis<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    anamnesis: &AnamnesisRecord,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in anamnesis.values() {
        query = match value {
            StorageValue::Flag(flag) => query.bind(*flag),
            StorageValue::Number(number) => query.bind(*number),
            StorageValue::Text(text) => query.bind(text.clone()),
        };
    }
    query
}

fn client_view(row: &SqliteRow) -> Result<ClientView, sqlx::Error> {
    let client = ClientFields {
        name: row.try_get("Name")?,
        adress: row.try_get("Adress")?,
        habits: row.try_get("Habits")?,
        accompaniment: row.try_get("Accompaniment")?,
    };

    let values = ANAMNESIS_FIELDS
        .iter()
        .map(|spec| -> Result<StorageValue, sqlx::Error> {
            Ok(match spec.kind {
                FieldKind::Boolean => StorageValue::Flag(row.try_get(spec.name)?),
                FieldKind::Numeric => StorageValue::Number(row.try_get(spec.name)?),
                FieldKind::Date | FieldKind::Text => StorageValue::Text(row.try_get(spec.name)?),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClientView {
        id: row.try_get("Id")?,
        client,
        anamnesis: AnamnesisRecord::from_values(values),
    })
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> DbResult<Database> {
    let db = Database::new(config).await?;

    if config.init_schema {
        db.ensure_schema().await?;
    }

    Ok(db)
}
