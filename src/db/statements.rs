use std::sync::LazyLock;

use crate::models::{ANAMNESIS_FIELDS, CLIENT_FIELDS};

/// SQL text for the client and anamnesis tables, derived from the field
/// tables the first time it is used and shared read-only afterwards.
pub struct Statements {
    pub insert_client: String,
    pub update_client: String,
    pub insert_anamnesis: String,
    pub upsert_anamnesis: String,
    pub select_clients: String,
    pub select_client_by_id: String,
}

pub static STATEMENTS: LazyLock<Statements> = LazyLock::new(Statements::build);

fn quote(column: &str) -> String {
    format!("\"{column}\"")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl Statements {
    fn build() -> Self {
        let client_columns = CLIENT_FIELDS.map(quote).join(", ");
        let anamnesis_columns: Vec<String> =
            ANAMNESIS_FIELDS.iter().map(|spec| quote(spec.name)).collect();

        let insert_client = format!(
            "INSERT INTO \"client\" ({client_columns}) VALUES ({}) RETURNING \"Id\"",
            placeholders(CLIENT_FIELDS.len())
        );

        let client_assignments = CLIENT_FIELDS
            .iter()
            .map(|column| format!("{} = ?", quote(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let update_client =
            format!("UPDATE \"client\" SET {client_assignments} WHERE \"Id\" = ?");

        let insert_anamnesis = format!(
            "INSERT INTO \"client_anamnesis\" (\"ClientId\", {}) VALUES ({})",
            anamnesis_columns.join(", "),
            placeholders(anamnesis_columns.len() + 1)
        );

        // full-row replace: every column is overwritten, including NULLs
        let upsert_assignments = anamnesis_columns
            .iter()
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let upsert_anamnesis = format!(
            "{insert_anamnesis} ON CONFLICT (\"ClientId\") DO UPDATE SET {upsert_assignments}"
        );

        let select_list = std::iter::once("c.\"Id\"".to_string())
            .chain(CLIENT_FIELDS.iter().map(|column| format!("c.{}", quote(column))))
            .chain(anamnesis_columns.iter().map(|column| format!("a.{column}")))
            .collect::<Vec<_>>()
            .join(", ");
        let select_clients = format!(
            "SELECT {select_list} FROM \"client\" c \
             LEFT JOIN \"client_anamnesis\" a ON a.\"ClientId\" = c.\"Id\""
        );
        let select_client_by_id = format!("{select_clients} WHERE c.\"Id\" = ?");

        Self {
            insert_client,
            update_client,
            insert_anamnesis,
            upsert_anamnesis,
            select_clients,
            select_client_by_id,
        }
    }
}
