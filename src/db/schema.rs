use crate::models::{ANAMNESIS_FIELDS, CLIENT_FIELDS};

/// DDL for the three tables, in creation order. Every statement is idempotent.
///
/// Foreign keys carry no `ON DELETE CASCADE`; deleting a client removes its
/// dependent rows explicitly.
pub fn create_statements() -> Vec<String> {
    let client_columns = CLIENT_FIELDS
        .iter()
        .map(|column| format!("\"{column}\" TEXT"))
        .collect::<Vec<_>>()
        .join(", ");

    let anamnesis_columns = ANAMNESIS_FIELDS
        .iter()
        .map(|spec| format!("\"{}\" {}", spec.name, spec.kind.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS \"client\" (\
             \"Id\" INTEGER PRIMARY KEY AUTOINCREMENT, {client_columns})"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS \"client_anamnesis\" (\
             \"ClientId\" INTEGER NOT NULL PRIMARY KEY REFERENCES \"client\" (\"Id\"), \
             {anamnesis_columns})"
        ),
        "CREATE TABLE IF NOT EXISTS \"client_photos\" (\
         \"Id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
         \"ClientId\" INTEGER NOT NULL REFERENCES \"client\" (\"Id\"), \
         \"FileName\" TEXT NOT NULL, \
         \"MimeType\" TEXT NOT NULL, \
         \"Data\" BLOB NOT NULL)"
            .to_string(),
        "CREATE INDEX IF NOT EXISTS \"client_photos_client_id\" ON \"client_photos\" (\"ClientId\")"
            .to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anamnesis_columns_typed_by_kind() {
        let statements = create_statements();
        let anamnesis = &statements[1];

        assert!(anamnesis.contains("\"HasDiabetes\" INTEGER"));
        assert!(anamnesis.contains("\"PregnancyWeeks\" REAL"));
        assert!(anamnesis.contains("\"BirthDate\" TEXT"));
        assert!(anamnesis.contains("\"Observations\" TEXT"));
        assert!(!anamnesis.contains("CASCADE"));
    }
}
