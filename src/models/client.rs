use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::anamnesis::{normalize_field, AnamnesisRecord, ANAMNESIS_FIELDS};

/// Client columns besides `Id`, in binding order
pub const CLIENT_FIELDS: [&str; 4] = ["Name", "Adress", "Habits", "Accompaniment"];

/// The free-text columns of a client row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFields {
    pub name: Option<String>,
    pub adress: Option<String>,
    pub habits: Option<String>,
    pub accompaniment: Option<String>,
}

impl ClientFields {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let text = |name: &str| normalize_field(name, payload.get(name)).into_text();

        Self {
            name: text("Name"),
            adress: text("Adress"),
            habits: text("Habits"),
            accompaniment: text("Accompaniment"),
        }
    }

    /// Values in the same order as [`CLIENT_FIELDS`]
    pub fn values(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.adress.as_deref(),
            self.habits.as_deref(),
            self.accompaniment.as_deref(),
        ]
    }
}

/// A client joined with its anamnesis, serialized as one flat object
#[derive(Debug, Clone, PartialEq)]
pub struct ClientView {
    pub id: i64,
    pub client: ClientFields,
    pub anamnesis: AnamnesisRecord,
}

impl Serialize for ClientView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + CLIENT_FIELDS.len() + ANAMNESIS_FIELDS.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("Id", &self.id)?;
        for (name, value) in CLIENT_FIELDS.iter().zip(self.client.values()) {
            map.serialize_entry(name, &value)?;
        }
        self.anamnesis.serialize_entries(&mut map)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_fields_are_trimmed_and_nulled() {
        let payload = json!({
            "Name": "  Ana ",
            "Adress": "Rua A",
            "Habits": "",
            "BitesNails": "true",
        });
        let fields = ClientFields::from_payload(payload.as_object().unwrap());

        assert_eq!(
            fields,
            ClientFields {
                name: Some("Ana".into()),
                adress: Some("Rua A".into()),
                habits: None,
                accompaniment: None,
            }
        );
    }

    #[test]
    fn view_serializes_flat() {
        let payload = json!({ "Name": "Ana", "IsSmoker": 0 });
        let payload = payload.as_object().unwrap();
        let view = ClientView {
            id: 7,
            client: ClientFields::from_payload(payload),
            anamnesis: AnamnesisRecord::from_payload(payload),
        };

        let json = serde_json::to_value(&view).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 45);
        assert_eq!(json["Id"], json!(7));
        assert_eq!(json["Name"], json!("Ana"));
        assert_eq!(json["Habits"], Value::Null);
        assert_eq!(json["IsSmoker"], json!(0));
        assert_eq!(json["HasDiabetes"], Value::Null);
    }
}
