use std::collections::HashMap;
use std::sync::LazyLock;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

/// How a field is coerced before it reaches the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored as 0/1
    Boolean,
    /// Stored as a real number
    Numeric,
    /// Stored verbatim as text, no parsing
    Date,
    /// Trimmed text
    Text,
}

impl FieldKind {
    /// Column type used when the table is created
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Boolean => "INTEGER",
            FieldKind::Numeric => "REAL",
            FieldKind::Date | FieldKind::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Canonical anamnesis columns. Every column list derived for SQL follows this order.
pub static ANAMNESIS_FIELDS: [FieldSpec; 40] = [
    field("BirthDate", FieldKind::Date),
    field("Occupation", FieldKind::Text),
    field("Phone", FieldKind::Text),
    field("Email", FieldKind::Text),
    field("Gender", FieldKind::Text),
    field("MaritalStatus", FieldKind::Text),
    field("ReferredBy", FieldKind::Text),
    field("MainComplaint", FieldKind::Text),
    field("HasDiabetes", FieldKind::Boolean),
    field("HasHypertension", FieldKind::Boolean),
    field("HasHeartDisease", FieldKind::Boolean),
    field("HasCirculatoryProblems", FieldKind::Boolean),
    field("HasVaricoseVeins", FieldKind::Boolean),
    field("HasThyroidDisorder", FieldKind::Boolean),
    field("HasKidneyDisease", FieldKind::Boolean),
    field("HasEpilepsy", FieldKind::Boolean),
    field("HasCancerHistory", FieldKind::Boolean),
    field("HasHepatitis", FieldKind::Boolean),
    field("HasHiv", FieldKind::Boolean),
    field("HasPacemaker", FieldKind::Boolean),
    field("DiseaseDetails", FieldKind::Text),
    field("HasAllergies", FieldKind::Boolean),
    field("AllergyDetails", FieldKind::Text),
    field("HasHadSurgery", FieldKind::Boolean),
    field("SurgeryDetails", FieldKind::Text),
    field("UsesMedication", FieldKind::Boolean),
    field("Medications", FieldKind::Text),
    field("IsPregnant", FieldKind::Boolean),
    field("PregnancyWeeks", FieldKind::Numeric),
    field("IsBreastfeeding", FieldKind::Boolean),
    field("IsSmoker", FieldKind::Boolean),
    field("DrinksAlcohol", FieldKind::Boolean),
    field("BitesNails", FieldKind::Boolean),
    field("PhysicalActivity", FieldKind::Text),
    field("WaterIntake", FieldKind::Text),
    field("SleepQuality", FieldKind::Text),
    field("FootwearType", FieldKind::Text),
    field("SockType", FieldKind::Text),
    field("ShoeSize", FieldKind::Text),
    field("Observations", FieldKind::Text),
];

static FIELD_KINDS: LazyLock<HashMap<&'static str, FieldKind>> = LazyLock::new(|| {
    ANAMNESIS_FIELDS
        .iter()
        .map(|spec| (spec.name, spec.kind))
        .collect()
});

/// Kind of a named field. Anything outside the anamnesis table is free text.
pub fn field_kind(name: &str) -> FieldKind {
    FIELD_KINDS.get(name).copied().unwrap_or(FieldKind::Text)
}

/// A normalized value ready to be bound to its column
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Flag(Option<i64>),
    Number(Option<f64>),
    Text(Option<String>),
}

impl StorageValue {
    /// SQL NULL of the column type matching `kind`
    pub fn null(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Boolean => StorageValue::Flag(None),
            FieldKind::Numeric => StorageValue::Number(None),
            FieldKind::Date | FieldKind::Text => StorageValue::Text(None),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            StorageValue::Flag(v) => v.is_none(),
            StorageValue::Number(v) => v.is_none(),
            StorageValue::Text(v) => v.is_none(),
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            StorageValue::Flag(v) => v.map(|flag| flag.to_string()),
            StorageValue::Number(v) => v.map(|n| n.to_string()),
            StorageValue::Text(v) => v,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            StorageValue::Flag(Some(flag)) => Value::from(*flag),
            StorageValue::Number(Some(n)) => number_to_json(*n),
            StorageValue::Text(Some(text)) => Value::String(text.clone()),
            StorageValue::Flag(None) | StorageValue::Number(None) | StorageValue::Text(None) => {
                Value::Null
            }
        }
    }
}

// Whole numbers come back as integers, so "12" reads back as 12 rather than 12.0.
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Normalize a raw request value for a field of the given kind.
///
/// Total over every input: malformed values degrade to NULL (or pass through
/// as text) instead of failing.
pub fn normalize(kind: FieldKind, raw: Option<&Value>) -> StorageValue {
    let value = match raw {
        None | Some(Value::Null) => return StorageValue::null(kind),
        Some(value) => value,
    };

    match kind {
        FieldKind::Boolean => match value {
            Value::String(s) if s.is_empty() => StorageValue::Flag(None),
            other => StorageValue::Flag(Some(i64::from(is_truthy(other)))),
        },
        FieldKind::Numeric => StorageValue::Number(parse_number(value)),
        FieldKind::Date => match value {
            Value::String(s) if s.trim().is_empty() => StorageValue::Text(None),
            Value::String(s) => StorageValue::Text(Some(s.clone())),
            other => StorageValue::Text(Some(other.to_string())),
        },
        FieldKind::Text => match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    StorageValue::Text(None)
                } else {
                    StorageValue::Text(Some(trimmed.to_string()))
                }
            }
            other => StorageValue::Text(Some(other.to_string())),
        },
    }
}

/// Normalize a raw request value by field name
pub fn normalize_field(name: &str, raw: Option<&Value>) -> StorageValue {
    normalize(field_kind(name), raw)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => s.trim() != "0",
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// The 40 normalized anamnesis values of one client, in canonical order
#[derive(Debug, Clone, PartialEq)]
pub struct AnamnesisRecord {
    values: Vec<StorageValue>,
}

impl AnamnesisRecord {
    /// Pick every anamnesis field out of a flat request body. Fields the body
    /// does not carry become NULL.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let values = ANAMNESIS_FIELDS
            .iter()
            .map(|spec| normalize(spec.kind, payload.get(spec.name)))
            .collect();

        Self { values }
    }

    /// Build from values already in canonical order (as read from the store)
    pub fn from_values(values: Vec<StorageValue>) -> Self {
        debug_assert_eq!(values.len(), ANAMNESIS_FIELDS.len());
        Self { values }
    }

    pub fn values(&self) -> &[StorageValue] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&StorageValue> {
        ANAMNESIS_FIELDS
            .iter()
            .position(|spec| spec.name == name)
            .and_then(|index| self.values.get(index))
    }

    pub(crate) fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for (spec, value) in ANAMNESIS_FIELDS.iter().zip(&self.values) {
            map.serialize_entry(spec.name, &value.to_json())?;
        }
        Ok(())
    }
}

impl Serialize for AnamnesisRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn boolean_fields() -> impl Iterator<Item = &'static FieldSpec> {
        ANAMNESIS_FIELDS.iter().filter(|spec| spec.kind == FieldKind::Boolean)
    }

    #[test]
    fn field_table_has_expected_shape() {
        let count = |kind| ANAMNESIS_FIELDS.iter().filter(|spec| spec.kind == kind).count();
        assert_eq!(count(FieldKind::Boolean), 20);
        assert_eq!(count(FieldKind::Numeric), 1);
        assert_eq!(count(FieldKind::Date), 1);
        assert_eq!(count(FieldKind::Text), 18);

        let mut names: Vec<_> = ANAMNESIS_FIELDS.iter().map(|spec| spec.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ANAMNESIS_FIELDS.len());
    }

    #[test]
    fn field_kind_lookup() {
        assert_eq!(field_kind("HasDiabetes"), FieldKind::Boolean);
        assert_eq!(field_kind("PregnancyWeeks"), FieldKind::Numeric);
        assert_eq!(field_kind("BirthDate"), FieldKind::Date);
        assert_eq!(field_kind("AllergyDetails"), FieldKind::Text);
        // client columns and unknown names are free text
        assert_eq!(field_kind("Name"), FieldKind::Text);
        assert_eq!(field_kind("SomethingElse"), FieldKind::Text);
    }

    #[test]
    fn absent_and_null_are_null_for_every_kind() {
        for kind in [FieldKind::Boolean, FieldKind::Numeric, FieldKind::Date, FieldKind::Text] {
            assert!(normalize(kind, None).is_null());
            assert!(normalize(kind, Some(&Value::Null)).is_null());
        }
    }

    #[test]
    fn boolean_fields_follow_flag_rules() {
        for spec in boolean_fields() {
            let norm = |v: Value| normalize_field(spec.name, Some(&v));
            assert_eq!(norm(json!("")), StorageValue::Flag(None), "{}", spec.name);
            assert_eq!(norm(json!("0")), StorageValue::Flag(Some(0)));
            assert_eq!(norm(json!(0)), StorageValue::Flag(Some(0)));
            assert_eq!(norm(json!(false)), StorageValue::Flag(Some(0)));
            assert_eq!(norm(json!("false")), StorageValue::Flag(Some(1)));
            assert_eq!(norm(json!("FALSE")), StorageValue::Flag(Some(1)));
            assert_eq!(norm(json!("true")), StorageValue::Flag(Some(1)));
            assert_eq!(norm(json!(true)), StorageValue::Flag(Some(1)));
            assert_eq!(norm(json!(1)), StorageValue::Flag(Some(1)));
            assert_eq!(norm(json!("yes")), StorageValue::Flag(Some(1)));
            assert_eq!(norm(json!("on")), StorageValue::Flag(Some(1)));
        }
    }

    #[test]
    fn numeric_field_parses_or_nulls() {
        let norm = |v: Value| normalize_field("PregnancyWeeks", Some(&v));
        assert_eq!(norm(json!("")), StorageValue::Number(None));
        assert_eq!(norm(json!("abc")), StorageValue::Number(None));
        assert_eq!(norm(json!("NaN")), StorageValue::Number(None));
        assert_eq!(norm(json!(true)), StorageValue::Number(None));
        assert_eq!(norm(json!("12")), StorageValue::Number(Some(12.0)));
        assert_eq!(norm(json!(" 7.5 ")), StorageValue::Number(Some(7.5)));
        assert_eq!(norm(json!(20)), StorageValue::Number(Some(20.0)));
    }

    #[test]
    fn date_field_is_passed_through() {
        let norm = |v: Value| normalize_field("BirthDate", Some(&v));
        assert_eq!(norm(json!("")), StorageValue::Text(None));
        assert_eq!(norm(json!("   ")), StorageValue::Text(None));
        assert_eq!(
            norm(json!("1990-05-01")),
            StorageValue::Text(Some("1990-05-01".into()))
        );
        // no trimming, no validation
        assert_eq!(
            norm(json!(" 01/05/1990")),
            StorageValue::Text(Some(" 01/05/1990".into()))
        );
        assert_eq!(
            norm(json!("not a date")),
            StorageValue::Text(Some("not a date".into()))
        );
    }

    #[test]
    fn text_fields_are_trimmed() {
        let norm = |v: Value| normalize_field("Occupation", Some(&v));
        assert_eq!(norm(json!("  ")), StorageValue::Text(None));
        assert_eq!(norm(json!("")), StorageValue::Text(None));
        assert_eq!(norm(json!("  John  ")), StorageValue::Text(Some("John".into())));
        assert_eq!(norm(json!(42)), StorageValue::Text(Some("42".into())));
    }

    #[test]
    fn record_from_payload_fills_missing_with_null() {
        let payload = json!({
            "Name": "Ana",
            "BitesNails": "true",
            "PregnancyWeeks": "",
            "Occupation": " Nurse ",
        });
        let record = AnamnesisRecord::from_payload(payload.as_object().unwrap());

        assert_eq!(record.values().len(), 40);
        assert_eq!(record.get("BitesNails"), Some(&StorageValue::Flag(Some(1))));
        assert_eq!(record.get("PregnancyWeeks"), Some(&StorageValue::Number(None)));
        assert_eq!(record.get("Occupation"), Some(&StorageValue::Text(Some("Nurse".into()))));
        assert_eq!(record.get("HasDiabetes"), Some(&StorageValue::Flag(None)));
        assert_eq!(record.get("Name"), None);

        let nulls = record.values().iter().filter(|v| v.is_null()).count();
        assert_eq!(nulls, 38);
    }

    #[test]
    fn record_serializes_flat_with_json_numbers() {
        let payload = json!({ "HasDiabetes": true, "PregnancyWeeks": "12" });
        let record = AnamnesisRecord::from_payload(payload.as_object().unwrap());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["HasDiabetes"], json!(1));
        assert_eq!(json["PregnancyWeeks"], json!(12));
        assert_eq!(json["BirthDate"], Value::Null);
        assert_eq!(json.as_object().unwrap().len(), 40);
    }

    #[test]
    fn fractional_numbers_stay_fractional() {
        assert_eq!(StorageValue::Number(Some(7.5)).to_json(), json!(7.5));
        assert_eq!(StorageValue::Number(Some(12.0)).to_json(), json!(12));
    }
}
