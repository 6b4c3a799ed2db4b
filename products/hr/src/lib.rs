//! HR domain model: employee records, required-field rules and the
//! partial-update merge shared by every store backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Schemaless field map of one employee document, identifier excluded.
pub type Fields = Map<String, Value>;

/// Key under which the identifier travels on the wire.
pub const ID_FIELD: &str = "id";

/// Fields that must be present and non-empty when an employee is created.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "surname", "email", "idNumber"];

/// Employee attributes as entered on the registration form, before the
/// store has assigned an identifier.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub surname: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub email: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub id_number: String,
    /// Any additional attributes, carried through untouched.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Read a known field as text whatever JSON the store holds for it; `null`
/// reads as empty.
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

impl EmployeeDraft {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        id_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            id_number: id_number.into(),
            extra: Fields::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Flatten the draft into the field map stored for the document.
    pub fn to_fields(&self) -> Fields {
        let mut fields = self.extra.clone();
        fields.remove(ID_FIELD);
        fields.insert("name".into(), Value::from(self.name.as_str()));
        fields.insert("surname".into(), Value::from(self.surname.as_str()));
        fields.insert("email".into(), Value::from(self.email.as_str()));
        fields.insert("idNumber".into(), Value::from(self.id_number.as_str()));
        fields
    }
}

/// A stored employee: the store-assigned identifier plus its attributes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Employee {
    pub id: String,
    #[serde(flatten)]
    pub draft: EmployeeDraft,
}

impl Employee {
    pub fn new(id: impl Into<String>, draft: EmployeeDraft) -> Self {
        Self {
            id: id.into(),
            draft,
        }
    }
}

/// Whether a JSON value counts as "absent" for a required field: null,
/// false, zero and the empty string are all treated as missing.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Required fields that are missing or blank in `fields`.
pub fn missing_required(fields: &Fields) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| fields.get(*key).is_none_or(is_blank))
        .collect()
}

/// Drop the identifier from an update payload; identifiers are immutable.
pub fn strip_identifier(mut patch: Fields) -> Fields {
    patch.remove(ID_FIELD);
    patch
}

/// Merge `patch` over `target`: keys in the patch replace existing values,
/// keys absent from the patch are left untouched.
pub fn apply_patch(target: &mut Fields, patch: Fields) {
    for (key, value) in strip_identifier(patch) {
        target.insert(key, value);
    }
}
