mod annexure;

pub use annexure::{
    AnnexureThresholds, FOOTER, NO_SPECIALTIES, SUBTITLE, TITLE, annexure_frame, annexure_sections,
    annexure_sections_with,
};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Keys of a submitted form that describe the hospital itself. Everything
/// else is auxiliary data for sections B to N.
pub const MAIN_FIELDS: [&str; 11] = [
    "name",
    "city",
    "address",
    "telephone",
    "mobile",
    "fax",
    "email",
    "superintendent_name",
    "superintendent_contact",
    "superintendent_email",
    "superintendent_phone",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MainDetails {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub mobile: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub superintendent_name: Option<String>,
    pub superintendent_contact: Option<String>,
    pub superintendent_email: Option<String>,
    pub superintendent_phone: Option<String>,
}

pub type AuxiliaryFields = Map<String, Value>;

/// Display text of a scalar form value. Strings are kept verbatim, numbers and
/// booleans print in their JSON form; null and empty strings have no text.
pub fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Move the eleven main fields out of a flat form body.
pub fn split_form(mut body: Map<String, Value>) -> (MainDetails, AuxiliaryFields) {
    let mut take = |key: &str| scalar_text(body.remove(key).as_ref());
    let main = MainDetails {
        name: take("name"),
        city: take("city"),
        address: take("address"),
        telephone: take("telephone"),
        mobile: take("mobile"),
        fax: take("fax"),
        email: take("email"),
        superintendent_name: take("superintendent_name"),
        superintendent_contact: take("superintendent_contact"),
        superintendent_email: take("superintendent_email"),
        superintendent_phone: take("superintendent_phone"),
    };
    (main, body)
}

/// Parse a form body from JSON text. The top level must be an object.
pub fn parse_form(json: &str) -> Result<(MainDetails, AuxiliaryFields), Error> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(body) => Ok(split_form(body)),
        other => Err(Error::InvalidForm(format!(
            "expected a JSON object, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Specialty {
    pub name: Option<String>,
    pub head: Option<String>,
}

#[derive(Default, Deserialize)]
struct RawSpecialty {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    head: Option<Value>,
}

/// Specialties listed under a form's `specialties` key, given either as a
/// JSON array or as a string holding one. Anything unparseable yields none.
pub fn parse_specialties(value: Option<&Value>) -> Vec<Specialty> {
    let items = match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) if !s.is_empty() => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                log::warn!("specialties JSON is not an array; ignoring it");
                return Vec::new();
            }
            Err(e) => {
                log::warn!("unparseable specialties ({e}); ignoring them");
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .map(|item| {
            let raw: RawSpecialty = serde_json::from_value(item).unwrap_or_default();
            Specialty {
                name: scalar_text(raw.name.as_ref()),
                head: scalar_text(raw.head.as_ref()),
            }
        })
        .collect()
}
