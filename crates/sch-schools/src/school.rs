use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;

/// A stored school row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub image: Option<String>,
    pub email_id: String,
}

/// Columns returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub image: Option<String>,
}

impl From<&School> for SchoolSummary {
    fn from(school: &School) -> Self {
        Self {
            id: school.id,
            name: school.name.clone(),
            address: school.address.clone(),
            city: school.city.clone(),
            image: school.image.clone(),
        }
    }
}

/// A school that passed validation and awaits insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    pub image: Option<String>,
}

impl NewSchool {
    /// Names of the fields a create request must carry.
    pub const REQUIRED: [&'static str; 6] = ["name", "address", "city", "state", "contact", "email_id"];

    /// Builds a record from submitted fields.
    /// Returns `None` if any required field is absent or empty.
    pub fn from_fields(fields: &Fields, image: Option<String>) -> Option<Self> {
        Some(Self {
            name: fields.require("name")?,
            address: fields.require("address")?,
            city: fields.require("city")?,
            state: fields.require("state")?,
            contact: fields.require("contact")?,
            email_id: fields.require("email_id")?,
            image,
        })
    }

    pub fn stored(self, id: i32) -> School {
        School {
            id,
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            contact: self.contact,
            image: self.image,
            email_id: self.email_id,
        }
    }
}

/// Text fields of a create request, from either a form or a JSON body.
/// A repeated field keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(HashMap<String, String>);

impl Fields {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
    fn require(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).map(str::to_string)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// JSON bodies may carry non-string scalars; they are kept as their JSON text.
/// `null` counts as absent.
impl From<serde_json::Map<String, serde_json::Value>> for Fields {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect()
    }
}
