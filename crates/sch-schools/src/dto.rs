use serde::Deserialize;
use serde::Serialize;

/// Response to a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    pub id: i32,
}

impl Created {
    pub fn new(id: i32) -> Self {
        Self {
            message: "School added successfully".to_string(),
            id,
        }
    }
}

/// Response of the health endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: Some("Server is running".to_string()),
            error: None,
        }
    }
    pub fn failed(error: String) -> Self {
        Self {
            status: "Database connection failed".to_string(),
            message: None,
            error: Some(error),
        }
    }
}
