use super::*;
use sch_pg::StoreErr;

/// Every way a request against the school routes can fail.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("All fields are required")]
    Missing,
    #[error(transparent)]
    Upload(#[from] UploadErr),
    #[error("Invalid JSON body: {0}")]
    Body(String),
    #[error("A school with this name already exists")]
    Duplicate,
    #[error("School not found")]
    NotFound,
    /// `context` names the operation that failed.
    #[error("{context}")]
    Storage {
        context: &'static str,
        source: StoreErr,
    },
}

impl Failure {
    pub fn storage(context: &'static str) -> impl FnOnce(StoreErr) -> Self {
        move |source| {
            log::error!("database error: {}: {}", context, source);
            Self::Storage { context, source }
        }
    }

    /// HTTP status code as a plain integer.
    pub fn status(&self) -> u16 {
        match self {
            Self::Missing => 400,
            Self::Body(_) => 400,
            Self::Upload(UploadErr::Io(_)) => 500,
            Self::Upload(_) => 400,
            Self::Duplicate => 409,
            Self::NotFound => 404,
            Self::Storage { .. } => 500,
        }
    }

    /// JSON error payload: `{error}` plus `details` for server-side faults.
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::Storage { context, source } => {
                serde_json::json!({ "error": context, "details": source.to_string() })
            }
            Self::Upload(UploadErr::Io(e)) => {
                serde_json::json!({ "error": "Failed to store upload", "details": e.to_string() })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

#[cfg(feature = "server")]
impl actix_web::ResponseError for Failure {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.status())
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(Failure::Missing.status(), 400);
        assert_eq!(Failure::Upload(UploadErr::NotImage).status(), 400);
        assert_eq!(Failure::Upload(UploadErr::TooLarge).status(), 400);
        assert_eq!(Failure::Duplicate.status(), 409);
        assert_eq!(Failure::NotFound.status(), 404);
        assert_eq!(Failure::storage("Failed to add school")(StoreErr::Offline).status(), 500);
        let io = std::io::Error::other("disk full");
        assert_eq!(Failure::Upload(UploadErr::Io(io)).status(), 500);
    }

    #[test]
    fn bodies() {
        assert_eq!(
            Failure::Duplicate.body(),
            serde_json::json!({ "error": "A school with this name already exists" })
        );
        assert_eq!(
            Failure::Upload(UploadErr::NotImage).body(),
            serde_json::json!({ "error": "Only image files are allowed!" })
        );
        assert_eq!(
            Failure::storage("Failed to fetch schools")(StoreErr::Offline).body(),
            serde_json::json!({
                "error": "Failed to fetch schools",
                "details": "database is not connected",
            })
        );
    }
}
