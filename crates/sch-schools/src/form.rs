use super::*;
use actix_multipart::Field;
use actix_multipart::Multipart;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::web;
use futures::StreamExt;
use futures::TryStreamExt;
use sch_core::FIELD_LIMIT;
use sch_core::JSON_LIMIT;

/// Name of the only form field allowed to carry a file.
pub const IMAGE_FIELD: &str = "image";

/// Parsed body of a create request.
#[derive(Debug, Default)]
pub struct Submission {
    pub fields: Fields,
    pub image: Option<Image>,
}

impl Submission {
    /// Reads a create request body.
    ///
    /// `multipart/form-data` yields text fields plus an optional stored image;
    /// JSON yields text fields only. Any other content type is an empty
    /// submission. On failure, an image already written is removed.
    pub async fn read(
        req: &HttpRequest,
        payload: web::Payload,
        uploads: &Uploads,
    ) -> Result<Self, Failure> {
        let kind = req.content_type().to_ascii_lowercase();
        if kind == "multipart/form-data" {
            Self::multipart(req, payload, uploads).await
        } else if kind == "application/json" || kind.ends_with("+json") {
            Self::json(payload).await
        } else {
            Ok(Self::default())
        }
    }

    async fn multipart(
        req: &HttpRequest,
        payload: web::Payload,
        uploads: &Uploads,
    ) -> Result<Self, Failure> {
        let mut form = Multipart::new(req.headers(), payload);
        let mut submission = Self::default();
        loop {
            let absorbed = match form.try_next().await {
                Ok(None) => break,
                Ok(Some(field)) => submission.absorb(field, uploads).await,
                Err(e) => Err(UploadErr::Malformed(e.to_string())),
            };
            if let Err(e) = absorbed {
                submission.discard().await;
                return Err(e.into());
            }
        }
        Ok(submission)
    }

    async fn absorb(&mut self, mut field: Field, uploads: &Uploads) -> Result<(), UploadErr> {
        let name = field.name().unwrap_or_default().to_string();
        let original = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        match original {
            None => {
                let value = text(&mut field).await?;
                self.fields.insert(name, value);
                Ok(())
            }
            // file input left empty by the browser
            Some(ref original) if original.is_empty() => drain(&mut field).await,
            Some(_) if name != IMAGE_FIELD || self.image.is_some() => Err(UploadErr::Unexpected),
            Some(ref original) => {
                let mime = field.content_type().map(|m| m.essence_str().to_string());
                let image = uploads.store(original, mime.as_deref(), field).await?;
                self.image = Some(image);
                Ok(())
            }
        }
    }

    async fn json(mut payload: web::Payload) -> Result<Self, Failure> {
        let mut body = web::BytesMut::new();
        while let Some(chunk) = payload.next().await {
            let chunk = chunk.map_err(|e| Failure::Body(e.to_string()))?;
            if body.len() + chunk.len() > JSON_LIMIT {
                return Err(Failure::Body("payload too large".to_string()));
            }
            body.extend_from_slice(&chunk);
        }
        if body.is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Err(e) => Err(Failure::Body(e.to_string())),
            Ok(serde_json::Value::Object(map)) => Ok(Self {
                fields: Fields::from(map),
                image: None,
            }),
            Ok(_) => Ok(Self::default()),
        }
    }

    /// Removes the stored image, if any.
    pub async fn discard(&mut self) {
        if let Some(image) = self.image.take() {
            image.discard().await;
        }
    }
}

async fn text(field: &mut Field) -> Result<String, UploadErr> {
    let mut value = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|e| UploadErr::Malformed(e.to_string()))? {
        if value.len() + chunk.len() > FIELD_LIMIT {
            return Err(UploadErr::FieldTooLong);
        }
        value.extend_from_slice(&chunk);
    }
    String::from_utf8(value).map_err(|e| UploadErr::Malformed(e.to_string()))
}

async fn drain(field: &mut Field) -> Result<(), UploadErr> {
    while field
        .try_next()
        .await
        .map_err(|e| UploadErr::Malformed(e.to_string()))?
        .is_some()
    {}
    Ok(())
}
