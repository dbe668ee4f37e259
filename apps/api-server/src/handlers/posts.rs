//! Post submission handler.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;

use around_core::domain::{Attachment, Location, PostSubmission};
use around_shared::ApiResponse;
use around_shared::dto::PostCreatedResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// POST /post (multipart: message, lat, lon, image)
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.posts.max_upload_bytes).await?;
    tracing::info!(
        user = %identity.username,
        message = form.message.as_deref().unwrap_or_default(),
        has_image = form.image.is_some(),
        "Received one post request"
    );

    let submission = form.into_submission()?;
    let message = submission.message.clone();
    let id = state.ingest.ingest(&identity.username, submission).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        PostCreatedResponse { id: id.to_string() },
        format!("Post received: {message}"),
    )))
}

/// Raw form values of a post submission.
#[derive(Debug, Default)]
struct PostForm {
    message: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    image: Option<Attachment>,
}

enum FieldError {
    TooLarge,
    Stream(MultipartError),
}

impl PostForm {
    async fn read(mut payload: Multipart, limit: usize) -> AppResult<Self> {
        let mut form = Self::default();
        let mut total = 0usize;

        while let Some(item) = payload.next().await {
            let mut field = item
                .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;
            let name = field.name().unwrap_or_default().to_owned();

            if name == IMAGE_FIELD {
                let content_type = field.content_type().map(|m| m.to_string());
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_owned);

                let bytes = read_field(&mut field, &mut total, limit)
                    .await
                    .map_err(|e| match e {
                        FieldError::TooLarge => AppError::PayloadTooLarge(limit),
                        FieldError::Stream(e) => {
                            AppError::Internal(format!("Image is not available: {}", e))
                        }
                    })?;

                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    form.image = Some(Attachment {
                        bytes,
                        content_type,
                        file_name,
                    });
                }
                continue;
            }

            let bytes = read_field(&mut field, &mut total, limit)
                .await
                .map_err(|e| match e {
                    FieldError::TooLarge => AppError::PayloadTooLarge(limit),
                    FieldError::Stream(e) => {
                        AppError::BadRequest(format!("Could not read field {}: {}", name, e))
                    }
                })?;
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest(format!("Field {} must be UTF-8 text", name)))?;

            match name.as_str() {
                "message" => form.message = Some(value),
                "lat" => form.lat = Some(value),
                "lon" => form.lon = Some(value),
                _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    fn into_submission(self) -> AppResult<PostSubmission> {
        let location = Location::parse(
            self.lat.as_deref().unwrap_or_default(),
            self.lon.as_deref().unwrap_or_default(),
        )?;

        Ok(PostSubmission {
            message: self.message.unwrap_or_default(),
            location,
            attachment: self.image,
        })
    }
}

async fn read_field(
    field: &mut Field,
    total: &mut usize,
    limit: usize,
) -> Result<Vec<u8>, FieldError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(FieldError::Stream)?;
        *total += chunk.len();
        if *total > limit {
            return Err(FieldError::TooLarge);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
