use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{
    error::ClientError,
    gateway::TRYON_PATH,
    validate::{Field, ImageFile, TryOnForm, UploadPair},
};

/// Any body the endpoint may answer with, success or failure.
#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Uploads an image pair to a running try-on server.
#[derive(Clone)]
pub struct TryOnClient {
    http: reqwest::Client,
    base_url: String,
}

impl TryOnClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, TRYON_PATH)
    }

    /// Validates the form, then uploads. Nothing is sent for an invalid form.
    pub async fn submit(&self, form: &TryOnForm) -> Result<String, ClientError> {
        let pair = form.validated().map_err(ClientError::Invalid)?;
        self.get_image(&pair).await
    }

    /// Posts both images and returns the generated image as a data URI.
    ///
    /// A success response without an image is an error.
    pub async fn get_image(&self, pair: &UploadPair) -> Result<String, ClientError> {
        let form = Form::new()
            .part(Field::UserImage.name(), file_part(pair.user_image())?)
            .part(Field::ClothingImage.name(), file_part(pair.clothing_image())?);

        let response = self.http.post(self.endpoint()).multipart(form).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let result: ApiResponse = serde_json::from_str(&text).unwrap_or_default();
            let message = result.error.unwrap_or_else(|| {
                format!(
                    "API Error: {}",
                    status.canonical_reason().unwrap_or_else(|| status.as_str())
                )
            });
            tracing::error!("Try-on request failed with {}: {}", status, message);
            return Err(ClientError::Api {
                message,
                status: status.as_u16(),
            });
        }

        let result: ApiResponse = serde_json::from_str(&text)?;

        match result.image {
            Some(image) if !image.is_empty() => Ok(image),
            _ => {
                tracing::warn!(
                    "API response description: {}",
                    result.description.as_deref().unwrap_or_default()
                );
                Err(ClientError::MissingImage)
            }
        }
    }
}

fn file_part(file: &ImageFile) -> Result<Part, ClientError> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = TryOnClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.endpoint(), "http://127.0.0.1:3000/api/tryon");
    }

    #[tokio::test]
    async fn invalid_form_fails_before_any_request() {
        // Nothing listens on this port; reaching the network would be a
        // transport error rather than a validation error.
        let client = TryOnClient::new("http://127.0.0.1:9");
        let mut form = TryOnForm::new();
        form.set(
            Field::UserImage,
            Some(ImageFile::new("a.gif", "image/gif", vec![1u8; 4])),
        );

        let err = client.submit(&form).await.unwrap_err();
        match err {
            ClientError::Invalid(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
