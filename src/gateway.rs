use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::TryOnError,
    page,
    provider::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageGenerator,
        InlineData, Modality, Part,
    },
    validate::{Field, MAX_FILE_SIZE},
};

pub const TRYON_PATH: &str = "/api/tryon";

/// Room for two maximum-size uploads plus multipart framing.
pub const BODY_LIMIT: usize = 2 * MAX_FILE_SIZE + 1024 * 1024;

pub const TEMPERATURE: f32 = 0.3;
pub const TOP_P: f32 = 0.9;
pub const TOP_K: u32 = 20;

pub const DEFAULT_USER_MIME: &str = "image/jpeg";
pub const DEFAULT_CLOTHING_MIME: &str = "image/png";
pub const DEFAULT_RESULT_MIME: &str = "image/png";
pub const FALLBACK_DESCRIPTION: &str = "AI description not available.";

pub const TRYON_PROMPT: &str = "Perform a virtual try-on.
FIRST IMAGE: This is the base image of the person.
SECOND IMAGE: This is the clothing item to be tried on.

Instructions for the AI:
1. IMPERATIVELY use the FIRST image as the foundational canvas.
2. The person's face, hair, exact body shape, skin tone, and unique features from the FIRST image MUST REMAIN UNCHANGED.
3. The pose of the person in the FIRST image MUST NOT be altered in any way.
4. The background of the FIRST image MUST BE PRESERVED EXACTLY as it is.
5. The lighting conditions and shadows from the FIRST image MUST BE MAINTAINED precisely.
6. Take the clothing item from the SECOND image and seamlessly integrate it onto the person in the FIRST image.
7. The new clothing item should replace any existing clothing on the person, or be added if the person is bare, while ensuring the person's body proportions are not distorted.
8. The ONLY modification to the FIRST image should be the addition/replacement of the clothing item. NO other aspect of the person or environment should be generated or changed.
9. The final image should look like a photograph of the person from the FIRST image, now wearing the clothing from the SECOND image, as if it was a real photo session.
";

#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn ImageGenerator>,
}

impl AppState {
    pub fn new(generator: impl ImageGenerator + 'static) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub fn from_arc(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }
}

/// Body of a successful `/api/tryon` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnResponse {
    pub image: Option<String>,
    pub description: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route(TRYON_PATH, post(tryon))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// An image re-encoded as base64 and tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl EncodedImage {
    /// Blank MIME types are replaced by `default_mime`.
    pub fn encode(bytes: &[u8], mime_type: Option<&str>, default_mime: &str) -> Self {
        let mime_type = mime_type
            .map(str::trim)
            .filter(|mime| !mime.is_empty())
            .unwrap_or(default_mime)
            .to_string();

        Self {
            mime_type,
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    fn into_part(self) -> Part {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: self.mime_type,
                data: self.data,
            },
        }
    }
}

pub fn build_request(user: EncodedImage, clothing: EncodedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(TRYON_PROMPT), user.into_part(), clothing.into_part()],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            response_modalities: vec![Modality::Text, Modality::Image],
        },
    }
}

pub fn data_uri(mime_type: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime_type, data)
}

/// Turns a provider response into the client-facing shape.
///
/// Only the first candidate is read. Every part is visited and the last image
/// and last non-empty text win.
pub fn decode_response(response: &GenerateContentResponse) -> Result<TryOnResponse, TryOnError> {
    let Some(candidate) = response.candidates.first() else {
        tracing::warn!("No candidates found in the API response.");
        if let Some(reason) = response.block_reason() {
            tracing::error!("Content generation blocked: {}", reason);
            return Err(TryOnError::Blocked(reason.to_string()));
        }
        tracing::error!("Unexpected API response structure");
        tracing::debug!(
            "Raw API response: {}",
            serde_json::to_string_pretty(response).unwrap_or_default()
        );
        return Err(TryOnError::EmptyResponse);
    };

    let parts = candidate
        .content
        .as_ref()
        .map(|content| content.parts.as_slice())
        .unwrap_or_default();

    if parts.is_empty() {
        tracing::warn!("No parts found in the response candidate.");
    } else {
        tracing::info!("Number of parts in response: {}", parts.len());
    }

    let (image, text) = parts
        .iter()
        .fold((None::<&InlineData>, None::<&str>), |(image, text), part| match part {
            Part::InlineData { inline_data } => {
                tracing::info!(
                    "Image data received, length: {}, MIME type: {}",
                    inline_data.data.len(),
                    inline_data.mime_type
                );
                (Some(inline_data), text)
            }
            Part::Text { text: segment } if !segment.is_empty() => {
                let preview: String = segment.chars().take(100).collect();
                tracing::info!("Text response received: {}", preview);
                (image, Some(segment.as_str()))
            }
            Part::Text { .. } => (image, text),
            Part::Other(value) => {
                tracing::warn!("Ignoring unsupported response part: {}", value);
                (image, text)
            }
        });

    let image = image.filter(|inline| !inline.data.is_empty()).map(|inline| {
        let mime_type = if inline.mime_type.is_empty() {
            DEFAULT_RESULT_MIME
        } else {
            inline.mime_type.as_str()
        };
        data_uri(mime_type, &inline.data)
    });

    Ok(TryOnResponse {
        image,
        description: text.unwrap_or(FALLBACK_DESCRIPTION).to_string(),
    })
}

struct Upload {
    mime_type: Option<String>,
    bytes: Bytes,
}

#[derive(Default)]
struct Uploads {
    user_image: Option<Upload>,
    clothing_image: Option<Upload>,
}

/// Collects the two named file parts. Parts without a filename are plain form
/// values and never count as uploads. A repeated name keeps its first file.
async fn read_uploads(mut multipart: Multipart) -> Result<Uploads, TryOnError> {
    let mut uploads = Uploads::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TryOnError::MalformedBody(e.body_text()))?
    {
        let slot = match field.name() {
            Some(name) if name == Field::UserImage.name() => &mut uploads.user_image,
            Some(name) if name == Field::ClothingImage.name() => &mut uploads.clothing_image,
            other => {
                tracing::debug!("Skipping multipart field {:?}", other);
                continue;
            }
        };
        if slot.is_some() {
            continue;
        }
        if field.file_name().is_none() {
            tracing::warn!("Ignoring non-file multipart field {:?}", field.name());
            continue;
        }

        let mime_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| TryOnError::MalformedBody(e.body_text()))?;
        *slot = Some(Upload { mime_type, bytes });
    }

    Ok(uploads)
}

pub async fn tryon(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TryOnResponse>, TryOnError> {
    let multipart = multipart.map_err(|e| TryOnError::MalformedBody(e.body_text()))?;
    let uploads = read_uploads(multipart).await?;

    let (Some(user), Some(clothing)) = (uploads.user_image, uploads.clothing_image) else {
        return Err(TryOnError::MissingImages);
    };

    let user = EncodedImage::encode(&user.bytes, user.mime_type.as_deref(), DEFAULT_USER_MIME);
    let clothing = EncodedImage::encode(
        &clothing.bytes,
        clothing.mime_type.as_deref(),
        DEFAULT_CLOTHING_MIME,
    );
    tracing::info!("User image: {}, size: {}", user.mime_type, user.data.len());
    tracing::info!(
        "Clothing image: {}, size: {}",
        clothing.mime_type,
        clothing.data.len()
    );

    let request = build_request(user, clothing);

    let response = state
        .generator
        .generate_content(&request)
        .await
        .map_err(|e| TryOnError::Provider(format!("{:#}", e)))?;

    decode_response(&response).map(Json)
}
