//! Field validation for the two try-on uploads.
//!
//! A [`TryOnForm`] re-checks a field whenever its value changes, so callers can
//! keep the submit action disabled until both fields hold an acceptable image.

use std::{fmt, fs, path::Path};

use image::ImageFormat;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

pub const MSG_SELECT_FILE: &str = "Please select a file";
pub const MSG_TOO_LARGE: &str = "File size must be less than 10MB";
pub const MSG_BAD_TYPE: &str = "Only JPEG, PNG and WebP images are allowed";

/// An image selected by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads an image from disk. The MIME type comes from the file content,
    /// not the extension; unrecognised content gets `application/octet-stream`
    /// and is later rejected by validation.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime_type = sniff_mime_type(&bytes).to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::Bmp) => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UserImage,
    ClothingImage,
}

impl Field {
    /// Multipart part name.
    pub fn name(self) -> &'static str {
        match self {
            Field::UserImage => "userImage",
            Field::ClothingImage => "clothingImage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.name(), self.message)
    }
}

/// Checks one candidate value. Rules run in order and the first failure wins.
pub fn validate_file(candidate: Option<&ImageFile>) -> Result<(), &'static str> {
    let file = candidate.ok_or(MSG_SELECT_FILE)?;
    if file.len() > MAX_FILE_SIZE {
        return Err(MSG_TOO_LARGE);
    }
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(MSG_BAD_TYPE);
    }
    Ok(())
}

/// Two validated images, ready for upload.
#[derive(Debug, Clone)]
pub struct UploadPair {
    user_image: ImageFile,
    clothing_image: ImageFile,
}

impl UploadPair {
    pub fn new(user_image: ImageFile, clothing_image: ImageFile) -> Result<Self, Vec<FieldError>> {
        let mut form = TryOnForm::new();
        form.set(Field::UserImage, Some(user_image));
        form.set(Field::ClothingImage, Some(clothing_image));
        form.validated()
    }

    pub fn user_image(&self) -> &ImageFile {
        &self.user_image
    }

    pub fn clothing_image(&self) -> &ImageFile {
        &self.clothing_image
    }
}

#[derive(Debug, Clone, Default)]
struct FieldState {
    value: Option<ImageFile>,
    error: Option<&'static str>,
    touched: bool,
}

impl FieldState {
    fn set(&mut self, value: Option<ImageFile>) {
        self.error = validate_file(value.as_ref()).err();
        self.value = value;
        self.touched = true;
    }

    fn check(&self) -> Result<&ImageFile, &'static str> {
        validate_file(self.value.as_ref())?;
        self.value.as_ref().ok_or(MSG_SELECT_FILE)
    }
}

/// Form state for the two uploads.
#[derive(Debug, Clone, Default)]
pub struct TryOnForm {
    user_image: FieldState,
    clothing_image: FieldState,
}

impl TryOnForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::UserImage => &self.user_image,
            Field::ClothingImage => &self.clothing_image,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::UserImage => &mut self.user_image,
            Field::ClothingImage => &mut self.clothing_image,
        }
    }

    /// Replaces a field's value and re-validates it.
    pub fn set(&mut self, field: Field, value: Option<ImageFile>) {
        self.field_mut(field).set(value);
    }

    pub fn value(&self, field: Field) -> Option<&ImageFile> {
        self.field(field).value.as_ref()
    }

    /// Message for a field that has been changed and is invalid. Untouched
    /// fields report nothing even though they block submission.
    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.field(field).error
    }

    pub fn errors(&self) -> Vec<FieldError> {
        [Field::UserImage, Field::ClothingImage]
            .into_iter()
            .filter_map(|field| {
                self.error(field)
                    .map(|message| FieldError { field, message })
            })
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.user_image.check().is_ok() && self.clothing_image.check().is_ok()
    }

    /// Validates every field, untouched ones included.
    pub fn validated(&self) -> Result<UploadPair, Vec<FieldError>> {
        match (self.user_image.check(), self.clothing_image.check()) {
            (Ok(user), Ok(clothing)) => Ok(UploadPair {
                user_image: user.clone(),
                clothing_image: clothing.clone(),
            }),
            (user, clothing) => {
                let mut errors = Vec::new();
                if let Err(message) = user {
                    errors.push(FieldError {
                        field: Field::UserImage,
                        message,
                    });
                }
                if let Err(message) = clothing {
                    errors.push(FieldError {
                        field: Field::ClothingImage,
                        message,
                    });
                }
                Err(errors)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> ImageFile {
        ImageFile::new("shirt.png", "image/png", vec![0u8; len])
    }

    #[test]
    fn accepts_allowed_types_up_to_limit() {
        for mime in ALLOWED_MIME_TYPES {
            let file = ImageFile::new("a", mime, vec![1u8; 16]);
            assert_eq!(validate_file(Some(&file)), Ok(()));
        }
        assert_eq!(validate_file(Some(&png(MAX_FILE_SIZE))), Ok(()));
    }

    #[test]
    fn rejects_missing_oversized_and_wrong_type() {
        assert_eq!(validate_file(None), Err(MSG_SELECT_FILE));
        assert_eq!(validate_file(Some(&png(MAX_FILE_SIZE + 1))), Err(MSG_TOO_LARGE));
        let gif = ImageFile::new("a.gif", "image/gif", vec![1u8; 8]);
        assert_eq!(validate_file(Some(&gif)), Err(MSG_BAD_TYPE));
    }

    #[test]
    fn form_revalidates_on_every_change() {
        let mut form = TryOnForm::new();
        assert!(!form.can_submit());
        assert!(form.errors().is_empty());

        form.set(Field::UserImage, Some(png(MAX_FILE_SIZE + 1)));
        assert_eq!(form.error(Field::UserImage), Some(MSG_TOO_LARGE));

        form.set(Field::UserImage, Some(png(10)));
        assert_eq!(form.error(Field::UserImage), None);
        assert!(!form.can_submit());

        form.set(Field::ClothingImage, Some(png(10)));
        assert!(form.can_submit());

        form.set(Field::ClothingImage, None);
        assert_eq!(form.error(Field::ClothingImage), Some(MSG_SELECT_FILE));
        assert!(!form.can_submit());
    }

    #[test]
    fn validated_reports_untouched_fields() {
        let mut form = TryOnForm::new();
        form.set(Field::ClothingImage, Some(png(10)));
        let errors = form.validated().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError {
                field: Field::UserImage,
                message: MSG_SELECT_FILE
            }]
        );
    }

    #[test]
    fn reset_clears_values_and_errors() {
        let mut form = TryOnForm::new();
        form.set(Field::UserImage, Some(png(MAX_FILE_SIZE + 1)));
        form.reset();
        assert!(form.value(Field::UserImage).is_none());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn upload_pair_requires_both_valid() {
        let pair = UploadPair::new(png(4), png(8)).unwrap();
        assert_eq!(pair.user_image().len(), 4);
        assert_eq!(pair.clothing_image().len(), 8);

        let bad = ImageFile::new("a.txt", "text/plain", b"hi".to_vec());
        assert!(UploadPair::new(png(4), bad).is_err());
    }

    #[test]
    fn sniffs_mime_from_magic_bytes() {
        assert_eq!(sniff_mime_type(b"\x89PNG\r\n\x1a\n0000"), "image/png");
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), "image/jpeg");
        assert_eq!(sniff_mime_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime_type(b"hello"), "application/octet-stream");
    }
}
