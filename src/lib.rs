pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod page;
pub mod provider;
pub mod validate;

pub use client::TryOnClient;
pub use config::{Config, GeminiConfig};
pub use error::{ClientError, TryOnError};
pub use gateway::{router, AppState, TryOnResponse};
pub use provider::{GeminiClient, ImageGenerator};
pub use validate::{ImageFile, TryOnForm, UploadPair};
