#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use virtual_tryon::provider::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, ImageGenerator, Part,
    PromptFeedback,
};

pub enum Reply {
    Respond(GenerateContentResponse),
    Fail(String),
}

/// Records every request and answers with a canned reply.
#[derive(Clone)]
pub struct MockGenerator {
    reply: Arc<Reply>,
    calls: Arc<Mutex<Vec<GenerateContentRequest>>>,
}

impl MockGenerator {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply: Arc::new(reply),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self::new(Reply::Respond(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".into()),
                    parts,
                }),
                finish_reason: Some("STOP".into()),
            }],
            prompt_feedback: None,
        }))
    }

    pub fn blocked(reason: &str) -> Self {
        Self::new(Reply::Respond(GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some(reason.into()),
            }),
        }))
    }

    pub fn calls(&self) -> Vec<GenerateContentRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Decoded inline images of the only recorded call, in order.
    pub fn sent_images(&self) -> Vec<(String, Vec<u8>)> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one provider call");
        calls[0].contents[0]
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::InlineData { inline_data } => Some((
                    inline_data.mime_type.clone(),
                    general_purpose::STANDARD.decode(&inline_data.data).unwrap(),
                )),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ImageGenerator for MockGenerator {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        self.calls.lock().unwrap().push(request.clone());
        match self.reply.as_ref() {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::Fail(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

pub const BOUNDARY: &str = "tryon-test-boundary";

/// Builds a multipart/form-data body. Returns the content type and the body.
pub fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, mime, bytes) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}.bin\"\r\n",
                name, name
            )
            .as_bytes(),
        );
        if let Some(mime) = mime {
            body.extend_from_slice(format!("Content-Type: {}\r\n", mime).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Builds a multipart/form-data body of plain form values, without filenames.
pub fn text_fields_body(fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body.into_bytes(),
    )
}

/// Deterministic bytes covering the full byte range.
pub fn sample_bytes(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}
