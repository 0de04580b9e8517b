//! OCR (Optical Character Recognition) Module
//!
//! Sends an image to a remote vision-language model together with a fixed
//! Turkish transcription prompt and returns the raw text.
//!
//! # Configuration
//!
//! Controlled via `OcrConfig` (see `config.rs`):
//! - `model`: `<provider>/<model>`, e.g. `gemini/gemini-2.0-flash-exp` or `openai/gpt-4o`
//! - `api_key`: credential for the provider
//! - `base_url`: custom endpoint for proxies or tests
//! - `timeout_secs`: overall deadline per image, retries included
//! - `max_retries`: attempts on 429/5xx/transport errors
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let text = ocr.ocr(image_bytes).await?;
//! ```

mod api;
mod provider;

pub use api::{detect_mime, OCR_PROMPT};
pub use provider::OcrProvider;
