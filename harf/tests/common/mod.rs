// Common test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde_json::json;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use harf::config::{Config, MorphologyBackendKind};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Writes a Zemberek-style `.jar` holding the given `(entry name, contents)`
/// pairs and returns its path.
pub fn write_lexicon_archive(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    let path = dir.join("zemberek-full.jar");
    let file = std::fs::File::create(&path).expect("Failed to create archive");
    let mut zip = zip::ZipWriter::new(file);
    let options: FileOptions<zip::write::ExtendedFileOptions> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in entries {
        zip.start_file(*name, options.clone()).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();

    path
}

pub const MASTER_DICTIONARY: &str = "\
## Turkish master dictionary (test subset)
bir
bu
kitap [P:Noun]
okul [P:Noun]
güzel [P:Adj]
bugün [P:Adv]
hava [P:Noun]
gitmek [A:Aorist_A]
";

/// Mock Gemini endpoint answering every `generateContent` call with `text`.
pub async fn gemini_server(text: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/[^/]+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })))
        .mount(&server)
        .await;
    server
}

/// Service configuration pointing OCR at `ocr_base_url` with the given
/// morphology backend. Environment variables are not consulted for the
/// fields set here.
pub fn test_config(ocr_base_url: &str, backend: MorphologyBackendKind) -> Config {
    let mut config = Config::default();
    config.ocr.model = "gemini/gemini-test".to_string();
    config.ocr.api_key = Some("test-key".to_string());
    config.ocr.base_url = Some(ocr_base_url.to_string());
    config.ocr.timeout_secs = 5;
    config.ocr.max_retries = 2;
    config.morphology.backend = backend;
    config.morphology.base_url = None;
    config.morphology.timeout_secs = 2;
    config.morphology.spell_checker_enabled = true;
    config.morphology.max_suggestions = 5;
    config.morphology.cache_size = 16;
    config
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use tempfile;
pub use wiremock;
