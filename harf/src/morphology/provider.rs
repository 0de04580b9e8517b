use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{MorphologyBackendKind, MorphologyConfig};

use super::api::RemoteMorphologyClient;
use super::cache::CachedSuggester;
use super::lexicon::LexiconAnalyzer;
use super::{MorphologyAnalyzer, SpellSuggester};

/// The correction engine the service was started with.
///
/// Built once at startup and shared read-only across requests. When the
/// backend fails to come up the provider is still constructed, with no
/// analyzer, so requests fall back to the static correction table.
#[derive(Clone)]
pub struct MorphologyProvider {
    analyzer: Option<Arc<dyn MorphologyAnalyzer>>,
    suggester: Option<Arc<dyn SpellSuggester>>,
    backend: MorphologyBackendKind,
    archive_path: PathBuf,
    unavailable_reason: Option<String>,
}

impl MorphologyProvider {
    pub fn new(config: &MorphologyConfig) -> Self {
        let provider = match config.backend {
            MorphologyBackendKind::Local => {
                match LexiconAnalyzer::load(&config.archive_path, config.max_suggestions) {
                    Ok(engine) => {
                        info!(
                            archive = %config.archive_path.display(),
                            entries = engine.entries(),
                            "Lexicon morphology engine initialized"
                        );
                        let engine = Arc::new(engine);
                        Self::with_engine(config, engine.clone(), engine)
                    }
                    Err(e) => Self::failed(
                        config,
                        format!("Lexicon engine unavailable: {e}"),
                    ),
                }
            }
            MorphologyBackendKind::Api => match RemoteMorphologyClient::new(config) {
                Ok(client) => {
                    info!(base_url = %client.base_url(), "Remote morphology engine initialized");
                    let client = Arc::new(client);
                    Self::with_engine(config, client.clone(), client)
                }
                Err(e) => Self::failed(
                    config,
                    format!("Remote morphology engine unavailable: {e}"),
                ),
            },
            MorphologyBackendKind::None => {
                Self::failed(config, "Morphology engine disabled".to_string())
            }
        };

        if !provider.has_spell_checker() && provider.has_morphology() {
            info!("Spell checker disabled, using morphology only");
        }

        provider
    }

    fn with_engine(
        config: &MorphologyConfig,
        analyzer: Arc<dyn MorphologyAnalyzer>,
        suggester: Arc<dyn SpellSuggester>,
    ) -> Self {
        let suggester = config.spell_checker_enabled.then(|| {
            match NonZeroUsize::new(config.cache_size) {
                Some(capacity) => {
                    Arc::new(CachedSuggester::new(suggester, capacity)) as Arc<dyn SpellSuggester>
                }
                None => suggester,
            }
        });

        Self {
            analyzer: Some(analyzer),
            suggester,
            backend: config.backend,
            archive_path: config.archive_path.clone(),
            unavailable_reason: None,
        }
    }

    fn failed(config: &MorphologyConfig, reason: String) -> Self {
        warn!("{}", reason);
        Self {
            analyzer: None,
            suggester: None,
            backend: config.backend,
            archive_path: config.archive_path.clone(),
            unavailable_reason: Some(reason),
        }
    }

    /// Builds a provider around caller-supplied engines.
    pub fn from_parts(
        analyzer: Option<Arc<dyn MorphologyAnalyzer>>,
        suggester: Option<Arc<dyn SpellSuggester>>,
    ) -> Self {
        let unavailable_reason = analyzer
            .is_none()
            .then(|| "No morphology analyzer supplied".to_string());
        Self {
            analyzer,
            suggester,
            backend: MorphologyBackendKind::Local,
            archive_path: PathBuf::new(),
            unavailable_reason,
        }
    }

    pub fn disabled() -> Self {
        Self::from_parts(None, None)
    }

    pub fn analyzer(&self) -> Option<&Arc<dyn MorphologyAnalyzer>> {
        self.analyzer.as_ref()
    }

    pub fn suggester(&self) -> Option<&Arc<dyn SpellSuggester>> {
        self.suggester.as_ref()
    }

    /// Whether the engine backend came up (the lexicon loaded or the remote
    /// client was built).
    pub fn is_started(&self) -> bool {
        self.unavailable_reason.is_none()
    }

    pub fn has_morphology(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn has_spell_checker(&self) -> bool {
        self.suggester.is_some()
    }

    pub fn backend(&self) -> MorphologyBackendKind {
        self.backend
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lexicon_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kitap").unwrap();
        writeln!(file, "okul").unwrap();
        file
    }

    fn local_config(path: &Path) -> MorphologyConfig {
        MorphologyConfig {
            archive_path: path.to_path_buf(),
            ..MorphologyConfig::default()
        }
    }

    #[tokio::test]
    async fn test_local_backend_loads_lexicon() {
        let file = lexicon_file();
        let provider = MorphologyProvider::new(&local_config(file.path()));

        assert!(provider.is_started());
        assert!(provider.has_morphology());
        assert!(provider.has_spell_checker());
        assert_eq!(provider.archive_path(), file.path());

        let analyzer = provider.analyzer().unwrap();
        assert!(!analyzer.analyze("kitap").await.unwrap().is_empty());
    }

    #[test]
    fn test_spell_checker_can_be_disabled() {
        let file = lexicon_file();
        let config = MorphologyConfig {
            spell_checker_enabled: false,
            ..local_config(file.path())
        };
        let provider = MorphologyProvider::new(&config);

        assert!(provider.has_morphology());
        assert!(!provider.has_spell_checker());
    }

    #[test]
    fn test_corrupt_archive_degrades_to_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Zip magic followed by garbage
        file.write_all(&[0x50, 0x4B, 0x03, 0x04, 0xFF, 0xFF]).unwrap();

        let provider = MorphologyProvider::new(&local_config(file.path()));
        assert!(!provider.is_started());
        assert!(!provider.has_morphology());
        assert!(provider.unavailable_reason().is_some());
    }

    #[test]
    fn test_none_backend_is_unavailable() {
        let config = MorphologyConfig {
            backend: MorphologyBackendKind::None,
            ..MorphologyConfig::default()
        };
        let provider = MorphologyProvider::new(&config);
        assert!(!provider.is_started());
        assert!(!provider.has_spell_checker());
    }

    #[test]
    fn test_api_backend_builds_client() {
        let config = MorphologyConfig {
            backend: MorphologyBackendKind::Api,
            base_url: Some("http://localhost:4567".into()),
            ..MorphologyConfig::default()
        };
        let provider = MorphologyProvider::new(&config);
        assert!(provider.is_started());
        assert!(provider.has_morphology());
        assert_eq!(provider.backend(), MorphologyBackendKind::Api);
    }

    #[test]
    fn test_disabled_provider() {
        let provider = MorphologyProvider::disabled();
        assert!(!provider.is_started());
        assert!(provider.analyzer().is_none());
    }
}
