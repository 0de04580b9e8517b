use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{HarfError, Result};

use super::turkish::{self, CasePattern};
use super::{MorphologyAnalyzer, SpellSuggester, WordAnalysis};

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const DICTIONARY_EXTENSION: &str = ".dict";

/// Shortest stem accepted when stripping suffixes.
const MIN_STEM_CHARS: usize = 2;
const MAX_SUFFIXES: usize = 4;
const VOWELS: &str = "aeıioöuü";

/// Surface forms of common inflectional and derivational suffixes, covering
/// both vowel-harmony variants and the buffer consonants.
const SUFFIXES: &[&str] = &[
    // plural
    "lar", "ler",
    // accusative, genitive, dative
    "ı", "i", "u", "ü", "yı", "yi", "yu", "yü", "nı", "ni", "nu", "nü",
    "ın", "in", "un", "ün", "nın", "nin", "nun", "nün",
    "a", "e", "ya", "ye", "na", "ne",
    // locative, ablative
    "da", "de", "ta", "te", "nda", "nde",
    "dan", "den", "tan", "ten", "ndan", "nden",
    // instrumental
    "la", "le", "yla", "yle",
    // possessive
    "m", "ım", "im", "um", "üm", "n", "sı", "si", "su", "sü",
    "mız", "miz", "muz", "müz", "ımız", "imiz", "umuz", "ümüz",
    "nız", "niz", "nuz", "nüz", "ınız", "iniz", "unuz", "ünüz",
    // past, evidential, progressive, future, aorist
    "dı", "di", "du", "dü", "tı", "ti", "tu", "tü",
    "mış", "miş", "muş", "müş",
    "yor", "ıyor", "iyor", "uyor", "üyor",
    "acak", "ecek", "yacak", "yecek", "acağ", "eceğ", "yacağ", "yeceğ",
    "r", "ar", "er", "ır", "ir", "ur", "ür",
    // negation, infinitive, person
    "ma", "me", "mak", "mek", "k", "z", "sın", "sin", "sun", "sün",
    // copula
    "dır", "dir", "dur", "dür", "tır", "tir", "tur", "tür",
    // derivation
    "ki", "ca", "ce", "ça", "çe", "lı", "li", "lu", "lü",
    "lık", "lik", "luk", "lük", "sız", "siz", "suz", "süz",
];

/// In-memory word list keyed by the Turkish-lowercased surface form.
///
/// Lines follow the Zemberek text dictionary layout:
///
/// ```text
/// ## comment
/// kitap
/// ağaç [P:Noun]
/// gitmek [A:Aorist_A]
/// ```
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<String>>,
    by_length: HashMap<usize, Vec<String>>,
    /// Verb stem to infinitive, e.g. `git` to `gitmek`.
    verb_stems: HashMap<String, String>,
}

impl Lexicon {
    /// Loads a lexicon from a `.jar`/`.zip` archive (every `*.dict` entry) or
    /// from a plain text word list.
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut magic = [0u8; 4];
        let is_archive = match file.read_exact(&mut magic) {
            Ok(()) => magic == ZIP_MAGIC,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(e.into()),
        };
        file.seek(SeekFrom::Start(0))?;

        let mut lexicon = Self::default();
        if is_archive {
            lexicon.load_archive(file)?;
        } else {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            lexicon.extend_from_text(&String::from_utf8_lossy(&bytes));
        }

        if lexicon.is_empty() {
            return Err(HarfError::Morphology(format!(
                "No dictionary entries found in {}",
                path.display()
            )));
        }

        lexicon.finish();
        info!(
            path = %path.display(),
            entries = lexicon.len(),
            "Lexicon loaded"
        );
        Ok(lexicon)
    }

    fn load_archive(&mut self, file: File) -> Result<()> {
        let mut archive = zip::ZipArchive::new(file)?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if !entry.is_file() || !entry.name().ends_with(DICTIONARY_EXTENSION) {
                continue;
            }

            let name = entry.name().to_string();
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                warn!(entry = %name, error = %e, "Skipping unreadable dictionary entry");
                continue;
            }

            let before = self.entries.len();
            self.extend_from_text(&String::from_utf8_lossy(&bytes));
            debug!(
                entry = %name,
                added = self.entries.len() - before,
                "Read dictionary entry"
            );
        }

        Ok(())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();
        for word in words {
            lexicon.insert_line(word.as_ref());
        }
        lexicon.finish();
        lexicon
    }

    fn extend_from_text(&mut self, text: &str) {
        for line in text.lines() {
            self.insert_line(line);
        }
    }

    fn insert_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with("##") {
            return;
        }

        let (word, attributes) = match line.split_once('[') {
            Some((word, rest)) => {
                let attributes = rest
                    .trim_end_matches(']')
                    .split(';')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(String::from)
                    .collect();
                (word.trim(), attributes)
            }
            None => (line, Vec::new()),
        };

        // Multi-word entries can never match a single token.
        if word.is_empty() || word.contains(char::is_whitespace) {
            return;
        }

        let key = turkish::to_lower(word);
        let slot = self.entries.entry(key).or_default();
        for attribute in attributes {
            if !slot.contains(&attribute) {
                slot.push(attribute);
            }
        }
    }

    fn finish(&mut self) {
        self.by_length.clear();
        for word in self.entries.keys() {
            self.by_length
                .entry(word.chars().count())
                .or_default()
                .push(word.clone());
        }
        for bucket in self.by_length.values_mut() {
            bucket.sort();
        }

        self.verb_stems.clear();
        for word in self.entries.keys() {
            let Some(stem) = word
                .strip_suffix("mak")
                .or_else(|| word.strip_suffix("mek"))
            else {
                continue;
            };
            if stem.chars().count() >= MIN_STEM_CHARS {
                self.verb_stems
                    .entry(stem.to_string())
                    .or_insert_with(|| word.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, word: &str) -> Option<(&str, &[String])> {
        self.entries
            .get_key_value(&turkish::to_lower(word))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Recognizes `word` either as an entry or as an entry followed by a chain
    /// of known suffixes. The longest matching stem wins; an inflected
    /// reading carries the stripped suffix as a `+suffix` attribute.
    pub fn analyze(&self, word: &str) -> Option<WordAnalysis> {
        if let Some((lemma, attributes)) = self.lookup(word) {
            return Some(WordAnalysis {
                lemma: lemma.to_string(),
                attributes: attributes.to_vec(),
            });
        }

        let lower = turkish::to_lower(word);
        let boundaries: Vec<usize> = lower
            .char_indices()
            .map(|(i, _)| i)
            .skip(MIN_STEM_CHARS)
            .collect();

        for &split in boundaries.iter().rev() {
            let (prefix, suffix) = lower.split_at(split);
            if !is_suffix_chain(suffix) {
                continue;
            }
            let found = self
                .stem(prefix)
                .or_else(|| soften(prefix, suffix).and_then(|s| self.stem(&s)));
            if let Some((lemma, attributes)) = found {
                let mut attributes = attributes.to_vec();
                attributes.push(format!("+{suffix}"));
                return Some(WordAnalysis {
                    lemma: lemma.to_string(),
                    attributes,
                });
            }
        }

        None
    }

    fn stem(&self, stem: &str) -> Option<(&str, &[String])> {
        if let Some((lemma, attributes)) = self.entries.get_key_value(stem) {
            return Some((lemma.as_str(), attributes.as_slice()));
        }
        let infinitive = self.verb_stems.get(stem)?;
        self.entries
            .get_key_value(infinitive)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Words within the allowed edit distance of `word`, best first.
    pub fn nearest(&self, word: &str, limit: usize) -> Vec<String> {
        let query: Vec<char> = turkish::to_lower(word).chars().collect();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let max_distance = max_edit_distance(query.len());
        let min_len = query.len().saturating_sub(max_distance).max(1);
        let max_len = query.len() + max_distance;

        let mut scored: Vec<(usize, usize, &str)> = Vec::new();
        for len in min_len..=max_len {
            let Some(bucket) = self.by_length.get(&len) else {
                continue;
            };
            for candidate in bucket {
                let chars: Vec<char> = candidate.chars().collect();
                if let Some(distance) = bounded_levenshtein(&query, &chars, max_distance) {
                    if distance > 0 {
                        scored.push((distance, len.abs_diff(query.len()), candidate));
                    }
                }
            }
        }

        scored.sort();
        scored
            .into_iter()
            .take(limit)
            .map(|(_, _, w)| w.to_string())
            .collect()
    }
}

/// Final `p ç t k` of a stem turn into `b c d ğ` before a vowel, so the
/// surface prefix is hardened back before lookup.
fn soften(prefix: &str, suffix: &str) -> Option<String> {
    if !suffix.starts_with(|c: char| VOWELS.contains(c)) {
        return None;
    }
    let last = prefix.chars().last()?;
    let hard = match last {
        'b' => 'p',
        'c' => 'ç',
        'd' => 't',
        'ğ' => 'k',
        _ => return None,
    };
    let mut stem = prefix[..prefix.len() - last.len_utf8()].to_string();
    stem.push(hard);
    Some(stem)
}

/// Whether `rest` splits into at most [`MAX_SUFFIXES`] entries of [`SUFFIXES`].
fn is_suffix_chain(rest: &str) -> bool {
    fn split(rest: &str, depth: usize) -> bool {
        if rest.is_empty() {
            return true;
        }
        depth < MAX_SUFFIXES
            && SUFFIXES
                .iter()
                .filter_map(|s| rest.strip_prefix(s))
                .any(|tail| split(tail, depth + 1))
    }
    !rest.is_empty() && split(rest, 0)
}

fn max_edit_distance(len: usize) -> usize {
    if len <= 4 {
        1
    } else {
        2
    }
}

/// Levenshtein distance, or `None` once it is certain to exceed `max`.
fn bounded_levenshtein(a: &[char], b: &[char], max: usize) -> Option<usize> {
    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        let mut row_min = current[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j] + cost)
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
            row_min = row_min.min(current[j + 1]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let distance = previous[b.len()];
    (distance <= max).then_some(distance)
}

/// Local engine: recognition by lexicon membership (bare or suffixed),
/// suggestions by edit
/// distance over the same lexicon.
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    lexicon: Arc<Lexicon>,
    max_suggestions: usize,
}

impl LexiconAnalyzer {
    pub fn new(lexicon: Lexicon, max_suggestions: usize) -> Self {
        Self {
            lexicon: Arc::new(lexicon),
            max_suggestions,
        }
    }

    pub fn load(path: &Path, max_suggestions: usize) -> Result<Self> {
        Ok(Self::new(Lexicon::load(path)?, max_suggestions))
    }

    pub fn entries(&self) -> usize {
        self.lexicon.len()
    }
}

#[async_trait]
impl MorphologyAnalyzer for LexiconAnalyzer {
    async fn analyze(&self, word: &str) -> Result<Vec<WordAnalysis>> {
        Ok(self.lexicon.analyze(word).into_iter().collect())
    }
}

#[async_trait]
impl SpellSuggester for LexiconAnalyzer {
    async fn suggest(&self, word: &str) -> Result<Vec<String>> {
        let lexicon = Arc::clone(&self.lexicon);
        let limit = self.max_suggestions;
        let query = word.to_string();

        let candidates = tokio::task::spawn_blocking(move || lexicon.nearest(&query, limit))
            .await
            .map_err(|e| HarfError::Morphology(format!("Suggestion task panicked: {e}")))?;

        let pattern = CasePattern::of(word);
        Ok(candidates.iter().map(|c| pattern.apply(c)).collect())
    }
}
