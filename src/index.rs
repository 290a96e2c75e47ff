use crate::error::{Result, VersegrepError};
use crate::verse::VerseRef;
use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

lazy_static! {
    // Strong's / morphology markers as they appear in indexed text.
    static ref STRONGS_REGX: Regex = Regex::new(r"\s*<([GH]\d+)>").unwrap();
    static ref MORPH_REGX: Regex = Regex::new(r"\s*\{([\w-]+)\}").unwrap();
    static ref NOTES_REGX: Regex = Regex::new(r"(?s)\s?<n>\s?(.*?)\s?</n>").unwrap();
    static ref TAGS_REGX: Regex = Regex::new(r"</?[pin]>").unwrap();
    static ref NON_ALNUM_REGX: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Inverted index over one bible module.
///
/// The postings map holds words, Strong's numbers, and morphological tags
/// all keyed the way they were indexed; the verse map keeps the raw
/// marked-up text so display never has to go back to the module file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BibleIndex {
    module: String,
    verses: HashMap<String, String>,
    postings: HashMap<String, Vec<String>>,
    lower_case: HashMap<String, Vec<String>>,
    words: Vec<String>,
}

impl BibleIndex {
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Index file location for a module inside the data directory.
    pub fn index_path(data_dir: &Path, module: &str) -> PathBuf {
        data_dir.join(format!("{module}_index.json"))
    }

    pub fn load(data_dir: &Path, module: &str) -> Result<Self> {
        let path = Self::index_path(data_dir, module);
        if !path.exists() {
            return Err(VersegrepError::NoIndex {
                module: module.to_string(),
                path,
            });
        }
        debug!("Loading index from {}", path.display());
        let content = fs::read_to_string(&path)?;
        let index: BibleIndex = serde_json::from_str(&content)?;
        Ok(index)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let path = Self::index_path(data_dir, &self.module);
        info!("Writing index to {}", path.display());
        fs::write(&path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Raw marked-up text of one verse, if indexed.
    pub fn verse_text(&self, verse: &VerseRef) -> Option<&str> {
        self.verses.get(&verse.to_string()).map(String::as_str)
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    /// All indexed word keys, for partial-word expansion.
    pub fn word_keys(&self) -> &[String] {
        &self.words
    }

    fn postings(&self, key: &str) -> &[String] {
        self.postings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// References for a key, folding case variants together unless the
    /// search is case sensitive.  Strong's/morphology bracketing is not
    /// part of the key.
    fn key_refs(&self, key: &str, case_sensitive: bool) -> HashSet<&str> {
        let cleaned = key.replace(['<', '>', '{', '}'], "");
        let key = cleaned.trim();
        let mut refs: HashSet<&str> = self.postings(key).iter().map(String::as_str).collect();
        if !case_sensitive {
            let lower = key.to_lowercase();
            refs.extend(self.postings(&lower).iter().map(String::as_str));
            for cased in self.lower_case.get(&lower).map(Vec::as_slice).unwrap_or(&[]) {
                refs.extend(self.postings(cased).iter().map(String::as_str));
            }
        }
        refs
    }

    /// Verses containing every key in the list.
    pub fn value_intersect(&self, keys: &[&str], case_sensitive: bool) -> HashSet<VerseRef> {
        let mut result: Option<HashSet<&str>> = None;
        for key in keys {
            let refs = self.key_refs(key, case_sensitive);
            result = Some(match result {
                None => refs,
                Some(acc) => acc.intersection(&refs).copied().collect(),
            });
        }
        to_verse_set(result.unwrap_or_default())
    }

    /// Verses containing one or more of the keys.
    pub fn value_union(&self, keys: &[&str], case_sensitive: bool) -> HashSet<VerseRef> {
        let mut refs: HashSet<&str> = HashSet::new();
        for key in keys {
            refs.extend(self.key_refs(key, case_sensitive));
        }
        to_verse_set(refs)
    }

    /// Verses containing one and only one of the keys (symmetric
    /// difference across all postings).
    pub fn value_sym_diff(&self, keys: &[&str], case_sensitive: bool) -> HashSet<VerseRef> {
        let mut refs: HashSet<&str> = HashSet::new();
        for key in keys {
            refs = refs
                .symmetric_difference(&self.key_refs(key, case_sensitive))
                .copied()
                .collect();
        }
        to_verse_set(refs)
    }

    /// Verses containing any word matching the `*`-wildcard partials.
    /// Words more common than `common_limit` are skipped.
    pub fn from_partial(
        &self,
        partials: &[&str],
        case_sensitive: bool,
        common_limit: usize,
    ) -> Result<HashSet<VerseRef>> {
        let mut refs: HashSet<&str> = HashSet::new();
        let flags = if case_sensitive { "" } else { "(?i)" };

        for partial in partials {
            let reg_str = format!("{}^{}$", flags, partial.replace('*', r"\w*"));
            let word_regx = Regex::new(&reg_str)?;
            for word in &self.words {
                if word_regx.is_match(word) {
                    let posting = self.postings(word);
                    if posting.len() < common_limit {
                        refs.extend(posting.iter().map(String::as_str));
                    }
                }
            }
        }
        Ok(to_verse_set(refs))
    }
}

fn to_verse_set(refs: HashSet<&str>) -> HashSet<VerseRef> {
    refs.iter()
        .filter_map(|reference| VerseRef::from_str(reference).ok())
        .collect()
}

/// Builds a [`BibleIndex`] from (reference, marked-up text) pairs.
pub struct IndexBuilder {
    index: BibleIndex,
    words_set: HashSet<String>,
}

impl IndexBuilder {
    pub fn new(module: &str) -> Self {
        IndexBuilder {
            index: BibleIndex {
                module: module.to_string(),
                ..Default::default()
            },
            words_set: HashSet::new(),
        }
    }

    /// Index verses from an iterator, showing build progress.
    pub fn build<I>(mut self, verses: I, total: u64) -> BibleIndex
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let pb = ProgressBar::new(total).with_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        for (verse_ref, verse_text) in verses {
            pb.set_message(verse_ref.clone());
            self.index_verse(&verse_ref, &verse_text);
            pb.inc(1);
        }
        pb.finish_with_message("Done");

        let mut words: Vec<String> = self.words_set.into_iter().collect();
        words.sort();
        self.index.words = words;
        self.index
    }

    fn index_verse(&mut self, verse_ref: &str, verse_text: &str) {
        // Keep the full marked-up text so display can pull it back out.
        self.index
            .verses
            .insert(verse_ref.to_string(), verse_text.to_string());

        // Notes are not searched, and layout tags would split words.
        let verse_text = NOTES_REGX.replace_all(verse_text, "");
        let verse_text = TAGS_REGX.replace_all(&verse_text, "");

        self.index_strongs(verse_ref, &verse_text);
        self.index_morph(verse_ref, &verse_text);
        self.index_words(verse_ref, &verse_text);
    }

    fn index_strongs(&mut self, verse_ref: &str, verse_text: &str) {
        let nums: HashSet<&str> = STRONGS_REGX
            .captures_iter(verse_text)
            .map(|caps| caps.get(1).unwrap().as_str())
            .collect();
        for num in nums {
            self.push_posting(num, verse_ref);
        }
    }

    fn index_morph(&mut self, verse_ref: &str, verse_text: &str) {
        let tags: HashSet<&str> = MORPH_REGX
            .captures_iter(verse_text)
            .map(|caps| caps.get(1).unwrap().as_str())
            .collect();
        for tag in tags {
            self.push_posting(tag, verse_ref);
        }
    }

    fn index_words(&mut self, verse_ref: &str, verse_text: &str) {
        let clean_text = STRONGS_REGX.replace_all(verse_text, "");
        let clean_text = MORPH_REGX.replace_all(&clean_text, "");
        let clean_text = NON_ALNUM_REGX.replace_all(&clean_text, " ");

        let word_set: HashSet<&str> = clean_text.split_whitespace().collect();
        let words: Vec<String> = word_set.iter().map(|w| w.to_string()).collect();

        for word in words {
            self.push_posting(&word, verse_ref);
            let lower = word.to_lowercase();
            if lower != word {
                // Map the lowercase form to its cased spellings so case
                // insensitive searches can reach them.
                let variants = self.index.lower_case.entry(lower).or_default();
                if !variants.contains(&word) {
                    variants.push(word.clone());
                }
            }
            self.words_set.insert(word);
        }
    }

    fn push_posting(&mut self, key: &str, verse_ref: &str) {
        let posting = self.index.postings.entry(key.to_string()).or_default();
        if posting.last().map(String::as_str) != Some(verse_ref) {
            posting.push(verse_ref.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_index() -> BibleIndex {
        let verses = vec![
            (
                "Genesis 1:1".to_string(),
                "In the beginning <H7225> God <H430> created <H1254> {TH8804} \
                 the heaven and the earth."
                    .to_string(),
            ),
            (
                "Genesis 1:2".to_string(),
                "And the earth was without form, and void; and darkness <i>was</i> \
                 upon the face of the deep."
                    .to_string(),
            ),
            (
                "John 1:1".to_string(),
                "In the beginning was the Word, and the Word was with God.".to_string(),
            ),
        ];
        IndexBuilder::new("KJV").build(verses.into_iter(), 3)
    }

    #[test]
    fn intersect_and_union() {
        let index = small_index();
        let both = index.value_intersect(&["beginning", "God"], false);
        assert_eq!(both.len(), 2);

        let any = index.value_union(&["darkness", "Word"], false);
        assert_eq!(any.len(), 2);
    }

    #[test]
    fn case_folding() {
        let index = small_index();
        // "word" only appears capitalized.
        assert_eq!(index.value_union(&["word"], false).len(), 1);
        assert!(index.value_union(&["word"], true).is_empty());
    }

    #[test]
    fn sym_diff_is_exclusive() {
        let index = small_index();
        // "beginning" is in both verses, "darkness" in one.
        let one_only = index.value_sym_diff(&["beginning", "darkness"], false);
        assert_eq!(one_only.len(), 1);
    }

    #[test]
    fn partial_words() {
        let index = small_index();
        let hits = index.from_partial(&["begin*"], false, usize::MAX).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn strongs_and_morph_postings() {
        let index = small_index();
        assert_eq!(index.value_union(&["H7225"], true).len(), 1);
        assert_eq!(index.value_union(&["TH8804"], true).len(), 1);
    }

    #[test]
    fn verse_text_round_trip() {
        let index = small_index();
        let gen11: VerseRef = "Genesis 1:1".parse().unwrap();
        assert!(index.verse_text(&gen11).unwrap().contains("<H7225>"));
    }
}
