use crate::combined::CombinedParse;
use crate::error::{Result, VersegrepError};
use crate::highlight::search_terms_to_regex;
use crate::index::BibleIndex;
use crate::render::prepare_text;
use crate::verse::{parse_verse_range, VerseIter, VerseRef};
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref STRONGS_TOKEN: Regex = Regex::new(r"^<?([GHgh]\d+)>?$").unwrap();
    static ref MORPH_TOKEN: Regex = Regex::new(r"^[({]([\w-]+)[)}]$").unwrap();
    static ref STRONGS_PREFIX: Regex = Regex::new(r"^<?[GH]\d+").unwrap();
    static ref MORPH_PREFIX: Regex = Regex::new(r"^[({][\w-]+[)}]").unwrap();
    static ref NON_SEARCH_REGX: Regex = Regex::new(r"[^\w\s\*<>\{\}\(\)-]").unwrap();
}

/// Which native query flavor a `sword_*` search delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwordKind {
    Lucene,
    Phrase,
    Multiword,
    Entryattrib,
}

/// The closed set of search types.
///
/// Each variant selects both a search operation and a highlight
/// derivation rule; the dispatcher matches exhaustively so a new variant
/// cannot be added without deciding both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Phrase,
    Multiword,
    Anyword,
    Eitheror,
    PartialWord,
    Mixed,
    MixedPhrase,
    OrderedMultiword,
    Regex,
    Combined,
    CombinedPhrase,
    Sword(SwordKind),
}

impl FromStr for SearchMode {
    type Err = VersegrepError;

    fn from_str(name: &str) -> Result<Self> {
        Ok(match name {
            "phrase" => SearchMode::Phrase,
            "multiword" => SearchMode::Multiword,
            "anyword" => SearchMode::Anyword,
            "eitheror" => SearchMode::Eitheror,
            "partial_word" => SearchMode::PartialWord,
            "mixed" => SearchMode::Mixed,
            "mixed_phrase" => SearchMode::MixedPhrase,
            "ordered_multiword" => SearchMode::OrderedMultiword,
            "regex" => SearchMode::Regex,
            "combined" => SearchMode::Combined,
            "combined_phrase" => SearchMode::CombinedPhrase,
            // The engine kind rides along as an opaque extra.
            "sword" | "sword_lucene" => SearchMode::Sword(SwordKind::Lucene),
            "sword_phrase" => SearchMode::Sword(SwordKind::Phrase),
            "sword_multiword" => SearchMode::Sword(SwordKind::Multiword),
            "sword_entryattrib" => SearchMode::Sword(SwordKind::Entryattrib),
            _ => return Err(VersegrepError::InvalidSearchType(name.to_string())),
        })
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Phrase => "phrase",
            SearchMode::Multiword => "multiword",
            SearchMode::Anyword => "anyword",
            SearchMode::Eitheror => "eitheror",
            SearchMode::PartialWord => "partial_word",
            SearchMode::Mixed => "mixed",
            SearchMode::MixedPhrase => "mixed_phrase",
            SearchMode::OrderedMultiword => "ordered_multiword",
            SearchMode::Regex => "regex",
            SearchMode::Combined => "combined",
            SearchMode::CombinedPhrase => "combined_phrase",
            SearchMode::Sword(SwordKind::Lucene) => "sword_lucene",
            SearchMode::Sword(SwordKind::Phrase) => "sword_phrase",
            SearchMode::Sword(SwordKind::Multiword) => "sword_multiword",
            SearchMode::Sword(SwordKind::Entryattrib) => "sword_entryattrib",
        };
        write!(f, "{name}")
    }
}

/// Per-search boolean options and the optional range restriction.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub strongs: bool,
    pub morph: bool,
    pub added: bool,
    pub case_sensitive: bool,
    pub range: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            strongs: false,
            morph: false,
            added: true,
            case_sensitive: false,
            range: String::new(),
        }
    }
}

/// Searches a [`BibleIndex`] with any of the supported search types.
pub struct Searcher {
    index: BibleIndex,
}

impl Searcher {
    pub fn new(index: BibleIndex) -> Self {
        Searcher { index }
    }

    pub fn index(&self) -> &BibleIndex {
        &self.index
    }

    /// Dispatch a search by mode and return the set of matching verses.
    pub fn search(
        &self,
        mode: SearchMode,
        terms: &[String],
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        let term_str = fix_strongs_morph(&terms.join(" "));
        match mode {
            SearchMode::Phrase => self.phrase_search(&term_str, opts),
            SearchMode::Multiword => self.multiword_search(&term_str, opts),
            SearchMode::Anyword => self.anyword_search(&term_str, opts),
            SearchMode::Eitheror => self.eitheror_search(&term_str, opts),
            SearchMode::PartialWord => self.partial_word_search(&terms.join(" "), opts),
            SearchMode::Mixed => self.mixed_search(terms, opts),
            SearchMode::MixedPhrase => self.mixed_phrase_search(&term_str, opts),
            SearchMode::OrderedMultiword => self.ordered_multiword_search(&term_str, opts),
            SearchMode::Regex => self.regex_search(&terms.join(" "), opts),
            SearchMode::Combined => self.combined_search(&term_str, opts),
            SearchMode::CombinedPhrase => self.combined_phrase_search(&term_str, opts),
            SearchMode::Sword(kind) => self.sword_search(&terms.join(" "), kind, opts),
        }
    }

    fn range_set(&self, range: &str) -> Result<BTreeSet<VerseRef>> {
        parse_verse_range(range)
    }

    /// Keys as they are looked up in the index for set operations.
    fn index_keys(&self, terms: &str, opts: &SearchOptions) -> Vec<String> {
        let cleaned = clean_search_text(terms);
        let cleaned = if opts.strongs || opts.morph {
            cleaned.to_uppercase()
        } else {
            cleaned
        };
        cleaned.split_whitespace().map(str::to_string).collect()
    }

    fn confine(&self, found: HashSet<VerseRef>, range: &BTreeSet<VerseRef>) -> HashSet<VerseRef> {
        if range.is_empty() {
            found
        } else {
            found.into_iter().filter(|v| range.contains(v)).collect()
        }
    }

    /// Verses containing all of the search terms.
    pub fn multiword_search(&self, terms: &str, opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        info!("Searching for verses with all of '{terms}'...");
        let keys = self.index_keys(terms, opts);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let found = self.index.value_intersect(&keys, opts.case_sensitive);
        Ok(self.confine(found, &self.range_set(&opts.range)?))
    }

    /// Verses containing any of the search terms.
    pub fn anyword_search(&self, terms: &str, opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        info!("Searching for verses with any of '{terms}'...");
        let keys = self.index_keys(terms, opts);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let found = self.index.value_union(&keys, opts.case_sensitive);
        Ok(self.confine(found, &self.range_set(&opts.range)?))
    }

    /// Verses containing one and only one of the search terms.
    pub fn eitheror_search(&self, terms: &str, opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        info!("Searching for verses with exactly one of '{terms}'...");
        let keys = self.index_keys(terms, opts);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let found = self.index.value_sym_diff(&keys, opts.case_sensitive);
        Ok(self.confine(found, &self.range_set(&opts.range)?))
    }

    /// Verses containing any word matching the `*` partial words.
    pub fn partial_word_search(
        &self,
        terms: &str,
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        info!("Searching for verses with partial words '{terms}'...");
        let keys: Vec<&str> = terms.split_whitespace().collect();
        let found = self
            .index
            .from_partial(&keys, opts.case_sensitive, usize::MAX)?;
        Ok(self.confine(found, &self.range_set(&opts.range)?))
    }

    /// Verses containing the terms as a contiguous phrase.
    pub fn phrase_search(&self, terms: &str, opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        info!("Searching for the phrase '{terms}'...");
        let terms = clean_search_text(terms);
        let terms = if opts.strongs || opts.morph {
            terms.to_uppercase()
        } else {
            terms
        };

        let reg_str = if opts.strongs {
            terms.replace(' ', "[^<]*")
        } else if opts.morph {
            terms.replace(' ', r"[^\{]*")
        } else {
            format!(
                r"\b{}\b",
                terms.replace(' ', r"\b(?:<[^>]*>|\{[^\}]*\}|\W)*\b")
            )
        };
        let flags = if opts.case_sensitive { "" } else { "(?i)" };
        let search_regx = Regex::new(&format!("{flags}{reg_str}"))?;

        self.scan_candidates(&terms, &search_regx, opts)
    }

    /// Phrase search that understands mixed words, Strong's numbers,
    /// morphological tags, and `*` partials in one phrase.
    pub fn mixed_phrase_search(
        &self,
        terms: &str,
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        info!("Searching for the phrase '{terms}'...");
        let search_regx = search_terms_to_regex(terms, opts.case_sensitive, false)?;
        self.scan_candidates(terms, &search_regx, opts)
    }

    /// All the words in order, with anything between them.
    pub fn ordered_multiword_search(
        &self,
        terms: &str,
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        info!("Searching for verses with the words of '{terms}' in order...");
        let search_regx = search_terms_to_regex(terms, opts.case_sensitive, true)?;
        self.scan_candidates(terms, &search_regx, opts)
    }

    /// Narrow candidates with the index, then run the phrase regex over
    /// each candidate's text.
    fn scan_candidates(
        &self,
        terms: &str,
        search_regx: &Regex,
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        let cleaned = clean_search_text(terms);
        let keys: Vec<&str> = cleaned.split_whitespace().collect();
        let candidates = if cleaned.contains('*') {
            self.index.from_partial(&keys, opts.case_sensitive, 5000)?
        } else {
            self.index.value_intersect(&keys, opts.case_sensitive)
        };
        let candidates = self.confine(candidates, &self.range_set(&opts.range)?);

        // A single word is already confirmed by the index.
        if keys.len() <= 1 {
            return Ok(candidates);
        }

        // Keep the attribute markers the phrase actually searches for.
        let strongs = opts.strongs || keys.iter().any(|k| STRONGS_TOKEN.is_match(k));
        let morph = opts.morph || terms.contains('{') || terms.contains('(');

        let mut found = HashSet::new();
        for candidate in candidates {
            if let Some(raw) = self.index.verse_text(&candidate) {
                let text = prepare_text(raw, strongs, morph, opts.added, false, false, false);
                if search_regx.is_match(&text) {
                    found.insert(candidate);
                }
            }
        }
        Ok(found)
    }

    /// Scan every verse in range with a user-supplied regular expression.
    pub fn regex_search(&self, terms: &str, opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        info!("Searching with the regular expression '{terms}'...");
        let flags = if opts.case_sensitive { "" } else { "(?i)" };
        let search_regx = Regex::new(&format!("{flags}{terms}"))?;

        let range = self.range_set(&opts.range)?;
        let refs: Vec<VerseRef> = if range.is_empty() {
            VerseIter::all().collect()
        } else {
            range.into_iter().collect()
        };

        let mut found = HashSet::new();
        for reference in refs {
            let Some(raw) = self.index.verse_text(&reference) else {
                continue;
            };
            let text = prepare_text(raw, opts.strongs, opts.morph, opts.added, false, false, false);
            if search_regx.is_match(&text) {
                found.insert(reference);
            } else if !opts.strongs && !opts.morph {
                // Punctuation may break an otherwise matching pattern.
                let clean = clean_search_text(&text);
                if search_regx.is_match(&clean) {
                    found.insert(reference);
                }
            }
        }
        Ok(found)
    }

    /// Per-token combining search.
    ///
    /// First-column prefixes: `!` not, `+` all, `|` or (default), `^`
    /// exclusive or.  Second column: `~` sloppy phrase, `&` regex, `*`
    /// partial.  Quoted multi-word tokens search as phrases.
    pub fn mixed_search(&self, terms: &[String], opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        enum Combine {
            Not,
            And,
            Or,
            Xor,
            Found,
        }

        let mut found_set: HashSet<VerseRef> = HashSet::new();
        let mut not_set: HashSet<VerseRef> = HashSet::new();
        let mut and_set: Option<HashSet<VerseRef>> = None;
        let mut or_set: HashSet<VerseRef> = HashSet::new();
        let mut xor_set: HashSet<VerseRef> = HashSet::new();

        for term in terms {
            let (combine, term) = match term.chars().next() {
                Some('!') => (Combine::Not, &term[1..]),
                Some('+') => (Combine::And, &term[1..]),
                Some('|') => (Combine::Or, &term[1..]),
                Some('^') => (Combine::Xor, &term[1..]),
                _ => (Combine::Found, term.as_str()),
            };

            // Strong's/morphology searches are detected per token.
            let upper = term.to_uppercase();
            let mut term_opts = opts.clone();
            term_opts.strongs = STRONGS_PREFIX.is_match(&upper);
            term_opts.morph = MORPH_PREFIX.is_match(&upper);

            let temp_set = if let Some(raw) = term.strip_prefix('&') {
                self.regex_search(raw, &term_opts)?
            } else if term.contains(' ') {
                let term_str = fix_strongs_morph(term);
                if let Some(sloppy) = term_str.strip_prefix('~') {
                    self.ordered_multiword_search(sloppy, &term_opts)?
                } else {
                    self.mixed_phrase_search(&term_str, &term_opts)?
                }
            } else if term.contains('*') {
                self.partial_word_search(term, &term_opts)?
            } else {
                self.multiword_search(&fix_strongs_morph(term), &term_opts)?
            };

            match combine {
                Combine::Not => not_set.extend(temp_set),
                Combine::And => {
                    and_set = Some(match and_set {
                        // The first '+' term seeds the must-have set.
                        None => temp_set,
                        Some(acc) => acc.intersection(&temp_set).copied().collect(),
                    });
                }
                Combine::Or => or_set.extend(temp_set),
                Combine::Xor => {
                    xor_set = xor_set.symmetric_difference(&temp_set).copied().collect();
                }
                Combine::Found => found_set.extend(temp_set),
            }
        }

        found_set.extend(or_set);
        found_set.extend(xor_set);

        if let Some(and_set) = and_set {
            if found_set.is_empty() {
                found_set = and_set;
            } else {
                // Everything kept must carry the '+' terms.
                let kept: HashSet<VerseRef> =
                    found_set.intersection(&and_set).copied().collect();
                found_set = and_set.union(&kept).copied().collect();
            }
        }

        Ok(found_set.difference(&not_set).copied().collect())
    }

    /// Evaluate a combined boolean expression such as
    /// `created NOT (and OR but)`.
    pub fn combined_search(&self, terms: &str, opts: &SearchOptions) -> Result<HashSet<VerseRef>> {
        info!("Searching for '{terms}'...");
        let parser = CombinedParse::new(terms)?;

        let found = self.combine_groups(parser.word_list(), opts, false)?;
        let excluded = self.combine_groups(parser.not_list(), opts, false)?;
        Ok(found.difference(&excluded).copied().collect())
    }

    /// Combined search where every word group is searched as a phrase.
    pub fn combined_phrase_search(
        &self,
        terms: &str,
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        info!("Searching for '{terms}'...");
        let parser = CombinedParse::new(terms)?;

        let found = self.combine_groups(parser.word_list(), opts, true)?;
        let excluded = self.combine_groups(parser.not_list(), opts, true)?;
        Ok(found.difference(&excluded).copied().collect())
    }

    fn combine_groups(
        &self,
        groups: &[String],
        opts: &SearchOptions,
        phrases: bool,
    ) -> Result<HashSet<VerseRef>> {
        let mut temp_set: HashSet<VerseRef> = HashSet::new();
        let mut and_it = false;

        for group in groups {
            if group == "&" {
                // Intersect the next group's results with this one.
                and_it = true;
                continue;
            }
            let result_set = if phrases || group.contains('+') {
                // '+' joined words search as one phrase.
                self.mixed_phrase_search(&group.replace('+', " "), opts)?
            } else {
                self.multiword_search(group, opts)?
            };

            if phrases {
                temp_set.extend(result_set);
            } else if and_it {
                temp_set = temp_set.intersection(&result_set).copied().collect();
                and_it = false;
            } else {
                // Keep verses in one group or the other, not both.
                temp_set = temp_set
                    .symmetric_difference(&result_set)
                    .copied()
                    .collect();
            }
        }

        Ok(temp_set)
    }

    /// Delegate to the module engine's native query flavors.  The engine
    /// is emulated over our own index; match positions are never taken
    /// from it, highlighting always recomputes them.
    pub fn sword_search(
        &self,
        terms: &str,
        kind: SwordKind,
        opts: &SearchOptions,
    ) -> Result<HashSet<VerseRef>> {
        info!("Searching using the module engine for '{terms}'...");
        match kind {
            SwordKind::Lucene => self.anyword_search(&fix_strongs_morph(terms), opts),
            SwordKind::Phrase => self.mixed_phrase_search(&fix_strongs_morph(terms), opts),
            SwordKind::Multiword => self.multiword_search(&fix_strongs_morph(terms), opts),
            SwordKind::Entryattrib => {
                // Queries look like 'Word//Lemma//G1234'; the last segment
                // is the attribute key.
                let key = terms.rsplit("//").next().unwrap_or(terms).to_uppercase();
                let found = self.index.value_union(&[key.as_str()], true);
                Ok(self.confine(found, &self.range_set(&opts.range)?))
            }
        }
    }
}

/// Normalize Strong's numbers to `<G1234>` and morphological tags to
/// `{TAG}` so they hit the index and the phrase builders uniformly.
pub fn fix_strongs_morph(terms: &str) -> String {
    terms
        .split_whitespace()
        .map(|token| {
            if let Some(caps) = STRONGS_TOKEN.captures(token) {
                format!("<{}>", caps[1].to_uppercase())
            } else if let Some(caps) = MORPH_TOKEN.captures(token) {
                format!("{{{}}}", caps[1].to_uppercase())
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip everything except word characters, wildcards, attribute
/// brackets, and dashes; collapse runs of whitespace.
fn clean_search_text(text: &str) -> String {
    let cleaned = NON_SEARCH_REGX.replace_all(text, " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;

    fn searcher() -> Searcher {
        let verses = vec![
            (
                "Genesis 1:1".to_string(),
                "In the beginning <H7225> God <H430> created <H1254> {TH8804} the \
                 heaven and the earth."
                    .to_string(),
            ),
            (
                "Genesis 1:2".to_string(),
                "And the earth was without form, and void; and darkness <i>was</i> \
                 upon the face of the deep."
                    .to_string(),
            ),
            (
                "Genesis 1:3".to_string(),
                "And God said, Let there be light: and there was light.".to_string(),
            ),
            (
                "John 1:1".to_string(),
                "In the beginning was the Word, and the Word was with God.".to_string(),
            ),
            (
                "John 3:16".to_string(),
                "For God so loved the world, that he gave his only begotten Son."
                    .to_string(),
            ),
        ];
        Searcher::new(IndexBuilder::new("KJV").build(verses.into_iter(), 5))
    }

    fn refs(set: &HashSet<VerseRef>) -> Vec<String> {
        let mut list: Vec<String> = set.iter().map(VerseRef::to_string).collect();
        list.sort_by_key(|r| r.parse::<VerseRef>().unwrap());
        list
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let err = SearchMode::from_str("backwards").unwrap_err();
        match err {
            VersegrepError::InvalidSearchType(name) => assert_eq!(name, "backwards"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn sword_names_split_into_kind() {
        assert_eq!(
            SearchMode::from_str("sword_phrase").unwrap(),
            SearchMode::Sword(SwordKind::Phrase)
        );
        assert_eq!(
            SearchMode::from_str("sword").unwrap(),
            SearchMode::Sword(SwordKind::Lucene)
        );
    }

    #[test]
    fn multiword_needs_every_word() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::Multiword,
                &args(&["beginning", "God"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:1", "John 1:1"]);
    }

    #[test]
    fn anyword_takes_any() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::Anyword,
                &args(&["darkness", "light"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:2", "Genesis 1:3"]);
    }

    #[test]
    fn phrase_requires_order() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::Phrase,
                &args(&["in", "the", "beginning"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:1", "John 1:1"]);

        // Same words, wrong order: not a phrase hit.
        let found = s
            .search(
                SearchMode::Phrase,
                &args(&["beginning", "the", "in"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn phrase_spans_markers() {
        let s = searcher();
        // "God created" has a Strong's number between the words.
        let found = s
            .search(
                SearchMode::Phrase,
                &args(&["God", "created"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:1"]);
    }

    #[test]
    fn mixed_not_excludes() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::Mixed,
                &args(&["God", "!light"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:1", "John 1:1", "John 3:16"]);
    }

    #[test]
    fn mixed_plus_requires() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::Mixed,
                &args(&["light", "+said"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:3"]);
    }

    #[test]
    fn eitheror_is_exclusive() {
        let s = searcher();
        // "beginning" hits Gen 1:1 and John 1:1, "world" only John 3:16.
        let found = s
            .search(
                SearchMode::Eitheror,
                &args(&["beginning", "world"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn partial_word_expands() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::PartialWord,
                &args(&["begot*"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["John 3:16"]);
    }

    #[test]
    fn regex_search_scans_range() {
        let s = searcher();
        let opts = SearchOptions {
            range: "Genesis".to_string(),
            ..Default::default()
        };
        let found = s
            .search(SearchMode::Regex, &args(&["light|darkness"]), &opts)
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:2", "Genesis 1:3"]);
    }

    #[test]
    fn combined_not_subtracts() {
        let s = searcher();
        let found = s
            .search(
                SearchMode::Combined,
                &args(&["God", "NOT", "(light", "OR", "world)"]),
                &SearchOptions::default(),
            )
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:1", "John 1:1"]);
    }

    #[test]
    fn strongs_search_hits_postings() {
        let s = searcher();
        let opts = SearchOptions {
            strongs: true,
            ..Default::default()
        };
        let found = s
            .search(SearchMode::Multiword, &args(&["h7225"]), &opts)
            .unwrap();
        assert_eq!(refs(&found), ["Genesis 1:1"]);
    }

    #[test]
    fn range_confines_results() {
        let s = searcher();
        let opts = SearchOptions {
            range: "John".to_string(),
            ..Default::default()
        };
        let found = s
            .search(SearchMode::Multiword, &args(&["God"]), &opts)
            .unwrap();
        assert_eq!(refs(&found), ["John 1:1", "John 3:16"]);
    }
}
