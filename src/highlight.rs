use crate::combined::CombinedParse;
use crate::error::Result;
use crate::search::SearchMode;
use crate::verse::VerseRef;
use lazy_static::lazy_static;
use log::error;
use regex::Regex;
use std::collections::HashSet;

/// Pattern text matching one ANSI color escape.
pub const COLOR_TAG: &str = r"\x1b\[[\d;]*m";

lazy_static! {
    static ref STRONGS_TOKEN: Regex = Regex::new(r"^<?([GHgh]\d+)>?$").unwrap();
    static ref MORPH_TOKEN: Regex = Regex::new(r"^[({]([\w-]+)[)}]$").unwrap();
    // Strips everything that is not a word character, wildcard, marker
    // bracket, or dash before term processing.
    static ref CLEAN_REGX: Regex = Regex::new(r"[^\w\s\*<>\{\}\(\)-]").unwrap();
}

/// Derive the list of highlight targets for a search request.
///
/// This is a pure function of the mode and the raw argument tokens; the
/// result set of a search never feeds back into it.  `Regex` derives
/// nothing here because the raw pattern is used verbatim (see
/// [`pattern_set`]), and `Sword` engine modes highlight exactly what the
/// user typed since the engine's own match positions are not trusted.
pub fn highlight_terms(mode: SearchMode, arg_list: &[String]) -> Result<Vec<String>> {
    let arg_str = arg_list.join(" ");
    let terms = match mode {
        SearchMode::Combined => {
            let parser = CombinedParse::new(&arg_str)?;
            parser
                .word_list()
                .join(" ")
                .split_whitespace()
                .map(str::to_string)
                .collect()
        }
        SearchMode::CombinedPhrase => {
            // Keep each parsed word group together as an ordered phrase.
            CombinedParse::new(&arg_str)?.word_list().to_vec()
        }
        SearchMode::Anyword
        | SearchMode::Multiword
        | SearchMode::Eitheror
        | SearchMode::PartialWord => arg_str.split_whitespace().map(str::to_string).collect(),
        SearchMode::Mixed => {
            // Tokens prefixed with '!' exclude verses and must never be
            // highlighted.
            arg_list
                .iter()
                .filter(|term| !term.starts_with('!'))
                .cloned()
                .collect()
        }
        SearchMode::Phrase | SearchMode::MixedPhrase | SearchMode::OrderedMultiword => {
            vec![arg_str]
        }
        SearchMode::Regex => Vec::new(),
        SearchMode::Sword(_) => arg_list.to_vec(),
    };
    Ok(terms)
}

/// Build the complete ordered pattern set for one invocation.
///
/// Lookup requests highlight the raw tokens regardless of the configured
/// mode; a regex search bypasses derivation and compiles the raw argument
/// string as the single pattern.  When a context window is in effect the
/// hit set's own reference strings are appended as a secondary pattern
/// set, after (and therefore at lower precedence than) the primary one.
pub fn pattern_set(
    mode: SearchMode,
    arg_list: &[String],
    lookup: bool,
    case_sensitive: bool,
    context: u32,
    hits: &HashSet<VerseRef>,
) -> Result<Vec<Regex>> {
    if mode == SearchMode::Regex && !lookup {
        let arg_str = arg_list.join(" ");
        let flags = if case_sensitive { "" } else { "(?i)" };
        return Ok(vec![Regex::new(&format!("{flags}{arg_str}"))?]);
    }

    let terms = if lookup {
        arg_list.to_vec()
    } else {
        highlight_terms(mode, arg_list)?
    };

    let mut regx_list = build_highlight_regex(
        &terms,
        case_sensitive,
        mode == SearchMode::OrderedMultiword,
    );
    if context > 0 {
        let mut refs: Vec<String> = hits.iter().map(VerseRef::to_string).collect();
        refs.sort();
        regx_list.extend(build_highlight_regex(&refs, case_sensitive, false));
    }
    Ok(regx_list)
}

/// Compile each highlight term into a matching pattern, preserving order.
///
/// Word boundaries also swallow ANSI escapes so that terms still match in
/// text that has already been colorized.
pub fn build_highlight_regex(
    search_list: &[String],
    case_sensitive: bool,
    sloppy: bool,
) -> Vec<Regex> {
    let mut regx_list = Vec::with_capacity(search_list.len());

    for item in search_list {
        let item = item.trim();
        let result = if item.contains('*') && !item.contains(' ') && !item.starts_with('&') {
            // A lone partial word: wildcard it and match it whole.
            let item = item.trim_start_matches(['!', '^', '+', '|']);
            let item = regex_escape_keep_star(item).replace('*', r"\w*");
            compile_term(&format!("{0}({1}){0}", word_bound(), item), case_sensitive)
        } else if let Some(raw) = item.strip_prefix('&') {
            compile_term(raw, case_sensitive)
        } else {
            search_terms_to_regex(item, case_sensitive, sloppy || item.contains('~'))
        };

        match result {
            Ok(regx) => regx_list.push(regx),
            Err(err) => {
                error!(
                    "Could not compile highlight pattern for '{item}': {err}. \
                     It will not be highlighted."
                );
                regx_list.push(Regex::new(r"[^\s\S]").unwrap());
            }
        }
    }

    regx_list
}

/// Translate one search term (a word, phrase, Strong's number, or
/// morphological tag mix) into a matching regular expression.
///
/// Phrases require their parts in order; the filler between parts skips
/// punctuation and color codes, plus whichever marker kinds are not being
/// searched for directly.  `sloppy` additionally lets whole words sit
/// between the parts (the ordered-multiword semantics).
pub fn search_terms_to_regex(
    search_terms: &str,
    case_sensitive: bool,
    sloppy: bool,
) -> std::result::Result<Regex, regex::Error> {
    // Fillers the phrase separator may skip.
    let not_words_str = r"\b\w+\b";
    let not_strongs_str = r"<[^>]*>";
    let not_morph_str = r"\{[^\}]*\}";
    let not_punct_str = r#"[\s,\?\!\.;:\\/_\(\)\[\]"'-]"#;

    let cleaned = CLEAN_REGX.replace_all(search_terms, " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let phrase = tokens.len() > 1;

    let bound = word_bound();
    let mut strongs_count = 0;
    let mut morph_count = 0;
    let mut word_count = 0;
    let mut parts = Vec::with_capacity(tokens.len());

    // One capture per part: exactly the word, number, or tag itself, so
    // the highlighter can wrap each captured token.
    for token in &tokens {
        if let Some(caps) = STRONGS_TOKEN.captures(token) {
            strongs_count += 1;
            let num = caps[1].to_uppercase();
            parts.push(format!("<{bound}({num}){bound}>"));
        } else if let Some(caps) = MORPH_TOKEN.captures(token) {
            morph_count += 1;
            let tag = regex::escape(&caps[1].to_uppercase());
            parts.push(format!(r"\{{{bound}({tag}){bound}\}}"));
        } else {
            word_count += 1;
            let word = regex_escape_keep_star(token).replace('*', r"\w*");
            parts.push(format!("{bound}({word}){bound}"));
        }
    }

    let space_str = if phrase {
        let mut fillers = format!("(?:{not_punct_str}|{COLOR_TAG}|\x1b");
        if strongs_count == 0 || sloppy {
            fillers = format!("{fillers}|{not_strongs_str}");
        }
        if morph_count == 0 || sloppy {
            fillers = format!("{fillers}|{not_morph_str}");
        }
        if word_count == 0 || strongs_count > 0 || morph_count > 0 || sloppy {
            // Word attributes in the search let whole words sit between
            // the parts while the match is still one phrase.
            fillers = format!("{fillers}|{not_words_str}");
        }
        format!("{fillers})*?")
    } else {
        String::new()
    };

    compile_term(&parts.join(&space_str), case_sensitive)
}

fn word_bound() -> String {
    format!(r"(?:{COLOR_TAG}|\b)+")
}

fn compile_term(
    reg_str: &str,
    case_sensitive: bool,
) -> std::result::Result<Regex, regex::Error> {
    let flags = if case_sensitive { "" } else { "(?i)" };
    Regex::new(&format!("{flags}{reg_str}"))
}

// regex::escape, except '*' survives so wildcards can expand afterwards.
fn regex_escape_keep_star(term: &str) -> String {
    regex::escape(term).replace(r"\*", "*")
}
