use crate::highlight::COLOR_TAG;
use crate::index::BibleIndex;
use crate::verse::VerseRef;
use lazy_static::lazy_static;
use regex::Regex;

pub const STRONGS_COLOR: &str = "\x1b[36m";
pub const MORPH_COLOR: &str = "\x1b[35m";
pub const REF_COLOR: &str = "\x1b[32m";
pub const ITALIC_COLOR: &str = "\x1b[4m";
pub const HIGHLIGHT_COLOR: &str = "\x1b[7m";
pub const END_COLOR: &str = "\x1b[m";

lazy_static! {
    static ref STRONGS_MARKER: Regex = Regex::new(r"\s*<([GH]\d+)>").unwrap();
    static ref MORPH_MARKER: Regex = Regex::new(r"\s*\{([\w-]+)\}").unwrap();
    static ref ITALIC_SPAN: Regex = Regex::new(r"(?s)\s?<i>\s?(.*?)\s?</i>").unwrap();
    static ref ITALIC_TAGS: Regex = Regex::new(r"<i>\s?|\s?</i>").unwrap();
    static ref PARA_SPAN: Regex = Regex::new(r"(?s)\s?<p>\s?(.*?)\s?</p>").unwrap();
    static ref PARA_TAGS: Regex = Regex::new(r"<p>\s?|\s?</p>").unwrap();
    static ref NOTES_SPAN: Regex = Regex::new(r"(?s)\s?<n>\s?(.*?)\s?</n>").unwrap();
    static ref WORD_REGX: Regex = Regex::new(r"\b([\w-]+)\b").unwrap();
    static ref STRIP_COLOR: Regex = Regex::new(r"\x1b\[[\d;]*m").unwrap();
    // Attribute markers again, but tolerating color codes inside.
    static ref COLORED_STRONGS: Regex =
        Regex::new(r"(?i)<((?:\x1b\[[\d;]*m)*?[GH]?\d+?(?:\x1b\[[\d;]*m)*?)>").unwrap();
    static ref COLORED_MORPH: Regex =
        Regex::new(r"\{((?:\x1b\[[\d;]*m)*?[\w-]*?(?:\x1b\[[\d;]*m)*?)\}").unwrap();
}

/// Reduce raw indexed verse text to the parts a caller wants to see or
/// search.
///
/// Strong's numbers, morphological tags, added-text italics, paragraph
/// marks, and study notes are kept or stripped individually; when notes
/// are kept they fold into a trailing `(Notes: ...)`.
pub fn prepare_text(
    raw: &str,
    strongs: bool,
    morph: bool,
    added: bool,
    italic_markers: bool,
    paragraph: bool,
    notes: bool,
) -> String {
    let mut text = if notes {
        NOTES_SPAN.replace_all(raw, " (Notes: $1)").into_owned()
    } else {
        NOTES_SPAN.replace_all(raw, "").into_owned()
    };
    if !strongs {
        text = STRONGS_MARKER.replace_all(&text, "").into_owned();
    }
    if !morph {
        text = MORPH_MARKER.replace_all(&text, "").into_owned();
    }
    if !added {
        // Drop the added text entirely, markers and all.
        text = ITALIC_SPAN.replace_all(&text, "").into_owned();
    }
    if !italic_markers {
        text = ITALIC_TAGS.replace_all(&text, " ").into_owned();
    }
    if paragraph {
        text = PARA_TAGS.replace_all(&text, "").into_owned();
    } else {
        text = PARA_SPAN.replace_all(&text, "").into_owned();
    }
    collapse_spaces(text.trim())
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !last_space {
                out.push(c);
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

/// Apply the highlight pattern set to rendered verse text.
///
/// Patterns run in order, and within each match every captured word is
/// wrapped in the highlight color with boundaries that tolerate colors
/// already present in the text.
pub fn highlight_search_terms(verse_text: &str, regx_list: &[Regex]) -> String {
    let mut verse_text = verse_text.trim().to_string();

    for regx in regx_list {
        verse_text = regx
            .replace_all(&verse_text, |caps: &regex::Captures| {
                let mut match_text = caps.get(0).unwrap().as_str().to_string();
                if caps.len() == 1 {
                    // A raw pattern with no captures highlights the whole
                    // match.
                    return format!("{HIGHLIGHT_COLOR}{match_text}{END_COLOR}");
                }
                let mut seen = std::collections::HashSet::new();
                for group in caps.iter().skip(1).flatten() {
                    let word = group.as_str();
                    if word.is_empty() || !seen.insert(word.to_string()) {
                        continue;
                    }
                    let word_regx = Regex::new(&format!(
                        "((?:{COLOR_TAG}|\\b)+{}(?:{COLOR_TAG}|\\b)+)",
                        regex::escape(word)
                    ));
                    if let Ok(word_regx) = word_regx {
                        match_text = word_regx
                            .replace_all(
                                &match_text,
                                format!("{HIGHLIGHT_COLOR}${{1}}{END_COLOR}"),
                            )
                            .into_owned();
                    }
                }
                match_text
            })
            .into_owned();
    }

    verse_text
}

/// How rendered verses are decorated.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub wrap: bool,
    pub strongs: bool,
    pub morph: bool,
    pub added: bool,
    pub notes: bool,
    /// 0 colors references only, 1 adds italics, 2 adds attribute
    /// markers, 3 adds search-term highlighting.
    pub color_level: u8,
    /// Master switch; off for non-terminal output.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            wrap: true,
            strongs: false,
            morph: false,
            added: true,
            notes: false,
            color_level: 3,
            color: true,
        }
    }
}

/// Lazy renderer: one formatted verse per pull.
///
/// Text retrieval happens per item as the iterator is consumed, so the
/// cost of rendering is only paid for verses actually printed.  The
/// iterator is single pass.
pub struct VerseRenderer<'a, I> {
    refs: I,
    index: &'a BibleIndex,
    regx_list: Vec<Regex>,
    opts: RenderOptions,
    width: usize,
}

impl<'a, I> VerseRenderer<'a, I>
where
    I: Iterator<Item = VerseRef>,
{
    pub fn new(refs: I, index: &'a BibleIndex, regx_list: Vec<Regex>, opts: RenderOptions) -> Self {
        VerseRenderer {
            refs,
            index,
            regx_list,
            opts,
            width: term_width(),
        }
    }

    fn render_one(&self, reference: VerseRef) -> String {
        let opts = &self.opts;
        let raw = self.index.verse_text(&reference).unwrap_or("");
        let text = prepare_text(
            raw,
            opts.strongs,
            opts.morph,
            opts.added,
            opts.color && opts.color_level >= 1,
            opts.added,
            opts.notes,
        );

        let ref_str = reference.to_string();
        let mut verse_text = format!("{ref_str}: {text}");

        // Wrap before coloring, or the escape codes inflate the line
        // length and the text wraps early.
        if opts.wrap {
            verse_text = fill(&verse_text, self.width);
        }

        if !opts.color {
            return verse_text;
        }

        verse_text = verse_text.replacen(
            &ref_str,
            &format!("{REF_COLOR}{ref_str}{END_COLOR}"),
            1,
        );

        if opts.color_level >= 1 && opts.added {
            verse_text = ITALIC_SPAN
                .replace_all(&verse_text, |caps: &regex::Captures| {
                    // Earlier colors would bleed through the underline.
                    let plain = STRIP_COLOR.replace_all(&caps[1], "");
                    format!(
                        " {}",
                        WORD_REGX.replace_all(&plain, format!("{ITALIC_COLOR}${{1}}{END_COLOR}"))
                    )
                })
                .into_owned();
        }

        if opts.color_level >= 2 {
            if opts.strongs {
                verse_text = COLORED_STRONGS
                    .replace_all(&verse_text, format!("<{STRONGS_COLOR}${{1}}{END_COLOR}>"))
                    .into_owned();
            }
            if opts.morph {
                verse_text = COLORED_MORPH
                    .replace_all(&verse_text, format!("{{{MORPH_COLOR}${{1}}{END_COLOR}}}"))
                    .into_owned();
            }
        }

        if opts.color_level >= 3 && !self.regx_list.is_empty() {
            verse_text = highlight_search_terms(&verse_text, &self.regx_list);
        }

        verse_text
    }
}

impl<'a, I> Iterator for VerseRenderer<'a, I>
where
    I: Iterator<Item = VerseRef>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let reference = self.refs.next()?;
        Some(self.render_one(reference))
    }
}

/// Greedy word wrap that never breaks inside a word.
fn fill(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.len() + 1 + word.len() <= width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

fn term_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.parse().ok())
        .unwrap_or(80)
}
