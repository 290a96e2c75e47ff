use crate::canon::{self, BOOKS, BOOK_OFFSETS, CHAPTER_OFFSETS, VERSE_COUNTS};
use crate::error::{Result, VersegrepError};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // Matches "II Samuel 2:14", "gen 1", "John" and similar fragments.
    static ref REF_REGX: Regex = Regex::new(
        r"(?ix)
        \b(?P<book>(?:I{1,3}\s|[1-3]\s?)?[A-Za-z][A-Za-z\x20]*?)
        \s*
        (?P<chap>\d{0,3})
        (?:\s*:\s*(?P<verse>\d{1,3}))?
        \s*$"
    )
    .unwrap();
}

/// A single verse reference, ordered canonically.
///
/// Ordering is book order, then chapter, then verse, which matches the
/// verse-offset ordering used for iteration and context expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseRef {
    book: u8,
    chapter: u16,
    verse: u16,
}

impl VerseRef {
    /// First verse of the canon.
    pub fn first() -> Self {
        VerseRef { book: 0, chapter: 1, verse: 1 }
    }

    /// Last verse of the canon.
    pub fn last() -> Self {
        Self::from_offset(canon::verse_total() - 1)
    }

    /// Build a reference, clamping the chapter and verse into the valid
    /// range for the book.
    pub fn new(book: usize, chapter: u16, verse: u16) -> Self {
        let book = book.min(BOOKS.len() - 1);
        let chapters = VERSE_COUNTS[book];
        let chapter = chapter.clamp(1, chapters.len() as u16);
        let verse = verse.clamp(1, chapters[chapter as usize - 1]);
        VerseRef { book: book as u8, chapter, verse }
    }

    /// Offset of this verse from the start of the canon.
    pub fn offset(&self) -> u32 {
        let chapter_index = BOOK_OFFSETS[self.book as usize] + self.chapter as u32 - 1;
        CHAPTER_OFFSETS[chapter_index as usize] + self.verse as u32 - 1
    }

    /// The reference at the given canon offset, clamped to the canon.
    pub fn from_offset(offset: u32) -> Self {
        let offset = offset.min(canon::verse_total() - 1);
        // partition_point returns the count of chapters starting at or
        // before offset, so the containing chapter is one less.
        let chapter_index = CHAPTER_OFFSETS.partition_point(|&o| o <= offset) - 1;
        let book = BOOK_OFFSETS.partition_point(|&o| o <= chapter_index as u32) - 1;
        let chapter = chapter_index as u32 - BOOK_OFFSETS[book] + 1;
        let verse = offset - CHAPTER_OFFSETS[chapter_index] + 1;
        VerseRef {
            book: book as u8,
            chapter: chapter as u16,
            verse: verse as u16,
        }
    }

    /// The next verse, saturating at the end of the canon.
    pub fn next(&self) -> Self {
        Self::from_offset((self.offset() + 1).min(canon::verse_total() - 1))
    }

    /// The previous verse, saturating at Genesis 1:1.
    pub fn prev(&self) -> Self {
        Self::from_offset(self.offset().saturating_sub(1))
    }

    pub fn book_name(&self) -> &'static str {
        BOOKS[self.book as usize].name
    }

    pub fn book_index(&self) -> usize {
        self.book as usize
    }

    pub fn chapter(&self) -> u16 {
        self.chapter
    }

    pub fn verse(&self) -> u16 {
        self.verse
    }

    /// Last verse of this reference's chapter.
    pub fn chapter_end(&self) -> Self {
        VerseRef {
            book: self.book,
            chapter: self.chapter,
            verse: VERSE_COUNTS[self.book as usize][self.chapter as usize - 1],
        }
    }

    /// Last verse of this reference's book.
    pub fn book_end(&self) -> Self {
        let chapters = VERSE_COUNTS[self.book as usize];
        VerseRef {
            book: self.book,
            chapter: chapters.len() as u16,
            verse: chapters[chapters.len() - 1],
        }
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book_name(), self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = VersegrepError;

    fn from_str(reference: &str) -> Result<Self> {
        let caps = REF_REGX
            .captures(reference.trim())
            .ok_or_else(|| VersegrepError::InvalidReference(reference.to_string()))?;
        let book = canon::book_index(&caps["book"])
            .ok_or_else(|| VersegrepError::InvalidReference(reference.to_string()))?;
        let chapter = caps["chap"].parse::<u16>().unwrap_or(1).max(1);
        let verse = caps
            .name("verse")
            .map(|m| m.as_str().parse::<u16>().unwrap_or(1))
            .unwrap_or(1)
            .max(1);
        Ok(VerseRef::new(book, chapter, verse))
    }
}

/// Iterator over an inclusive range of verse references in canon order.
pub struct VerseIter {
    next: u32,
    end: u32,
}

impl VerseIter {
    pub fn new(start: VerseRef, end: VerseRef) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        VerseIter { next: start.offset(), end: end.offset() }
    }

    /// Iterate the entire canon.
    pub fn all() -> Self {
        VerseIter::new(VerseRef::first(), VerseRef::last())
    }
}

impl Iterator for VerseIter {
    type Item = VerseRef;

    fn next(&mut self) -> Option<VerseRef> {
        if self.next > self.end {
            return None;
        }
        let item = VerseRef::from_offset(self.next);
        self.next += 1;
        Some(item)
    }
}

/// Parse a reference list such as "gen1:3-8, John 3:16" into the set of
/// verses it covers.
///
/// A bare book expands to the whole book, a book and chapter to the whole
/// chapter, and "A-B" spans expand between the two endpoints.  An empty
/// string yields an empty set.
pub fn parse_verse_range(ref_str: &str) -> Result<BTreeSet<VerseRef>> {
    let mut verse_set = BTreeSet::new();

    for part in ref_str.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (start_str, end_str) = match part.split_once('-') {
            Some((start, end)) => (start.trim(), Some(end.trim())),
            None => (part, None),
        };

        let (start, whole) = parse_endpoint(start_str)?;
        let end = match end_str {
            None => match whole {
                Expand::Verse => start,
                Expand::Chapter => start.chapter_end(),
                Expand::Book => start.book_end(),
            },
            Some(end_str) => {
                // A bare number on the right is relative to the left
                // endpoint: a verse when the left named one, otherwise a
                // chapter.
                if let Ok(number) = end_str.parse::<u16>() {
                    match whole {
                        Expand::Verse => {
                            VerseRef::new(start.book_index(), start.chapter(), number)
                        }
                        _ => VerseRef::new(start.book_index(), number, 1).chapter_end(),
                    }
                } else {
                    let (end, end_whole) = parse_endpoint(end_str)?;
                    match end_whole {
                        Expand::Verse => end,
                        Expand::Chapter => end.chapter_end(),
                        Expand::Book => end.book_end(),
                    }
                }
            }
        };

        verse_set.extend(VerseIter::new(start, end));
    }

    Ok(verse_set)
}

enum Expand {
    Verse,
    Chapter,
    Book,
}

fn parse_endpoint(reference: &str) -> Result<(VerseRef, Expand)> {
    let caps = REF_REGX
        .captures(reference)
        .ok_or_else(|| VersegrepError::InvalidReference(reference.to_string()))?;
    let book = canon::book_index(&caps["book"])
        .ok_or_else(|| VersegrepError::InvalidReference(reference.to_string()))?;
    let chapter = caps["chap"].parse::<u16>().ok();
    let verse = caps.name("verse").and_then(|m| m.as_str().parse::<u16>().ok());

    match (chapter, verse) {
        (Some(chapter), Some(verse)) => {
            Ok((VerseRef::new(book, chapter, verse), Expand::Verse))
        }
        (Some(chapter), None) => Ok((VerseRef::new(book, chapter, 1), Expand::Chapter)),
        _ => Ok((VerseRef::new(book, 1, 1), Expand::Book)),
    }
}
