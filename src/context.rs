use crate::canon;
use crate::verse::VerseRef;
use std::collections::{BTreeSet, HashSet};

/// Expand a hit set with `window` verses of context on each side.
///
/// Every hit contributes its `window` canonical predecessors and
/// successors, clipped at the ends of the canon.  The result is
/// deduplicated and sorted canonically; a window of zero just sorts the
/// hits.
pub fn add_context(refs: &HashSet<VerseRef>, window: u32) -> Vec<VerseRef> {
    let mut expanded: BTreeSet<VerseRef> = refs.iter().copied().collect();

    if window > 0 {
        for reference in refs {
            let offset = reference.offset();
            let start = offset.saturating_sub(window);
            let end = (offset + window).min(canon::verse_total() - 1);
            for context_offset in start..=end {
                expanded.insert(VerseRef::from_offset(context_offset));
            }
        }
    }

    expanded.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn hits(refs: &[&str]) -> HashSet<VerseRef> {
        refs.iter()
            .map(|r| VerseRef::from_str(r).unwrap())
            .collect()
    }

    #[test]
    fn zero_window_sorts_hits() {
        let set = hits(&["John 3:16", "Genesis 1:1", "Psalms 23:1"]);
        let expanded = add_context(&set, 0);
        let shown: Vec<String> = expanded.iter().map(VerseRef::to_string).collect();
        assert_eq!(shown, ["Genesis 1:1", "Psalms 23:1", "John 3:16"]);
    }

    #[test]
    fn window_two_adds_both_neighbors() {
        let set = hits(&["John 3:16"]);
        let expanded = add_context(&set, 2);
        let shown: Vec<String> = expanded.iter().map(VerseRef::to_string).collect();
        assert_eq!(
            shown,
            ["John 3:14", "John 3:15", "John 3:16", "John 3:17", "John 3:18"]
        );
    }

    #[test]
    fn overlapping_hits_deduplicate() {
        let set = hits(&["John 3:16", "John 3:18"]);
        let expanded = add_context(&set, 2);
        assert_eq!(expanded.len(), 7);
        let unique: BTreeSet<&VerseRef> = expanded.iter().collect();
        assert_eq!(unique.len(), expanded.len());
    }

    #[test]
    fn clipped_at_canon_start() {
        let set = hits(&["Genesis 1:1"]);
        let expanded = add_context(&set, 3);
        let shown: Vec<String> = expanded.iter().map(VerseRef::to_string).collect();
        assert_eq!(
            shown,
            ["Genesis 1:1", "Genesis 1:2", "Genesis 1:3", "Genesis 1:4"]
        );
    }

    #[test]
    fn clipped_at_canon_end() {
        let set = hits(&["Revelation of John 22:21"]);
        let expanded = add_context(&set, 2);
        let shown: Vec<String> = expanded.iter().map(VerseRef::to_string).collect();
        assert_eq!(
            shown,
            [
                "Revelation of John 22:19",
                "Revelation of John 22:20",
                "Revelation of John 22:21"
            ]
        );
    }

    #[test]
    fn direct_hits_always_kept() {
        let set = hits(&["Genesis 1:5", "Malachi 4:6"]);
        let expanded = add_context(&set, 1);
        for hit in &set {
            assert!(expanded.contains(hit));
        }
    }

    proptest! {
        // Expansion never panics, never loses a hit, and always stays
        // sorted and unique, no matter where in the canon the hit lands.
        #[test]
        fn expansion_is_total(offset in 0u32..31102, window in 0u32..10) {
            let mut set = HashSet::new();
            set.insert(VerseRef::from_offset(offset));
            let expanded = add_context(&set, window);

            prop_assert!(expanded.contains(&VerseRef::from_offset(offset)));
            prop_assert!(expanded.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert!(expanded.len() as u32 <= 2 * window + 1);
        }
    }
}
