//! Word-count-bounded text chunking.
//!
//! Chunks are non-overlapping windows of whitespace-delimited words with no
//! sentence-boundary awareness, trading semantic coherence for predictable
//! sizing.

/// A contiguous slice of whitespace-delimited words from the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub word_count: usize,
}

/// Split `text` into chunks of at most `words_per_chunk` words each.
///
/// The final chunk may be shorter. Empty input yields an empty vec. A zero
/// chunk size is clamped to 1 so the walk always makes progress.
#[must_use]
pub fn split_by_word_count(text: &str, words_per_chunk: usize) -> Vec<Chunk> {
    let words_per_chunk = words_per_chunk.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut chunks = Vec::with_capacity(words.len().div_ceil(words_per_chunk));
    for window in words.chunks(words_per_chunk) {
        let joined = window.join(" ");
        if joined.trim().is_empty() {
            continue;
        }
        chunks.push(Chunk {
            index: chunks.len(),
            text: joined,
            word_count: window.len(),
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_by_word_count("", 100).is_empty());
        assert!(split_by_word_count("   \n\t ", 100).is_empty());
    }

    #[test]
    fn single_chunk_when_under_limit() {
        let chunks = split_by_word_count("one two three", 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "one two three");
        assert_eq!(chunks[0].word_count, 3);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn two_hundred_fifty_words_at_one_hundred_per_chunk() {
        let text = (0..250).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = split_by_word_count(&text, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].word_count, 100);
        assert_eq!(chunks[1].word_count, 100);
        assert_eq!(chunks[2].word_count, 50);
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        let chunks = split_by_word_count("a  b\t\tc\n\nd", 2);
        assert_eq!(chunks[0].text, "a b");
        assert_eq!(chunks[1].text, "c d");
    }

    #[test]
    fn zero_chunk_size_clamped() {
        let chunks = split_by_word_count("a b c", 0);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn indices_are_sequential() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let chunks = split_by_word_count(&text, 7);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    mod proptest_chunker {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn word_sequence_preserved(
                text in "[a-z ]{0,2000}",
                words_per_chunk in 1usize..200,
            ) {
                let original: Vec<&str> = text.split_whitespace().collect();
                let chunks = split_by_word_count(&text, words_per_chunk);
                let rejoined: Vec<String> = chunks
                    .iter()
                    .flat_map(|c| c.text.split_whitespace().map(str::to_owned))
                    .collect();
                prop_assert_eq!(original, rejoined);
            }

            #[test]
            fn chunk_count_is_ceiling_division(
                text in "[a-z ]{1,2000}",
                words_per_chunk in 1usize..200,
            ) {
                let total_words = text.split_whitespace().count();
                let chunks = split_by_word_count(&text, words_per_chunk);
                prop_assert_eq!(chunks.len(), total_words.div_ceil(words_per_chunk));
            }

            #[test]
            fn no_chunk_exceeds_limit(
                text in "[a-z ]{0,2000}",
                words_per_chunk in 1usize..200,
            ) {
                for chunk in split_by_word_count(&text, words_per_chunk) {
                    prop_assert!(chunk.word_count <= words_per_chunk);
                    prop_assert!(!chunk.text.is_empty());
                    prop_assert_eq!(chunk.word_count, chunk.text.split_whitespace().count());
                }
            }
        }
    }
}
