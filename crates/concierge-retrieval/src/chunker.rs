//! Paragraph-aligned chunking for ingestion.

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Paragraphs (separated by blank lines) are packed greedily. A paragraph
/// that alone exceeds the bound is split on whitespace, and a single word
/// longer than the bound is split on character boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        for piece in split_oversized(paragraph, max_chars) {
            let needed = if current.is_empty() {
                char_len(&piece)
            } else {
                char_len(&current) + 2 + char_len(&piece)
            };
            if needed > max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_oversized(paragraph: &str, max_chars: usize) -> Vec<String> {
    if char_len(paragraph) <= max_chars {
        return vec![paragraph.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        for part in split_word(word, max_chars) {
            let needed = if current.is_empty() {
                char_len(part)
            } else {
                char_len(&current) + 1 + char_len(part)
            };
            if needed > max_chars && !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(part);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn split_word(word: &str, max_chars: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = word;
    while char_len(rest) > max_chars {
        let cut = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(cut);
        parts.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_paragraphs_share_a_chunk() {
        let chunks = chunk_text("First.\n\nSecond.", 700);
        assert_eq!(chunks, vec!["First.\n\nSecond."]);
    }

    #[test]
    fn paragraphs_start_a_new_chunk_when_full() {
        let a = "a".repeat(400);
        let b = "b".repeat(400);
        let chunks = chunk_text(&format!("{a}\n\n{b}"), 700);
        assert_eq!(chunks, vec![a, b]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(chunk_text("  \n\n \n\n", 700).is_empty());
    }

    #[test]
    fn long_paragraph_is_split_on_words() {
        let text = "word ".repeat(300);
        let chunks = chunk_text(&text, 100);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
        assert!(chunks.iter().all(|c| !c.starts_with(' ') && !c.ends_with(' ')));
    }

    fn visible(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    proptest! {
        #[test]
        fn chunks_respect_the_bound_and_keep_every_character(
            text in "[a-zé \n]{0,600}",
            max in 1usize..120,
        ) {
            let chunks = chunk_text(&text, max);
            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.chars().count() <= max);
            }
            let rejoined: String = chunks.iter().map(|c| visible(c)).collect();
            prop_assert_eq!(rejoined, visible(&text));
        }
    }
}
