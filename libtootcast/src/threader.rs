//! Content threading
//!
//! Splits long content into an ordered sequence of pages that each fit a
//! character budget, preferring natural boundaries: a paragraph break near
//! the end of the page wins over a sentence break, which wins over a plain
//! word break. Pagination footers (`"2/5"`) are a separate, later step so
//! that callers decide when a sequence actually becomes a thread.
//!
//! Everything here is a pure function over in-memory text. Input is
//! validated non-empty before it reaches this module, so none of these
//! functions has an error path.

/// Default per-post character budget.
pub const DEFAULT_MAX_CHARS: usize = 500;

/// Sentence terminators recognized by the sentence-break scan.
const SENTENCE_ENDS: [&str; 3] = [". ", "! ", "? "];

/// Split `text` into pages of at most `max_chars` characters each.
///
/// The split position is chosen by scanning the first `max_chars` characters
/// of the remaining text (the candidate window):
///
/// 1. the last line break, when it falls in the final 30% of the window;
/// 2. otherwise the rightmost sentence terminator (`". "`, `"! "`, `"? "`),
///    when it falls in the final 20% of the window;
/// 3. otherwise the rightmost space.
///
/// The chosen delimiter is consumed into the emitted page rather than left
/// dangling at the head of the next one. A window containing no delimiter at
/// all (one unbroken token wider than the budget) is cut at the window edge.
/// Pages come back trimmed; concatenating them in order reproduces the
/// trimmed input up to whitespace at the joins.
///
/// All indices are character indices, not byte offsets; the budget applies
/// to what the instance counts, not to UTF-8 length.
pub fn threadify(text: &str, max_chars: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut rest = text.trim();

    while rest.chars().count() >= max_chars {
        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(offset, _)| offset);
        let window = &rest[..window_end];
        let cut = split_point(window, max_chars);

        let page = window[..cut].trim();
        if !page.is_empty() {
            pages.push(page.to_string());
        }
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() || pages.is_empty() {
        pages.push(rest.to_string());
    }

    pages
}

/// Byte offset in `window` one character past the chosen delimiter.
fn split_point(window: &str, max_chars: usize) -> usize {
    // 70%/80% thresholds with floor semantics
    let paragraph_floor = max_chars * 7 / 10;
    let sentence_floor = max_chars * 8 / 10;

    if let Some(pos) = window.rfind('\n') {
        if char_index(window, pos) >= paragraph_floor {
            return pos + 1;
        }
    }

    let sentence = SENTENCE_ENDS
        .iter()
        .filter_map(|end| window.rfind(*end))
        .max();
    if let Some(pos) = sentence {
        if char_index(window, pos) >= sentence_floor {
            // one past the terminator itself; the following space is
            // trimmed off the head of the next page
            return pos + 1;
        }
    }

    if let Some(pos) = window.rfind(' ') {
        return pos + 1;
    }

    // one unbroken token wider than the page: cut at the window edge
    window.len()
}

/// Character index of byte offset `pos` within `window`.
fn char_index(window: &str, pos: usize) -> usize {
    window[..pos].chars().count()
}

/// Append `"{n}/{total}"` footers when the sequence actually threads.
///
/// Footers ride after a line break and are added after splitting, so a
/// full-width page grows past `max_chars` once annotated. A single page
/// passes through untouched.
pub fn paginate(pages: Vec<String>) -> Vec<String> {
    let total = pages.len();
    if total < 2 {
        return pages;
    }
    pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| format!("{}\n{}/{}", page, index + 1, total))
        .collect()
}

/// Turn gathered content segments into the final page sequence.
///
/// A single segment is split against `max_chars`; multiple segments are
/// taken one-per-page verbatim, however long each one is. Footers are added
/// in both cases whenever more than one page results.
pub fn thread_content(segments: &[String], max_chars: usize) -> Vec<String> {
    let pages = match segments {
        [single] => threadify(single, max_chars),
        many => many.iter().map(|s| s.trim().to_string()).collect(),
    };
    paginate(pages)
}
