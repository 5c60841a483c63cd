use crate::engine::ResultBatch;

/// Append-only accumulator of finalized transcript segments
///
/// Interim results never enter the buffer; it only grows, and only
/// `clear()` (driven by reset or a language change) empties it.
#[derive(Debug, Default, Clone)]
pub struct TranscriptBuffer {
    segments: Vec<String>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finalized segment
    pub fn append(&mut self, segment: String) {
        self.segments.push(segment);
    }

    /// The full transcript as the UI shows it: segments joined with no
    /// separator (finalized segments carry their own leading whitespace)
    pub fn text(&self) -> String {
        self.segments.concat()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total transcript length in characters
    pub fn char_count(&self) -> usize {
        self.segments.iter().map(|s| s.chars().count()).sum()
    }
}

/// Replace the spoken word "period" (case-insensitive, whole word) with "."
///
/// Dictation convenience: "i went home period" becomes "i went home .".
/// Word-boundary matching keeps "periodic" intact.
pub fn normalize_dictation(text: &str) -> String {
    const WORD: &[char] = &['p', 'e', 'r', 'i', 'o', 'd'];

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if word_at(&chars, i, WORD) {
            out.push('.');
            i += WORD.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

fn word_at(chars: &[char], at: usize, word: &[char]) -> bool {
    if at + word.len() > chars.len() {
        return false;
    }

    let matches = chars[at..at + word.len()]
        .iter()
        .zip(word)
        .all(|(c, w)| c.to_ascii_lowercase() == *w);
    if !matches {
        return false;
    }

    let boundary_before = at == 0 || !chars[at - 1].is_alphanumeric();
    let end = at + word.len();
    let boundary_after = end == chars.len() || !chars[end].is_alphanumeric();

    boundary_before && boundary_after
}

/// Collect the finalized text a batch contributes to the transcript
///
/// Takes only results at or after the resume cursor that are flagged final,
/// extracts each one's top hypothesis, applies the dictation normalization,
/// and concatenates them in index order. Returns `None` when the batch holds
/// no finalized text, in which case nothing is appended and no transcript
/// update fires.
pub fn finalized_text(batch: &ResultBatch) -> Option<String> {
    let mut out = String::new();

    for result in batch.new_results() {
        if !result.is_final {
            continue;
        }

        if let Some(best) = result.top() {
            out.push_str(&normalize_dictation(&best.transcript));
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
