//! Splitting long text into message-sized frames

/// Split `text` into frames of at most `budget` characters
///
/// Length is counted in Unicode scalar values, so a frame never ends in the
/// middle of a multi-byte character. Blank or whitespace-only text yields no
/// frames. Concatenating the frames gives back `text` exactly.
pub fn split_frames(text: &str, budget: usize) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let budget = budget.max(1);
    let mut frames = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == budget {
            frames.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    frames.push(&text[start..]);

    frames
}
