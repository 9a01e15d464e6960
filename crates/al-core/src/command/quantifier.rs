/// Upper bound for repetition counts. Protects against runaway repeated
/// side effects, e.g. spamming a media transport command.
pub const MAX_REPEAT: u32 = 10;

const NUMBER_WORDS: [(&str, u32); 5] = [
    ("once", 1),
    ("twice", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
];

/// Extract a repetition count from a fragment.
///
/// Scans tokens left to right; the first token that is a digit sequence or a
/// number word is removed from the text and becomes the count, clamped to
/// `[1, MAX_REPEAT]`. Only one quantifier is ever recognized. Without a
/// quantifier the text is returned unchanged with a count of 1.
pub fn extract_count(text: &str) -> (String, u32) {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    for (index, token) in tokens.iter().enumerate() {
        if let Some(count) = parse_quantifier(token) {
            let mut rest = tokens.clone();
            rest.remove(index);
            return (rest.join(" "), count.clamp(1, MAX_REPEAT));
        }
    }

    (text.to_string(), 1)
}

fn parse_quantifier(token: &str) -> Option<u32> {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        // Absurdly long digit runs overflow the parse; the clamp applies
        // either way.
        let value = token.parse::<u64>().unwrap_or(u64::from(MAX_REPEAT));
        return Some(value.min(u64::from(MAX_REPEAT)) as u32);
    }
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, count)| *count)
}
