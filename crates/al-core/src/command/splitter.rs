/// Conjunction markers that separate independent sub-commands.
const CONJUNCTIONS: [&str; 2] = ["and", "then"];

/// Split a normalized utterance into independent fragments on word-boundary
/// `and` / `then` markers. The markers and empty fragments are discarded;
/// fragment order equals left-to-right order of appearance, which later
/// processing relies on (a fragment may read context set by an earlier one).
pub fn split(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if CONJUNCTIONS.contains(&token) {
            if !current.is_empty() {
                fragments.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        fragments.push(current.join(" "));
    }

    fragments
}
