/// Minimum normalized similarity for an approximate alias match. Chosen to
/// absorb single-character typos without merging distinct short names.
pub const SIMILARITY_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone)]
struct AliasEntry {
    alias: String,
    canonical: String,
}

/// Resolves informal application/service names to canonical names.
///
/// Exact alias lookup first, then the most similar alias key above
/// [`SIMILARITY_THRESHOLD`] (ties broken by registration order), then the
/// input itself, title-cased. Tables are tens of entries, so a linear scan
/// is plenty for interactive use.
pub struct EntityResolver {
    entries: Vec<AliasEntry>,
}

impl EntityResolver {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register an alias. The alias key is lowercased at registration; the
    /// canonical name is kept verbatim.
    pub fn register(&mut self, alias: &str, canonical: &str) {
        self.entries.push(AliasEntry {
            alias: alias.to_lowercase(),
            canonical: canonical.to_string(),
        });
    }

    pub fn resolve(&self, name: &str) -> String {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return String::new();
        }

        for entry in &self.entries {
            if entry.alias == needle {
                return entry.canonical.clone();
            }
        }

        let mut best: Option<(&AliasEntry, f64)> = None;
        for entry in &self.entries {
            let score = strsim::normalized_levenshtein(&needle, &entry.alias);
            // Strict comparison keeps the first-registered entry on ties.
            if score >= SIMILARITY_THRESHOLD
                && best.map(|(_, existing)| score > existing).unwrap_or(true)
            {
                best = Some((entry, score));
            }
        }
        if let Some((entry, _)) = best {
            return entry.canonical.clone();
        }

        title_case(&needle)
    }
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> EntityResolver {
        let mut resolver = EntityResolver::new();
        resolver.register("chrome", "Google Chrome");
        resolver.register("brave", "Brave Browser");
        resolver.register("spotify", "Spotify");
        resolver
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("chrome"), "Google Chrome");
        assert_eq!(resolver.resolve("Chrome"), "Google Chrome");
        assert_eq!(resolver.resolve("  SPOTIFY "), "Spotify");
    }

    #[test]
    fn single_typo_resolves_fuzzily() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("chrom"), "Google Chrome");
        assert_eq!(resolver.resolve("spotfy"), "Spotify");
    }

    #[test]
    fn unmatched_name_is_title_cased() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("notepad"), "Notepad");
        assert_eq!(resolver.resolve("visual studio code"), "Visual Studio Code");
    }

    #[test]
    fn ties_keep_first_registered() {
        let mut resolver = EntityResolver::new();
        resolver.register("noteo", "First");
        resolver.register("notea", "Second");
        // "notes" is equidistant from both keys; the first one wins.
        assert_eq!(resolver.resolve("notes"), "First");
    }

    #[test]
    fn short_names_do_not_false_merge() {
        let mut resolver = EntityResolver::new();
        resolver.register("brave", "Brave Browser");
        // One substitution in a five-letter word scores 0.8, above the
        // threshold; two substitutions score 0.6 and must not match.
        assert_eq!(resolver.resolve("grove"), "Grove");
    }

    #[test]
    fn empty_input_resolves_to_empty() {
        assert_eq!(resolver().resolve("   "), "");
    }
}
