use std::collections::{HashMap, HashSet};

/// Base used when heading text slugifies to nothing.
const EMPTY_SLUG_BASE: &str = "section";

/// Extracts a `{#custom-id}` suffix from heading text.
///
/// If the text ends with `{#some-id}` (where the id contains ASCII alphanumerics,
/// hyphens, or underscores), returns the trimmed text without the suffix and `Some(id)`.
/// Otherwise returns the original text and `None`.
///
/// # Examples
///
/// ```
/// use phosphor_core::slug::extract_custom_id;
///
/// let (text, id) = extract_custom_id("My Heading {#my-heading}");
/// assert_eq!(text, "My Heading");
/// assert_eq!(id, Some("my-heading"));
///
/// let (text, id) = extract_custom_id("Plain heading");
/// assert_eq!(text, "Plain heading");
/// assert_eq!(id, None);
/// ```
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    if !trimmed.ends_with('}') {
        return (text, None);
    }

    if let Some(open) = trimmed.rfind("{#") {
        let id = &trimmed[open + 2..trimmed.len() - 1];

        if !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            let before = trimmed[..open].trim_end();
            return (before, Some(id));
        }
    }

    (text, None)
}

/// Converts text to a URL-safe slug.
///
/// Lowercases, keeps runs of ASCII `[a-z0-9]`, joins runs with single
/// hyphens, and drops everything else. The result never starts or ends
/// with a hyphen, so `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(lower);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Allocates unique heading ids within one document.
///
/// The first occurrence of a base slug is returned unchanged; later ones get
/// `-2`, `-3`, ... in encounter order. A candidate that is already taken
/// (for example by a custom id) is skipped.
#[derive(Debug, Default)]
pub struct HeadingIds {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl HeadingIds {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id for the given heading text.
    pub fn next_id(&mut self, text: &str) -> String {
        let base = slugify(text);
        if base.is_empty() {
            self.allocate(EMPTY_SLUG_BASE)
        } else {
            self.allocate(&base)
        }
    }

    /// Allocates a unique id derived from an already-slugged base.
    pub fn allocate(&mut self, base: &str) -> String {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = if *count == 1 {
                base.to_string()
            } else {
                format!("{}-{}", base, count)
            };
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Reserves an explicit id so auto-generated ids never collide with it.
    ///
    /// Returns false if the id was already in use.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.used.insert(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ascii_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn punctuation_runs_collapse() {
        assert_eq!(slugify("  a---b  "), "a-b");
        assert_eq!(slugify("import.meta.glob"), "import-meta-glob");
        assert_eq!(slugify("TypeScript & JSX"), "typescript-jsx");
        assert_eq!(slugify("getStaticPaths()"), "getstaticpaths");
        assert_eq!(slugify("<Image />"), "image");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(slugify("Héllo Wörld"), "h-llo-w-rld");
        assert_eq!(slugify("🚀 Getting Started"), "getting-started");
        assert_eq!(slugify("多言語"), "");
    }

    #[test]
    fn deduplication() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.next_id("Overview"), "overview");
        assert_eq!(ids.next_id("Overview"), "overview-2");
        assert_eq!(ids.next_id("Overview"), "overview-3");
    }

    #[test]
    fn suffix_skips_taken_candidate() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.next_id("Step 2"), "step-2");
        assert_eq!(ids.next_id("Step"), "step");
        assert_eq!(ids.next_id("Step"), "step-3");
    }

    #[test]
    fn empty_slug_uses_fallback_base() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.next_id("???"), "section");
        assert_eq!(ids.next_id("!!!"), "section-2");
    }

    #[test]
    fn reserve_prevents_collision() {
        let mut ids = HeadingIds::new();
        assert!(ids.reserve("intro"));
        assert!(!ids.reserve("intro"));
        assert_eq!(ids.next_id("Intro"), "intro-2");
        assert!(!ids.reserve("intro-2"));
    }

    #[test]
    fn extract_custom_id_basic() {
        let (text, id) = extract_custom_id("My Heading {#my-heading}  ");
        assert_eq!(text, "My Heading");
        assert_eq!(id, Some("my-heading"));
    }

    #[test]
    fn extract_custom_id_rejects_invalid() {
        let (text, id) = extract_custom_id("Title {#bad id}");
        assert_eq!(text, "Title {#bad id}");
        assert_eq!(id, None);

        let (text, id) = extract_custom_id("Title {#}");
        assert_eq!(text, "Title {#}");
        assert_eq!(id, None);
    }

    proptest! {
        #[test]
        fn prop_slugify_is_idempotent(text in "\\PC{0,40}") {
            let once = slugify(&text);
            prop_assert_eq!(slugify(&once), once.clone());
            prop_assert!(!once.starts_with('-') && !once.ends_with('-'));
            prop_assert!(!once.contains("--"));
        }

        #[test]
        fn prop_allocated_ids_are_unique(titles in prop::collection::vec("[a-c ]{0,4}", 1..30)) {
            let mut ids = HeadingIds::new();
            let mut seen = HashSet::new();
            for title in &titles {
                prop_assert!(seen.insert(ids.next_id(title)));
            }
        }
    }
}
