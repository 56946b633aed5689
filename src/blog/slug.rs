use regex::Regex;
use std::sync::LazyLock;

// Anchored at the end so only the final extension counts.
static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Za-z0-9_-]+)\.(?:svelte\.md|md|svx)$").expect("slug pattern is valid")
});

/// Extracts the post slug from a source path.
///
/// The slug is the run of word or hyphen characters immediately before a
/// trailing `.md`, `.svelte.md` or `.svx` extension (case-insensitive).
/// Returns `None` for any other path.
pub fn extract_slug(path: &str) -> Option<&str> {
    SLUG_PATTERN
        .captures(path)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::extract_slug;

    #[test]
    fn test_recognized_extensions() {
        assert_eq!(extract_slug("/src/blogposts/hello-world.md"), Some("hello-world"));
        assert_eq!(extract_slug("/src/blogposts/hello_world.svx"), Some("hello_world"));
        assert_eq!(extract_slug("/src/blogposts/component.svelte.md"), Some("component"));
        assert_eq!(extract_slug("2023-01-01-a.md"), Some("2023-01-01-a"));
    }

    #[test]
    fn test_case_insensitive_extension() {
        assert_eq!(extract_slug("posts/LOUD.MD"), Some("LOUD"));
        assert_eq!(extract_slug("posts/Mixed.Svelte.Md"), Some("Mixed"));
        assert_eq!(extract_slug("posts/x.SVX"), Some("x"));
    }

    #[test]
    fn test_last_extension_wins() {
        assert_eq!(extract_slug("notes/archive.md.svx"), Some("md"));
        assert_eq!(extract_slug("notes/my.post.md"), Some("post"));
        assert_eq!(extract_slug("a.svx/b.md"), Some("b"));
    }

    #[test]
    fn test_unrecognized_paths() {
        assert_eq!(extract_slug("posts/readme.txt"), None);
        assert_eq!(extract_slug("posts/draft.mdx"), None);
        assert_eq!(extract_slug("posts/page.svelte"), None);
        assert_eq!(extract_slug("posts/.md"), None);
        assert_eq!(extract_slug(""), None);
    }

    #[test]
    fn test_windows_separators() {
        assert_eq!(extract_slug(r"C:\site\blogposts\first-post.md"), Some("first-post"));
    }
}
