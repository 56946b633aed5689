use super::{error::BlogError, types::*};
use pulldown_cmark::{Options, Parser, html};

const TOML_FENCE: &str = "+++";
const YAML_FENCE: &str = "---";

/// Parses a post document: optional front matter followed by markdown.
pub fn parse_document(input: &str) -> Result<PostContent, BlogError> {
    let input = input.trim_start_matches('\u{feff}');
    let (metadata, markdown) = split_front_matter(input)?;

    Ok(PostContent {
        metadata,
        html_body: render_markdown(markdown),
    })
}

fn split_front_matter(input: &str) -> Result<(PostMetadata, &str), BlogError> {
    if opens_with(input, TOML_FENCE) {
        let (front, body) = fenced(input, TOML_FENCE).ok_or_else(|| {
            BlogError::InvalidFormat(format!(
                "Missing closing `{}` front matter delimiter",
                TOML_FENCE
            ))
        })?;
        let metadata: PostMetadata = toml_edit::de::from_str(front)?;
        return Ok((metadata, body));
    }

    // Without a closing fence a leading `---` is a thematic break.
    if let Some((front, body)) = fenced(input, YAML_FENCE) {
        let metadata: PostMetadata = if front.trim().is_empty() {
            PostMetadata::default()
        } else {
            serde_yaml::from_str(front)?
        };
        return Ok((metadata, body));
    }

    Ok((PostMetadata::default(), input))
}

fn is_fence_line(line: &str, fence: &str) -> bool {
    line.trim_end() == fence
}

fn opens_with(input: &str, fence: &str) -> bool {
    input
        .lines()
        .next()
        .is_some_and(|line| is_fence_line(line, fence))
}

/// Returns the text between an opening fence line and the next fence line,
/// plus everything after the closing fence. `None` unless both fences sit on
/// lines of their own.
fn fenced<'a>(input: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let (first, rest) = input.split_once('\n')?;
    if !is_fence_line(first, fence) {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence_line(line, fence) {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }

    None
}

pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_front_matter() {
        let post = parse_document(
            r#"+++
title = "First Post"
date = "2024-01-01"
summary = "The first one"
+++

# First Post

Hello."#,
        )
        .unwrap();

        assert_eq!(post.metadata.title, "First Post");
        assert_eq!(post.metadata.date, "2024-01-01");
        assert_eq!(post.metadata.summary.as_deref(), Some("The first one"));
        assert!(post.html_body.contains("<h1>First Post</h1>"));
        assert!(post.html_body.contains("<p>Hello.</p>"));
    }

    #[test]
    fn test_yaml_front_matter_keeps_extra_fields() {
        let post = parse_document(
            "---\ntitle: Svelte Things\ndate: 2023-06-01\ntags:\n  - svelte\n---\nBody text\n",
        )
        .unwrap();

        assert_eq!(post.metadata.title, "Svelte Things");
        assert_eq!(post.metadata.date, "2023-06-01");
        assert_eq!(
            post.metadata.extra.get("tags"),
            Some(&serde_json::json!(["svelte"]))
        );
        assert_eq!(post.html_body.trim(), "<p>Body text</p>");
    }

    #[test]
    fn test_document_without_front_matter() {
        let post = parse_document("Just *markdown*.").unwrap();
        assert_eq!(post.metadata, PostMetadata::default());
        assert_eq!(post.html_body.trim(), "<p>Just <em>markdown</em>.</p>");
    }

    #[test]
    fn test_unterminated_front_matter() {
        let result = parse_document("+++\ntitle = \"Broken\"\n\nno closing fence");
        assert!(matches!(result, Err(BlogError::InvalidFormat(_))));
    }

    #[test]
    fn test_invalid_front_matter() {
        let result = parse_document("+++\ntitle = \n+++\nbody");
        assert!(matches!(result, Err(BlogError::FrontMatter(_))));
    }

    #[test]
    fn test_horizontal_rule_in_body_is_not_a_fence() {
        let post = parse_document("---\ntitle: Rules\n---\nabove\n\n---\n\nbelow").unwrap();
        assert_eq!(post.metadata.title, "Rules");
        assert!(post.html_body.contains("<hr />"));
        assert!(post.html_body.contains("below"));
    }

    #[test]
    fn test_leading_horizontal_rule_without_front_matter() {
        let post = parse_document("---\n\nA post that opens with a rule.\n").unwrap();
        assert_eq!(post.metadata, PostMetadata::default());
        assert!(post.html_body.starts_with("<hr />"));
        assert!(post.html_body.contains("<p>A post that opens with a rule.</p>"));
    }

    #[test]
    fn test_fence_must_be_its_own_line() {
        let post = parse_document("---\ntitle: Dashes\n---- not a fence\n\nbody").unwrap();
        assert_eq!(post.metadata, PostMetadata::default());
        assert!(post.html_body.contains("body"));
    }

    #[test]
    fn test_empty_yaml_front_matter() {
        let post = parse_document("---\n---\nOnly body.").unwrap();
        assert_eq!(post.metadata, PostMetadata::default());
        assert_eq!(post.html_body.trim(), "<p>Only body.</p>");
    }
}
