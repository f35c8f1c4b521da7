//! Simple selector matching.
//!
//! Only the subset the template prototypes need is supported: a compound of
//! an optional tag name, any number of `.class` parts and at most one `#id`
//! (`input`, `#field`, `.card-body`, `div.row.col#main`). Combinators,
//! attribute selectors and pseudo-classes are not recognised; a selector
//! containing them parses as `None` and matches nothing.

/// A parsed compound selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a compound selector. Returns `None` for an empty or unsupported
    /// selector.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut selector = Self::default();
        let mut rest = input;

        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        if tag_end > 0 {
            let tag = &rest[..tag_end];
            if !is_ident(tag) {
                return None;
            }
            selector.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let part = &body[..end];
            if !is_ident(part) {
                return None;
            }
            match marker {
                '.' => selector.classes.push(part.to_string()),
                '#' if selector.id.is_none() => selector.id = Some(part.to_string()),
                _ => return None,
            }
            rest = &body[end..];
        }

        Some(selector)
    }

    /// Whether an element with these properties matches the selector.
    #[must_use]
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(want) = &self.tag
            && want != tag
        {
            return false;
        }
        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| classes.contains(c))
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
