//! Heading anchors compatible with the slugs GitHub generates.

use std::collections::HashMap;

use marginalia_core::html::{Element, Markup};

/// Lowercases `text`, keeps alphanumerics, `-` and `_`, turns spaces into
/// `-` and drops everything else.
pub fn slugify(text: &str) -> String {
    text.trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Generates unique slugs for one document.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    /// Slugs `text`, suffixing `-1`, `-2`, ... on repeats.
    ///
    /// A suffixed slug never collides with one handed out earlier, even when
    /// a heading's own text produces it.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();
        while self.occurrences.contains_key(&slug) {
            let count = self.occurrences.entry(base.clone()).or_default();
            *count += 1;
            slug = format!("{base}-{count}");
        }
        self.occurrences.insert(slug.clone(), 0);
        slug
    }
}

/// Wraps heading content in a link to the heading itself.
pub fn self_link(anchor: &str, children: Vec<Markup>) -> Element {
    Element::new("a")
        .with_attr("href", format!("#{anchor}"))
        .with_class("marginalia-anchor")
        .with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's `new`?"), "whats-new");
        assert_eq!(slugify("snake_case and-dash"), "snake_case-and-dash");
        assert_eq!(slugify("  Ünïcode Straße "), "ünïcode-straße");
        assert_eq!(slugify("1. Intro"), "1-intro");
    }

    #[test]
    fn test_repeats_are_suffixed() {
        let mut slugger = Slugger::default();
        assert_eq!(slugger.slug("A"), "a");
        assert_eq!(slugger.slug("A"), "a-1");
        assert_eq!(slugger.slug("A"), "a-2");
    }

    #[test]
    fn test_suffix_skips_taken_slugs() {
        let mut slugger = Slugger::default();
        assert_eq!(slugger.slug("a-1"), "a-1");
        assert_eq!(slugger.slug("a"), "a");
        assert_eq!(slugger.slug("a"), "a-2");
        assert_eq!(slugger.slug("a-1"), "a-1-1");
    }

    #[test]
    fn test_self_link() {
        let link = Markup::from(self_link("intro", vec![Markup::text("Intro")]));
        assert_eq!(
            link.to_html(),
            r##"<a href="#intro" class="marginalia-anchor">Intro</a>"##
        );
    }
}
