//! Stroke icons drawn on a 24×24 grid.

use marginalia_core::html::{Element, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Copy,
    Check,
    Maximize,
    Expand,
    Close,
    ExternalLink,
}

impl Icon {
    /// The SVG children of this icon.
    fn body(self) -> &'static str {
        match self {
            Self::Copy => {
                r#"<rect width="14" height="14" x="8" y="8" rx="2" ry="2"/><path d="M4 16c-1.1 0-2-.9-2-2V4c0-1.1.9-2 2-2h10c1.1 0 2 .9 2 2"/>"#
            }
            Self::Check => r#"<path d="M20 6 9 17l-5-5"/>"#,
            Self::Maximize => {
                r#"<polyline points="15 3 21 3 21 9"/><polyline points="9 21 3 21 3 15"/><line x1="21" x2="14" y1="3" y2="10"/><line x1="3" x2="10" y1="21" y2="14"/>"#
            }
            Self::Expand => {
                r#"<path d="m21 21-6-6m6 6v-4.8m0 4.8h-4.8"/><path d="M3 16.2V21m0 0h4.8M3 21l6-6"/><path d="M21 7.8V3m0 0h-4.8M21 3l-6 6"/><path d="M3 7.8V3m0 0h4.8M3 3l6 6"/>"#
            }
            Self::Close => r#"<path d="M18 6 6 18"/><path d="m6 6 12 12"/>"#,
            Self::ExternalLink => {
                r#"<path d="M10 6H6a2 2 0 00-2 2v10a2 2 0 002 2h10a2 2 0 002-2v-4M14 4h6m0 0v6m0-6L10 14"/>"#
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Check => "check",
            Self::Maximize => "maximize",
            Self::Expand => "expand",
            Self::Close => "close",
            Self::ExternalLink => "external-link",
        }
    }

    /// Renders the icon as an inline `<svg>` element.
    pub fn to_element(self, class: &str) -> Element {
        Element::new("svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_class(class)
            .with_attr("data-icon", self.name())
            .with_attr("viewBox", "0 0 24 24")
            .with_attr("fill", "none")
            .with_attr("stroke", "currentColor")
            .with_attr("stroke-width", "2")
            .with_attr("stroke-linecap", "round")
            .with_attr("stroke-linejoin", "round")
            .with_attr("aria-hidden", "true")
            .with_child(Markup::raw(self.body()))
    }
}
