//! Small presentational building blocks shared by the block components.
//!
//! - [`Modal`] - open/close state of a fullscreen dialog plus its markup
//! - [`Clipboard`] and [`CopyFeedback`] - copy-to-clipboard with a timed acknowledgment
//! - [`Icon`] - inline SVG icons used on toolbar buttons

mod clipboard;
mod icons;
mod modal;

pub use clipboard::{Clipboard, ClipboardError, CopyFeedback, MemoryClipboard};
pub use icons::Icon;
pub use modal::Modal;

use marginalia_core::html::{Element, Markup};

/// A card container with the shared card chrome and extra classes.
pub fn card(class: &str) -> Element {
    Element::new("div").with_class(join_classes("marginalia-card", class))
}

/// A toolbar button that reports `action` to the host through `data-action`.
pub fn icon_button(action: &str, label: &str, icon: Icon) -> Element {
    Element::new("button")
        .with_attr("type", "button")
        .with_class("marginalia-button")
        .with_attr("data-action", action)
        .with_attr("aria-label", label)
        .with_attr("title", label)
        .with_child(icon.to_element("marginalia-icon"))
}

/// The copy-source button, showing the acknowledgment icon while `acknowledged`.
pub fn copy_button(acknowledged: bool) -> Element {
    let icon = if acknowledged { Icon::Check } else { Icon::Copy };
    icon_button("copy", "Copy source", icon)
}

/// A copy-source button carrying both icons with the check hidden, so a page
/// script can show the acknowledgment without a re-render.
pub fn swappable_copy_button() -> Element {
    icon_button("copy", "Copy source", Icon::Copy)
        .with_child(Icon::Check.to_element("marginalia-icon hidden"))
}

/// The fixed-format failure card: notice, detail, then the literal source.
pub fn error_card(notice: &str, detail: &str, source: &str) -> Element {
    card("marginalia-error-card")
        .with_attr("role", "alert")
        .with_child(
            Element::new("p")
                .with_class("marginalia-error-title")
                .with_child(Markup::text(notice)),
        )
        .with_child(
            Element::new("p")
                .with_class("marginalia-error-detail")
                .with_child(Markup::text(detail)),
        )
        .with_child(
            Element::new("pre")
                .with_class("marginalia-error-source")
                .with_child(Markup::text(source)),
        )
}

/// Joins two class lists, skipping an empty second list.
pub(crate) fn join_classes(base: &str, extra: &str) -> String {
    if extra.trim().is_empty() {
        base.to_string()
    } else {
        format!("{base} {}", extra.trim())
    }
}
