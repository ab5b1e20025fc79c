//! Fullscreen dialog state and markup.

use marginalia_core::html::{Element, Markup};

use super::{Icon, icon_button, join_classes};

/// Open/close state of a fullscreen dialog.
///
/// The dialog owns whatever was rendered for it while open, so closing drops
/// that content together with the open flag.
#[derive(Debug, Clone)]
pub struct Modal<T> {
    title: String,
    content: Option<T>,
}

impl<T> Modal<T> {
    /// Creates a closed dialog.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Opens the dialog with `content`, replacing anything shown before.
    pub fn open(&mut self, content: T) {
        self.content = Some(content);
    }

    /// Closes the dialog, returning its content.
    pub fn close(&mut self) -> Option<T> {
        self.content.take()
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut T> {
        self.content.as_mut()
    }

    /// Renders the dialog around `body`, or `None` while closed.
    ///
    /// `id` must be unique in the document; it names the title element the
    /// dialog is labelled by.
    pub fn view(&self, id: &str, class: &str, body: Markup) -> Option<Element> {
        self.content.as_ref()?;
        Some(self.dialog(id, class, body, "open"))
    }

    /// Renders the dialog in its closed state, for a page script to reveal.
    ///
    /// The overlay carries `data-state="closed"` and is not displayed until
    /// the host flips it to `open`.
    pub fn view_closed(&self, id: &str, class: &str, body: Markup) -> Element {
        self.dialog(id, class, body, "closed")
    }

    fn dialog(&self, id: &str, class: &str, body: Markup, state: &str) -> Element {
        let title_id = format!("{id}-title");
        let header = Element::new("div")
            .with_class("marginalia-dialog-header")
            .with_child(
                Element::new("h2")
                    .with_attr("id", title_id.as_str())
                    .with_class("marginalia-dialog-title")
                    .with_child(Markup::text(self.title.as_str())),
            )
            .with_child(icon_button("close", "Close", Icon::Close));

        let dialog = Element::new("div")
            .with_attr("id", id)
            .with_attr("role", "dialog")
            .with_attr("aria-modal", "true")
            .with_attr("aria-labelledby", title_id)
            .with_attr("tabindex", "-1")
            .with_attr("data-focus-trap", "true")
            .with_class(join_classes("marginalia-dialog", class))
            .with_child(header)
            .with_child(body);

        Element::new("div")
            .with_class("marginalia-dialog-overlay")
            .with_attr("data-state", state)
            .with_child(dialog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut modal = Modal::new("Mermaid Diagram");
        assert!(!modal.is_open());

        modal.open(7);
        assert!(modal.is_open());
        assert_eq!(modal.content(), Some(&7));

        assert_eq!(modal.close(), Some(7));
        assert!(!modal.is_open());
        assert_eq!(modal.close(), None);
    }

    #[test]
    fn test_view_only_while_open() {
        let mut modal = Modal::new("Image");
        assert!(modal.view("d", "", Markup::text("body")).is_none());

        modal.open(());
        let overlay = modal.view("d", "max-w-[90vw]", Markup::text("body")).unwrap();
        let dialog = overlay.find(&|e| e.attr("role") == Some("dialog")).unwrap();
        assert_eq!(dialog.attr("aria-labelledby"), Some("d-title"));
        assert!(dialog.has_class("max-w-[90vw]"));
        assert!(overlay.text_content().contains("Image"));
        assert!(overlay.find(&|e| e.attr("data-action") == Some("close")).is_some());
    }

    #[test]
    fn test_closed_view_is_marked_closed() {
        let modal: Modal<()> = Modal::new("Image");
        let overlay = modal.view_closed("d", "", Markup::text("body"));
        assert_eq!(overlay.attr("data-state"), Some("closed"));
        assert!(!modal.is_open());
        let dialog = overlay.find(&|e| e.attr("role") == Some("dialog")).unwrap();
        assert_eq!(dialog.attr("id"), Some("d"));
        assert_eq!(dialog.text_content(), "Imagebody");
    }
}
