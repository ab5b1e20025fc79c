//! Image thumbnails with a fullscreen lightbox.
//!
//! Remote images load straight from their URL. Local images are routed
//! through the configured optimization endpoint, once at thumbnail size and
//! once at fullscreen size.

use log::{debug, trace};
use url::{Url, form_urlencoded};

use marginalia_core::html::{Element, Markup};

use crate::{
    config::MediaConfig,
    widget::{Icon, Modal},
};

const FAILURE_TEXT: &str = "Failed to load image";
const DEFAULT_TITLE: &str = "Image";
const DIALOG_CLASS: &str = "max-w-[95vw] max-h-[95vh] p-0";

/// Load state of a thumbnail. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// Returns true for absolute `http` and `https` URLs.
pub fn is_remote(src: &str) -> bool {
    Url::parse(src)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// The URL an image is actually fetched from at the given width.
fn resolve(src: &str, width: u32, config: &MediaConfig) -> String {
    if is_remote(src) {
        return src.to_string();
    }
    let encoded: String = form_urlencoded::byte_serialize(src.as_bytes()).collect();
    format!(
        "{}?url={}&w={}&q={}",
        config.endpoint(),
        encoded,
        width,
        config.quality()
    )
}

/// A thumbnail that can be enlarged into a fullscreen dialog.
#[derive(Debug)]
pub struct ImageViewer {
    id: String,
    src: String,
    alt: String,
    remote: bool,
    thumbnail: (String, (u32, u32)),
    full: (String, (u32, u32)),
    state: LoadState,
    fullscreen: Modal<()>,
}

impl ImageViewer {
    pub fn new(src: impl Into<String>, alt: impl Into<String>, config: &MediaConfig) -> Self {
        let src = src.into();
        let alt = alt.into();
        let remote = is_remote(&src);
        let thumbnail_size = config.thumbnail_size();
        let full_size = config.fullscreen_size();
        trace!(src = src.as_str(), remote = remote; "Presenting image");

        let title = if alt.is_empty() { DEFAULT_TITLE.to_string() } else { alt.clone() };
        Self {
            id: "image".to_string(),
            thumbnail: (resolve(&src, thumbnail_size.0, config), thumbnail_size),
            full: (resolve(&src, full_size.0, config), full_size),
            src,
            alt,
            remote,
            state: LoadState::Pending,
            fullscreen: Modal::new(title),
        }
    }

    /// Sets the id the fullscreen dialog is derived from; it must be unique
    /// in the document.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// The URL the thumbnail loads.
    pub fn thumbnail_src(&self) -> &str {
        &self.thumbnail.0
    }

    /// The URL the fullscreen view loads.
    pub fn fullscreen_src(&self) -> &str {
        &self.full.0
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The thumbnail finished loading. Ignored after a failure.
    pub fn on_load(&mut self) {
        if self.state == LoadState::Pending {
            self.state = LoadState::Loaded;
        }
    }

    /// The thumbnail failed to load. There is no retry.
    pub fn on_error(&mut self) {
        if self.state != LoadState::Failed {
            debug!(src = self.src.as_str(); "Image failed to load");
            self.state = LoadState::Failed;
            self.fullscreen.close();
        }
    }

    /// Opens the lightbox. Returns `false` for a failed image.
    pub fn open_fullscreen(&mut self) -> bool {
        if self.state == LoadState::Failed {
            return false;
        }
        self.fullscreen.open(());
        true
    }

    pub fn close_fullscreen(&mut self) {
        self.fullscreen.close();
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_open()
    }

    fn img(&self, (src, (width, height)): &(String, (u32, u32)), class: &str) -> Element {
        let img = Element::new("img")
            .with_attr("src", src.as_str())
            .with_attr("alt", self.alt.as_str())
            .with_class(class);
        if self.remote {
            img
        } else {
            img.with_attr("width", width.to_string())
                .with_attr("height", height.to_string())
        }
    }

    fn caption(&self, class: &str) -> Option<Element> {
        (!self.alt.is_empty()).then(|| {
            Element::new("figcaption")
                .with_class(class)
                .with_child(Markup::text(self.alt.as_str()))
        })
    }

    pub fn view(&self) -> Markup {
        self.build_view(false)
    }

    /// Renders the view written into a static page, with the lightbox
    /// included in its closed state for the page script to reveal.
    pub fn view_static(&self) -> Markup {
        self.build_view(true)
    }

    fn build_view(&self, static_page: bool) -> Markup {
        if self.state == LoadState::Failed {
            return Element::new("div")
                .with_class("marginalia-image marginalia-image-failed")
                .with_attr("data-state", "failed")
                .with_attr("role", "img")
                .with_attr("aria-label", self.alt.as_str())
                .with_child(Markup::text(FAILURE_TEXT))
                .into();
        }

        let pending = self.state == LoadState::Pending;
        let mut trigger = Element::new("button")
            .with_attr("type", "button")
            .with_class("marginalia-image-trigger group")
            .with_attr("data-action", "fullscreen")
            .with_attr("aria-label", "View fullscreen");
        if pending {
            trigger.push(Element::new("div").with_class("marginalia-skeleton animate-pulse"));
        }
        let img_class = if pending {
            "marginalia-image-thumbnail hidden"
        } else {
            "marginalia-image-thumbnail"
        };
        trigger.push(self.img(&self.thumbnail, img_class).with_attr("loading", "lazy"));
        trigger.push(
            Element::new("div")
                .with_class("marginalia-image-overlay opacity-0 group-hover:opacity-100")
                .with_child(Icon::Expand.to_element("marginalia-icon")),
        );

        let mut figure = Element::new("figure")
            .with_class("marginalia-image")
            .with_attr("id", self.id.as_str())
            .with_attr("data-state", if pending { "pending" } else { "loaded" })
            .with_attr("data-failure-text", FAILURE_TEXT)
            .with_child(trigger);
        if let Some(caption) = self.caption("marginalia-caption italic") {
            figure.push(caption);
        }

        let mut body = Element::new("div")
            .with_class("marginalia-dialog-body bg-black/90")
            .with_child(self.img(&self.full, "marginalia-image-full").with_attr("loading", "lazy"));
        if let Some(caption) = self.caption("marginalia-caption marginalia-caption-overlay") {
            body.push(caption);
        }
        let dialog_id = format!("{}-dialog", self.id);
        let dialog = if self.fullscreen.is_open() {
            self.fullscreen.view(&dialog_id, DIALOG_CLASS, body.into())
        } else if static_page {
            Some(self.fullscreen.view_closed(&dialog_id, DIALOG_CLASS, body.into()))
        } else {
            None
        };
        if let Some(dialog) = dialog {
            figure.push(dialog);
        }

        figure.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(src: &str, alt: &str) -> ImageViewer {
        ImageViewer::new(src, alt, &MediaConfig::default())
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://example.com/a.png"));
        assert!(is_remote("http://example.com/a.png"));
        assert!(!is_remote("/images/a.png"));
        assert!(!is_remote("images/a.png"));
        assert!(!is_remote("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_local_images_use_endpoint() {
        let viewer = viewer("/images/my photo.png", "Photo");
        assert_eq!(
            viewer.thumbnail_src(),
            "/_image?url=%2Fimages%2Fmy+photo.png&w=800&q=75"
        );
        assert_eq!(
            viewer.fullscreen_src(),
            "/_image?url=%2Fimages%2Fmy+photo.png&w=1920&q=75"
        );
    }

    #[test]
    fn test_remote_images_load_directly() {
        let viewer = viewer("https://example.com/a.png", "");
        assert_eq!(viewer.thumbnail_src(), "https://example.com/a.png");
        assert_eq!(viewer.fullscreen_src(), "https://example.com/a.png");
    }

    #[test]
    fn test_pending_shows_skeleton_and_hides_image() {
        let viewer = viewer("https://example.com/a.png", "A cat");
        let view = viewer.view();
        let root = view.as_element().unwrap();
        assert_eq!(root.attr("data-state"), Some("pending"));
        assert!(root.find(&|e| e.has_class("marginalia-skeleton")).is_some());
        let img = root.find(&|e| e.tag() == "img").unwrap();
        assert!(img.has_class("hidden"));
        let caption = root.find(&|e| e.tag() == "figcaption").unwrap();
        assert_eq!(caption.text_content(), "A cat");
    }

    #[test]
    fn test_loaded_shows_image() {
        let mut viewer = viewer("https://example.com/a.png", "");
        viewer.on_load();
        let view = viewer.view();
        let root = view.as_element().unwrap();
        assert!(root.find(&|e| e.has_class("marginalia-skeleton")).is_none());
        assert!(!root.find(&|e| e.tag() == "img").unwrap().has_class("hidden"));
        assert!(root.find(&|e| e.tag() == "figcaption").is_none());
    }

    #[test]
    fn test_failure_is_final_and_blocks_fullscreen() {
        let mut viewer = viewer("https://unreachable.invalid/a.png", "Gone");
        assert_eq!(viewer.state(), LoadState::Pending);
        viewer.on_error();
        assert_eq!(viewer.state(), LoadState::Failed);

        viewer.on_load();
        assert_eq!(viewer.state(), LoadState::Failed);
        assert!(!viewer.open_fullscreen());
        assert!(!viewer.is_fullscreen());

        let html = viewer.view().to_html();
        assert!(html.contains(FAILURE_TEXT));
        assert!(!html.contains("<img"));
        assert!(!html.contains(r#"role="dialog""#));
    }

    #[test]
    fn test_fullscreen_round_trip_keeps_load_state() {
        let mut viewer = viewer("/images/a.png", "Caption text");
        viewer.on_load();
        assert!(viewer.open_fullscreen());

        let view = viewer.view();
        let root = view.as_element().unwrap();
        let dialog = root.find(&|e| e.attr("role") == Some("dialog")).unwrap();
        let full = dialog.find(&|e| e.tag() == "img").unwrap();
        assert_eq!(full.attr("src"), Some(viewer.fullscreen_src()));
        assert_eq!(full.attr("width"), Some("1920"));
        assert!(dialog.text_content().contains("Caption text"));

        viewer.close_fullscreen();
        assert_eq!(viewer.state(), LoadState::Loaded);
        assert!(!viewer.view().to_html().contains(r#"role="dialog""#));
    }

    #[test]
    fn test_dialog_title_falls_back() {
        let mut viewer = viewer("/a.png", "");
        viewer.open_fullscreen();
        assert!(viewer.view().to_html().contains(DEFAULT_TITLE));
    }

    #[test]
    fn test_static_view_ships_closed_lightbox() {
        let viewer = viewer("https://example.com/a.png", "A cat").with_id("image-0");
        let view = viewer.view_static();
        let root = view.as_element().unwrap();
        assert_eq!(root.attr("data-state"), Some("pending"));
        assert_eq!(root.attr("data-failure-text"), Some(FAILURE_TEXT));

        let overlay = root.find(&|e| e.has_class("marginalia-dialog-overlay")).unwrap();
        assert_eq!(overlay.attr("data-state"), Some("closed"));
        let dialog = overlay.find(&|e| e.attr("role") == Some("dialog")).unwrap();
        assert_eq!(dialog.attr("id"), Some("image-0-dialog"));
        let full = dialog.find(&|e| e.tag() == "img").unwrap();
        assert_eq!(full.attr("src"), Some("https://example.com/a.png"));
        assert!(!viewer.is_fullscreen());
    }
}
