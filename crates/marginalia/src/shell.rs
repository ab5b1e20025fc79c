//! The standalone page around a rendered document, and the bundled sample.

use marginalia_core::html::Markup;

/// A demonstration document exercising every block kind.
pub const SAMPLE_DOCUMENT: &str = r#"# Marginalia

A tour of what the viewer renders beyond **plain Markdown**.

## Diagrams

```mermaid
graph TD
    A[Start] --> B{Does it render?}
    B -->|Yes| C[Ship it]
    B -->|No| D[Read the error card]
    D --> A
    C --> E[Done]
```

## Mind maps

```markmap
# Marginalia
## Blocks
### Diagrams
### Mind maps
### Images
## Chrome
### Copy source
### Fullscreen
```

## Links

The [CommonMark spec](https://spec.commonmark.org/) opens in a new tab, while
[this heading](#links) stays on the page.

## Images

![Mountains above a lake at dawn](https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&q=80)

## Tables

| Block    | Rendered by   | Fullscreen |
|----------|:-------------:|-----------:|
| Mermaid  | diagram engine | yes       |
| Markmap  | mind map       | yes       |
| Image    | lightbox       | yes       |

## Code

```rust
fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}
```

## Quotes

> Simple things should be simple, complex things should be possible.
> - Alan Kay

## Tasks

- [x] Parse Markdown
- [x] Render flowcharts
- [x] Render mind maps
- [ ] Everything else

---

## Getting started

1. Write a document
2. Run `marginalia doc.md -o doc.html`
3. Open the page
"#;

const STYLESHEET: &str = r#"
body { margin: 0; background: #fff; color: #111827; font-family: system-ui, sans-serif; line-height: 1.6; }
main { max-width: 56rem; margin: 0 auto; padding: 2rem 1rem; }
.marginalia-document > * + * { margin-top: 1rem; }
.marginalia-anchor { color: inherit; text-decoration: none; }
.marginalia-anchor:hover { text-decoration: underline; }
.marginalia-blockquote { border-left: 4px solid #d1d5db; margin: 0; padding-left: 1rem; color: #4b5563; font-style: italic; }
.marginalia-code { position: relative; }
.marginalia-code pre { background: #f3f4f6; border-radius: 0.5rem; padding: 1rem; overflow-x: auto; }
.marginalia-code-language { position: absolute; top: 0.25rem; right: 0.5rem; font-size: 0.75rem; color: #6b7280; }
.marginalia-inline-code { background: #f3f4f6; border-radius: 0.25rem; padding: 0.1rem 0.3rem; font-size: 0.9em; }
.marginalia-list { padding-left: 1.5rem; }
.contains-task-list { list-style: none; padding-left: 0.5rem; }
.task-list-item-checkbox { margin-right: 0.5rem; }
.marginalia-table-wrapper { overflow-x: auto; }
.marginalia-table { border-collapse: collapse; width: 100%; }
.marginalia-table th, .marginalia-table td { border: 1px solid #e5e7eb; padding: 0.5rem 0.75rem; }
.marginalia-table th { background: #f9fafb; }
.marginalia-link-external { color: #2563eb; }
.marginalia-icon, .marginalia-icon-inline { width: 1rem; height: 1rem; vertical-align: middle; }
.marginalia-icon-inline { width: 0.8rem; height: 0.8rem; margin-left: 0.2rem; }
.marginalia-card { position: relative; border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 1rem; }
.marginalia-toolbar { position: absolute; top: 0.5rem; right: 0.5rem; display: flex; gap: 0.25rem; }
.marginalia-button { background: #fff; border: 1px solid #e5e7eb; border-radius: 0.375rem; padding: 0.25rem; cursor: pointer; }
.marginalia-diagram-content { display: flex; justify-content: center; overflow-x: auto; }
.marginalia-mindmap-viewport { width: 100%; overflow: hidden; }
.marginalia-error-card { border-color: #fca5a5; background: #fef2f2; }
.marginalia-error-title { color: #b91c1c; font-weight: 600; margin: 0; }
.marginalia-error-detail { color: #7f1d1d; font-size: 0.875rem; }
.marginalia-error-source { background: #fff; padding: 0.75rem; border-radius: 0.375rem; overflow-x: auto; }
.marginalia-image { margin: 1rem 0; }
.marginalia-image-trigger { position: relative; display: block; padding: 0; border: 0; background: none; cursor: zoom-in; }
.marginalia-image-thumbnail { max-width: 100%; height: auto; border-radius: 0.5rem; }
.marginalia-image-overlay { position: absolute; top: 0.5rem; right: 0.5rem; background: rgba(0, 0, 0, 0.5); color: #fff; border-radius: 0.375rem; padding: 0.25rem; transition: opacity 0.2s; }
.marginalia-image-failed { display: flex; align-items: center; justify-content: center; min-height: 8rem; background: #f3f4f6; color: #6b7280; border-radius: 0.5rem; }
.marginalia-image-full { max-width: 100%; max-height: 85vh; margin: 0 auto; display: block; }
.marginalia-caption { text-align: center; font-size: 0.875rem; color: #6b7280; }
.marginalia-caption-overlay { color: #fff; }
.marginalia-skeleton { display: grid; gap: 0.75rem; }
.marginalia-skeleton-line { background: #e5e7eb; border-radius: 0.25rem; }
.marginalia-dialog-overlay { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.6); display: flex; align-items: center; justify-content: center; z-index: 50; }
.marginalia-dialog-overlay[data-state="closed"] { display: none; }
.marginalia-dialog { background: #fff; border-radius: 0.5rem; padding: 1rem; }
.marginalia-dialog-header { display: flex; justify-content: space-between; align-items: center; }
.marginalia-dialog-title { font-size: 1.125rem; margin: 0; }
.marginalia-rule { border: 0; border-top: 1px solid #e5e7eb; margin: 2rem 0; }
.hidden { display: none; }
.marginalia-image-thumbnail.hidden { display: block; visibility: hidden; position: absolute; top: 0; left: 0; }
.marginalia-image-trigger .marginalia-skeleton { display: block; width: 16rem; height: 12rem; max-width: 100%; background: #e5e7eb; border-radius: 0.5rem; }
.marginalia-mindmap svg [data-action="toggle"] { cursor: pointer; }
.marginalia-mindmap svg [data-action="pan"] { cursor: grab; }
.italic { font-style: italic; }
.overflow-auto { overflow: auto; }
.opacity-0 { opacity: 0; }
.group:hover .group-hover\:opacity-100 { opacity: 1; }
.bg-black\/90 { background: rgba(0, 0, 0, 0.9); }
.animate-pulse { animation: pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite; }
@keyframes pulse { 50% { opacity: 0.5; } }
.w-3\/4 { width: 75%; } .w-1\/2 { width: 50%; } .w-5\/6 { width: 83.333%; } .h-4 { height: 1rem; }
"#;

/// Drives the page without a host application: thumbnail load states,
/// copy buttons, fullscreen dialogs and mind map fold, zoom and pan.
const HOST_SCRIPT: &str = include_str!("shell/host.js");

/// Wraps `body` in a complete HTML page.
///
/// The host script is loaded in the head so it sees every image load.
pub fn page(title: &str, body: &Markup) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>");
    Markup::text(title).write_html(&mut out);
    out.push_str("</title>\n<style>");
    out.push_str(STYLESHEET);
    out.push_str("</style>\n<script>\n");
    out.push_str(HOST_SCRIPT);
    out.push_str("</script>\n</head>\n<body>\n<main>\n");
    body.write_html(&mut out);
    out.push_str("\n</main>\n</body>\n</html>\n");
    out
}
