//! Marginalia Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Marginalia
//! Markdown renderer and its diagram engines. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Markup**: The rendered visual tree ([`html`] module)
//! - **Draw**: Layered SVG output and text measurement ([`draw`] module)
//! - **Theme**: The process-wide diagram theme ([`theme`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod html;
pub mod theme;
