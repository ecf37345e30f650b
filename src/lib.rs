//! Vetrina: a bilingual portfolio and blog server.
//!
//! Content is authored outside the process (markdown files or a headless
//! content API) and treated as a read-only corpus. The crate resolves a
//! locale and slug per request, derives presentation metadata (reading
//! time, table of contents, translation availability), and renders pages,
//! feeds, sitemaps, and Open Graph cards from the same content adapter.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
