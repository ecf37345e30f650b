//! Application services layer.

pub mod blog;
pub mod content;
pub mod error;
pub mod og;
pub mod pages;
pub mod render;
pub mod seo;
pub mod sitemap;
pub mod syndication;
