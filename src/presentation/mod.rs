//! View models and askama template bindings.

pub mod views;
