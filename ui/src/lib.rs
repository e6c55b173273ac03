//! Shared UI crate for Drawgrid. Grid engine, data loading and views live here;
//! the platform crates only supply routing and a launcher.

pub mod chart;
pub mod core;
pub mod fetch;
pub mod i18n;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

/// Unified theme shared by every platform. Inlined so packaged builds need no asset dir.
pub const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));

#[cfg(test)]
mod tests {
    mod i18n_completeness;
}
