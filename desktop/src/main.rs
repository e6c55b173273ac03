#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;

use ui::views::{Chart, PrivacyPolicy};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Chart {},
    #[route("/privacy-policy")]
    PrivacyPolicy {},
}

#[cfg(feature = "desktop")]
fn main() {
    // Session inputs come from DRAWGRID_* variables on native builds; nothing is compiled in.
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Drawgrid – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

fn nav_chart(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Chart {}, "{label}" })
}
fn nav_privacy(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::PrivacyPolicy {}, "{label}" })
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // AppNavbar updates this via context on language selection.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    // Session-wide chart state sits above the router so page remounts keep it.
    ui::chart::provide_chart_session();

    register_nav(NavBuilder {
        chart: nav_chart,
        privacy: nav_privacy,
    });

    rsx! {
        // Embedded theme; packaged builds carry no asset directory.
        document::Style { "{ui::THEME_CSS}" }

        // Views subscribe to the language code themselves; the router is never remounted.
        Router::<Route> { }
    }
}

/// A desktop-specific Router around the shared `AppNavbar` component
/// which allows us to use the desktop-specific `Route` enum.
#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar { }

        Outlet::<Route> {}
    }
}
