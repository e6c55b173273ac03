use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Chart, PrivacyPolicy};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Chart {},
    #[route("/privacy-policy")]
    PrivacyPolicy {},
}

fn nav_chart(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Chart {},
        "{label}"
    })
}
fn nav_privacy(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::PrivacyPolicy {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    {
        ui::i18n::init();
        register_nav(NavBuilder {
            chart: nav_chart,
            privacy: nav_privacy,
        });
    }

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);
    ui::chart::provide_chart_session();

    rsx! {
        document::Title { "Drawgrid" }
        document::Style { "{ui::THEME_CSS}" }

        Router::<Route> {}
    }
}

/// A web-specific Router around the shared `AppNavbar` component
/// which allows us to use the web-specific `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
