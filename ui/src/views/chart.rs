use dioxus::prelude::*;

use crate::chart::ChartView;

#[component]
pub fn Chart() -> Element {
    // Subscribe to global language code (if provided) so this view re-renders
    // when the user switches language while a grid is on screen.
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_marker = _lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        // Hidden marker node retains reactive dependency on language signal.
        div { style: "display:none", "{_lang_marker}" }
        section { class: "page page-chart",
            h1 { class: "visually-hidden", {crate::t!("chart-title")} }
            ChartView {}
        }
    }
}
