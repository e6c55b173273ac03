#![cfg(test)]
//! The chart session (loaded grids, selection overlay, captured axes) must outlive
//! the routed pages. Both launchers provide it above the router and never key the
//! router on the language code, which would remount every page on a switch.

const DESKTOP_MAIN: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/main.rs"));
const WEB_MAIN: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../web/src/main.rs"
));

fn app_body(source: &str) -> &str {
    source
        .split("fn App() -> Element {")
        .nth(1)
        .and_then(|rest| rest.split("\n}\n").next())
        .unwrap_or_default()
}

#[test]
fn launchers_provide_the_chart_session_before_routing() {
    for (name, source) in [("desktop", DESKTOP_MAIN), ("web", WEB_MAIN)] {
        let body = app_body(source);
        let provide = body.find("provide_chart_session()");
        let router = body.find("Router::<Route>");
        assert!(provide.is_some(), "{name} App does not provide the chart session");
        assert!(router.is_some(), "{name} App has no router");
        assert!(provide < router, "{name} provides the session after the router");
    }
}

#[test]
fn router_is_not_keyed_by_language() {
    for (name, source) in [("desktop", DESKTOP_MAIN), ("web", WEB_MAIN)] {
        let body = app_body(source);
        assert!(
            !body.contains("key: \"{lang_code()}\""),
            "{name} remounts the routed subtree on language change"
        );
    }
}
