use dioxus::prelude::*;
use tracing::warn;

use crate::core::axis::Axes;
use crate::core::session::{resolve_config, session_now, SessionState};
use crate::core::selection::Snapshot;
use crate::core::view::{GridLayout, ViewController};
use crate::fetch::{load_grids, FirestoreSource};
use crate::t;

use super::grid::{render_grid, ChartController, RedrawEpoch};

/// Chart state that lives for the whole session.
///
/// Provided above the router so a remounted page (route change, language switch)
/// keeps the loaded grids, the selection overlay and the captured axes.
#[derive(Clone, Copy)]
pub struct ChartSession {
    state: Signal<SessionState>,
    epoch: Signal<u64>,
    controller: Signal<Option<ChartController>>,
    started: Signal<bool>,
}

impl ChartSession {
    fn new() -> Self {
        Self {
            state: Signal::new(SessionState::default()),
            epoch: Signal::new(0),
            controller: Signal::new(None),
            started: Signal::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Start the one load of this session; later calls do nothing.
    fn ensure_loaded(mut self) {
        if *self.started.peek() {
            return;
        }
        self.started.set(true);
        // Owned by the root scope, so unmounting the chart page cannot cancel it.
        spawn_forever(self.load());
    }

    async fn load(mut self) {
        let now = session_now();
        let axes = Axes::for_session(now);
        let outcome = match resolve_config().await {
            Ok(config) => {
                let source = FirestoreSource::new(config.documents_url.clone(), now.offset());
                load_grids(&source, &config, axes).await
            }
            Err(err) => Err(err),
        };

        self.state.with_mut(|session| session.resolve(outcome));
        let ready = match &*self.state.peek() {
            SessionState::Ready(grids) => Some(grids.clone()),
            _ => None,
        };
        if let Some(grids) = ready {
            self.controller
                .set(ViewController::new(grids, RedrawEpoch::new(self.epoch)));
        }
    }
}

/// Provide the session-wide [`ChartSession`]. Call once in the platform `App`.
pub fn provide_chart_session() -> ChartSession {
    use_context_provider(ChartSession::new)
}

#[component]
pub fn ChartView() -> Element {
    // Falls back to a page-local session when no platform provided one.
    let session = use_hook(|| {
        try_consume_context::<ChartSession>()
            .unwrap_or_else(|| provide_context(ChartSession::new()))
    });
    use_hook(move || session.ensure_loaded());

    // Subscribe to the language code so toolbar and status strings follow a switch.
    let lang_code = try_use_context::<Signal<String>>();
    let _lang = lang_code.map(|code| code()).unwrap_or_default();

    match session.state() {
        SessionState::Unauthorized => rsx! {
            div { class: "chart-status chart-status--error",
                div { class: "chart-status__box",
                    h2 { {t!("chart-unauthorized-title")} }
                    p { {t!("chart-unauthorized-body")} }
                }
            }
        },
        SessionState::Failed(reason) => rsx! {
            div { class: "chart-status chart-status--error",
                div { class: "chart-status__box",
                    h2 { {t!("chart-failed-title")} }
                    p { {t!("chart-failed-body")} }
                    p { class: "chart-status__detail", "{reason}" }
                }
            }
        },
        SessionState::Loading | SessionState::Ready(_) => {
            render_ready(session.epoch, session.controller)
        }
    }
}

/// Everything the toolbar and grid need, read out of the controller in one go.
struct Frame {
    snapshot: Snapshot,
    layout: GridLayout,
    heads: Vec<String>,
    active: String,
    all_selected: bool,
    selected: usize,
}

impl Frame {
    fn capture(view: &ChartController) -> Option<Self> {
        let active = view.active().to_string();
        Some(Self {
            snapshot: view.snapshot()?,
            layout: view.layout(),
            heads: view.categories().to_vec(),
            all_selected: view.all_selected(),
            selected: view.selection().selected_count(&active),
            active,
        })
    }
}

fn render_ready(epoch: Signal<u64>, mut controller: Signal<Option<ChartController>>) -> Element {
    let frame = controller.read().as_ref().and_then(Frame::capture);
    let Some(Frame {
        snapshot,
        layout,
        heads,
        active,
        all_selected,
        selected,
    }) = frame
    else {
        return rsx! {
            div { class: "chart-status",
                div { class: "chart-status__spinner" }
                p { {t!("chart-loading")} }
            }
        };
    };

    let on_head_change = move |evt: FormEvent| {
        let head = evt.value();
        controller.with_mut(|view| {
            if let Some(view) = view.as_mut() {
                if let Err(err) = view.set_active(&head) {
                    warn!(%err, "head selector out of sync");
                }
            }
        });
    };

    let on_select_all = move |evt: FormEvent| {
        let checked = evt.checked();
        controller.with_mut(|view| {
            if let Some(view) = view.as_mut() {
                view.select_all(checked);
            }
        });
    };

    rsx! {
        article { class: "chart",
            div { class: "chart__toolbar",
                label { class: "visually-hidden", r#for: "chart-select", {t!("chart-select-label")} }
                select {
                    id: "chart-select",
                    class: "chart__select",
                    value: "{active}",
                    oninput: on_head_change,
                    for head in heads.into_iter() {
                        option {
                            key: "{head}",
                            value: "{head}",
                            selected: head == active,
                            {t!("chart-option", head = head.clone())}
                        }
                    }
                }
                label { class: "chart__select-all",
                    input {
                        r#type: "checkbox",
                        checked: all_selected,
                        onchange: on_select_all,
                    }
                    span { {t!("chart-select-all")} }
                }
                span { class: "chart__count", {t!("chart-selected-count", count = selected)} }
            }

            {render_grid(snapshot, layout, epoch, controller)}
        }
    }
}
