use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::t;

#[component]
pub fn PrivacyPolicy() -> Element {
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_marker = _lang_code.as_ref().map(|s| s()).unwrap_or_default();
    let year = OffsetDateTime::now_utc().year();

    rsx! {
        div { style: "display:none", "{_lang_marker}" }
        section { class: "page page-privacy",
            header { class: "page-privacy__header",
                h1 { {t!("privacy-title")} }
                p { class: "page-privacy__effective", {t!("privacy-effective")} }
            }

            p { {t!("privacy-intro")} }

            section { class: "page-privacy__section",
                h2 { {t!("privacy-collection-title")} }
                ul {
                    li { {t!("privacy-collection-1")} }
                    li { {t!("privacy-collection-2")} }
                    li { {t!("privacy-collection-3")} }
                }
            }
            section { class: "page-privacy__section",
                h2 { {t!("privacy-internet-title")} }
                p { {t!("privacy-internet-body")} }
            }
            section { class: "page-privacy__section",
                h2 { {t!("privacy-third-party-title")} }
                p { {t!("privacy-third-party-body")} }
            }
            section { class: "page-privacy__section",
                h2 { {t!("privacy-children-title")} }
                p { {t!("privacy-children-body")} }
            }
            section { class: "page-privacy__section",
                h2 { {t!("privacy-changes-title")} }
                p { {t!("privacy-changes-body")} }
            }
            section { class: "page-privacy__section",
                h2 { {t!("privacy-contact-title")} }
                p { {t!("privacy-contact-body")} }
            }

            footer { class: "page-privacy__footer", {t!("privacy-footer", year = year.to_string())} }
        }
    }
}
