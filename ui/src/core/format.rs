//! Formatting helpers for grid header labels.

use time::{macros::format_description, Date, Time};

use super::grid::ABSENT;

/// Column header for a date, e.g. `19\nOct`.
pub fn format_date_label(date: Date) -> String {
    date.format(&format_description!("[day]\n[month repr:short]"))
        .unwrap_or_else(|_| ABSENT.to_string())
}

/// Row header for a slot: 24-hour digits plus the period marker, e.g. `13:00\nPM`.
pub fn format_slot_label(slot: Time) -> String {
    slot.format(&format_description!("[hour]:[minute]\n[period]"))
        .unwrap_or_else(|_| ABSENT.to_string())
}

/// Path segment identifying a day's sample collection, e.g. `2025-04-18`.
pub fn format_date_key(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}
