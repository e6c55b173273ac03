//! Fixed calendar and time-of-day axes for the draw grid.
//!
//! Columns run over the dates of the current month-length window, most recent first.
//! Rows run over the draw slots of a day. Index 0 on either axis is reserved for the
//! header, so data cells start at `(1, 1)`.

use time::{macros::time, Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// First draw slot of the day.
pub const FIRST_SLOT: Time = time!(08:30);
/// Last draw slot of the day (inclusive).
pub const LAST_SLOT: Time = time!(23:00);
/// Spacing between consecutive slots.
pub const SLOT_MINUTES: i64 = 15;

/// Calendar dates, descending from the session's "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAxis(Vec<Date>);

impl DateAxis {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Date> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.0.iter().copied()
    }

    pub fn position(&self, date: Date) -> Option<usize> {
        self.0.iter().position(|d| *d == date)
    }
}

/// Draw slots of a day in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAxis(Vec<Time>);

impl TimeAxis {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Time> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Time> + '_ {
        self.0.iter().copied()
    }

    pub fn position(&self, slot: Time) -> Option<usize> {
        self.0.iter().position(|t| *t == slot)
    }
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: Date) -> u8 {
    date.month().length(date.year())
}

/// `today - i days` for `i` in `0..days`.
pub fn build_date_axis(today: Date, days: u8) -> DateAxis {
    let dates = (0..i64::from(days))
        .filter_map(|back| today.checked_sub(Duration::days(back)))
        .collect();
    DateAxis(dates)
}

/// Every slot from [`FIRST_SLOT`] to [`LAST_SLOT`] inclusive, [`SLOT_MINUTES`] apart.
pub fn build_time_axis() -> TimeAxis {
    let step = Duration::minutes(SLOT_MINUTES);
    let slots = std::iter::successors(Some(FIRST_SLOT), |slot| {
        let next = *slot + step;
        // `Time + Duration` wraps at midnight.
        (next > *slot && next <= LAST_SLOT).then_some(next)
    })
    .collect();
    TimeAxis(slots)
}

/// Both axes of a session plus the UTC offset used to turn cells into instants.
///
/// Built once from a single captured `now`; every grid of the session shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axes {
    dates: DateAxis,
    times: TimeAxis,
    offset: UtcOffset,
}

impl Axes {
    pub fn new(dates: DateAxis, times: TimeAxis, offset: UtcOffset) -> Self {
        Self {
            dates,
            times,
            offset,
        }
    }

    pub fn for_session(now: OffsetDateTime) -> Self {
        let today = now.date();
        Self::new(
            build_date_axis(today, days_in_month(today)),
            build_time_axis(),
            now.offset(),
        )
    }

    pub fn dates(&self) -> &DateAxis {
        &self.dates
    }

    pub fn times(&self) -> &TimeAxis {
        &self.times
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Rows including the date header row.
    pub fn row_count(&self) -> usize {
        self.times.len() + 1
    }

    /// Columns including the time label column.
    pub fn column_count(&self) -> usize {
        self.dates.len() + 1
    }

    /// Exact instant of a data cell; `None` for header cells or out-of-range addresses.
    pub fn instant(&self, row: usize, col: usize) -> Option<OffsetDateTime> {
        let date = self.dates.get(col.checked_sub(1)?)?;
        let slot = self.times.get(row.checked_sub(1)?)?;
        Some(PrimitiveDateTime::new(date, slot).assume_offset(self.offset))
    }

    /// Grid address `(row, col)` of an instant, if it falls on a slot of the window.
    pub fn position(&self, instant: OffsetDateTime) -> Option<(usize, usize)> {
        let local = instant.to_offset(self.offset);
        let col = self.dates.position(local.date())?;
        let row = self.times.position(local.time())?;
        Some((row + 1, col + 1))
    }
}
