use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::models::Task;

/// Named rules selecting a subset of a user's tasks. A closed enum so that
/// adding/removing a filter is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Important,
    Today,
    Next7Days,
    Private,
}

impl Filter {
    /// Parses the `filter` query parameter. Empty means `All`; anything
    /// outside the enumeration is rejected by the caller as a bad request.
    pub fn from_param(raw: &str) -> Option<Filter> {
        match raw {
            "" | "ALL" => Some(Filter::All),
            "IMPORTANT" => Some(Filter::Important),
            "TODAY" => Some(Filter::Today),
            "NEXT_7_DAYS" => Some(Filter::Next7Days),
            "PRIVATE" => Some(Filter::Private),
            _ => None,
        }
    }

    /// Pure visibility predicate. Day boundaries are taken from the UTC date
    /// of `now`; a task without a deadline never matches the windowed
    /// filters.
    pub fn matches(self, task: &Task, now: OffsetDateTime) -> bool {
        match self {
            Filter::All => true,
            Filter::Important => task.important,
            Filter::Private => task.private,
            Filter::Today => {
                let start = start_of_day(now);
                in_window(task.deadline, start, start + Duration::days(1))
            }
            Filter::Next7Days => {
                // The window opens at tomorrow 00:00, not at `now`: today is
                // excluded, and a deadline of exactly tomorrow midnight
                // belongs here and not to `Today`.
                let tomorrow = start_of_day(now) + Duration::days(1);
                in_window(task.deadline, tomorrow, tomorrow + Duration::days(7))
            }
        }
    }
}

fn start_of_day(now: OffsetDateTime) -> PrimitiveDateTime {
    now.date().midnight()
}

// Half-open: [start, end).
fn in_window(
    deadline: Option<PrimitiveDateTime>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> bool {
    deadline.is_some_and(|d| d >= start && d < end)
}
