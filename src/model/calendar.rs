use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// First day of the calendar week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// "Now" as seen by the caller: the current day, the time zone used to
/// truncate timestamps to days, and the week-start convention.
///
/// Everything temporal in the engine takes a `Calendar` instead of reading
/// the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    today: NaiveDate,
    offset: FixedOffset,
    week_start: WeekStart,
}

impl Calendar {
    pub fn new(now: DateTime<FixedOffset>, week_start: WeekStart) -> Self {
        Calendar {
            today: now.date_naive(),
            offset: *now.offset(),
            week_start,
        }
    }

    /// Calendar for the machine's local clock and time zone
    pub fn local(week_start: WeekStart) -> Self {
        Calendar::new(Local::now().fixed_offset(), week_start)
    }

    /// Calendar for the current instant seen through a fixed UTC offset
    pub fn at_offset(offset: FixedOffset, week_start: WeekStart) -> Self {
        Calendar::new(Utc::now().with_timezone(&offset), week_start)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day of a timestamp in this calendar's time zone
    pub fn day_of(&self, ts: &DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// First and last day (inclusive) of the week containing today
    pub fn week_bounds(&self) -> (NaiveDate, NaiveDate) {
        let into_week = match self.week_start {
            WeekStart::Sunday => self.today.weekday().num_days_from_sunday(),
            WeekStart::Monday => self.today.weekday().num_days_from_monday(),
        };
        let start = self.today - Days::new(u64::from(into_week));
        (start, start + Days::new(6))
    }

    pub fn is_today(&self, ts: &DateTime<Utc>) -> bool {
        self.day_of(ts) == self.today
    }

    /// Today through the last day of the current week. Days of this week
    /// that are already past do not count.
    pub fn is_this_week(&self, ts: &DateTime<Utc>) -> bool {
        let (_, end) = self.week_bounds();
        let day = self.day_of(ts);
        self.today <= day && day <= end
    }

    pub fn is_before_today(&self, ts: &DateTime<Utc>) -> bool {
        self.day_of(ts) < self.today
    }
}
