use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{DaySchedule, SlotCandidate};
use crate::slot_format::{BookedSlots, DateKey, TimeLabel};

/// Opening hours and grid of the clinic's booking window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPolicy {
    pub days_ahead: u32,
    pub opening: NaiveTime,
    pub closing: NaiveTime,
    pub step: Duration,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            days_ahead: 7,
            opening: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            closing: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN),
            step: Duration::minutes(30),
        }
    }
}

impl SlotPolicy {
    /// True when `time` is a slot start this policy would ever offer.
    pub fn is_on_grid(&self, time: NaiveTime) -> bool {
        if time < self.opening || time >= self.closing {
            return false;
        }
        let step = self.step.num_seconds();
        step > 0 && (time - self.opening).num_seconds() % step == 0
    }

    /// First candidate of a day.
    ///
    /// Later days start at opening. Today starts at the next hour once we are
    /// past the opening hour, with any started hour snapped to half past.
    fn first_slot(&self, now: NaiveDateTime, date: NaiveDate, offset: u32) -> NaiveDateTime {
        if offset > 0 {
            return date.and_time(self.opening);
        }

        let hour = if now.hour() > self.opening.hour() {
            now.hour() + 1
        } else {
            self.opening.hour()
        };
        let minute = if now.minute() > 0 { 30 } else { 0 };

        date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour)) + Duration::minutes(minute)
    }
}

/// Pure slot planner: same `now`, policy and booked set give the same plan.
#[derive(Debug, Clone, Default)]
pub struct SlotPlanner {
    policy: SlotPolicy,
}

impl SlotPlanner {
    pub fn new(policy: SlotPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    /// Lazily yields one schedule per day, today first.
    pub fn days<'a>(
        &'a self,
        now: NaiveDateTime,
        booked: &'a BookedSlots,
    ) -> impl Iterator<Item = DaySchedule> + 'a {
        (0..self.policy.days_ahead).map_while(move |offset| {
            let date = now.date().checked_add_days(Days::new(u64::from(offset)))?;
            Some(self.day(now, date, offset, booked))
        })
    }

    pub fn plan(&self, now: NaiveDateTime, booked: &BookedSlots) -> Vec<DaySchedule> {
        self.days(now, booked).collect()
    }

    fn day(&self, now: NaiveDateTime, date: NaiveDate, offset: u32, booked: &BookedSlots) -> DaySchedule {
        let date_key = DateKey::new(date);
        let closing = date.and_time(self.policy.closing);

        let mut cursor = self.policy.first_slot(now, date, offset);
        let mut slots = Vec::new();

        while cursor < closing {
            let time = TimeLabel::new(cursor.time());
            if cursor >= now && !booked.contains(&date_key, &time) {
                slots.push(SlotCandidate { datetime: cursor, time });
            }
            cursor += self.policy.step;
        }

        DaySchedule { date, date_key, slots }
    }
}
