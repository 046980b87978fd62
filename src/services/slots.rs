// ABOUTME: Pure slot generation over availability windows and booked intervals
// ABOUTME: Splits a window into fixed-length slots and marks those overlapping a booking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Slot Generator
//!
//! A window `[start, end)` on a date is cut into consecutive slots of
//! `duration` minutes starting at `start`. A slot is emitted only while
//! `slot_start + duration <= end`, so there are no partial trailing slots and
//! a window of `span` minutes yields `floor(span / duration)` slots.
//!
//! A slot is unavailable when it overlaps any booked interval under half-open
//! semantics: `slot_start < booked_end && slot_end > booked_start`. A slot
//! ending exactly when a booking starts is still available.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::constants::slots::{DATETIME_FORMAT, TIME_FORMAT};
use crate::models::{AvailabilityBlock, BookedInterval};

/// A bookable time slot derived from an availability window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Local start
    pub start: NaiveDateTime,
    /// Local end
    pub end: NaiveDateTime,
    /// False when the slot overlaps a booking
    pub available: bool,
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Slot", 3)?;
        state.serialize_field("time", &self.start.format(TIME_FORMAT).to_string())?;
        state.serialize_field("datetime", &self.start.format(DATETIME_FORMAT).to_string())?;
        state.serialize_field("available", &self.available)?;
        state.end()
    }
}

/// Generate the slots of one window on `date`
///
/// Returns no slots for a non-positive duration, an empty window, or a
/// duration longer than the window.
#[must_use]
pub fn generate_slots(
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i64,
    booked: &[BookedInterval],
) -> Vec<Slot> {
    let Some(step) = Duration::try_minutes(duration_minutes).filter(|_| duration_minutes > 0) else {
        return Vec::new();
    };
    let end = date.and_time(end_time);
    let mut current = date.and_time(start_time);

    let mut slots = Vec::new();
    while let Some(slot_end) = current.checked_add_signed(step).filter(|e| *e <= end) {
        let available = !booked
            .iter()
            .any(|interval| interval.overlaps(current, slot_end));
        slots.push(Slot {
            start: current,
            end: slot_end,
            available,
        });
        current = slot_end;
    }
    slots
}

/// Generate slots for every block and merge them by start time
///
/// Blocks are processed in the given order and the merge is a stable sort, so
/// overlapping blocks yield duplicate start times in block order.
#[must_use]
pub fn slots_for_blocks(
    date: NaiveDate,
    blocks: &[AvailabilityBlock],
    duration_minutes: i64,
    booked: &[BookedInterval],
) -> Vec<Slot> {
    let mut slots: Vec<Slot> = blocks
        .iter()
        .flat_map(|block| {
            generate_slots(
                date,
                block.start_time,
                block.end_time,
                duration_minutes,
                booked,
            )
        })
        .collect();
    slots.sort_by_key(|slot| slot.start);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilityWindow;
    use chrono::Timelike;
    use uuid::Uuid;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booked(start: NaiveTime, end: NaiveTime) -> BookedInterval {
        BookedInterval {
            start: date().and_time(start),
            end: date().and_time(end),
        }
    }

    fn block(start: NaiveTime, end: NaiveTime) -> AvailabilityBlock {
        AvailabilityBlock::from_window(
            Uuid::new_v4(),
            &AvailabilityWindow {
                start_date: None,
                end_date: None,
                start_time: start,
                end_time: end,
                day_of_week: Some(1),
                is_recurring: true,
            },
        )
    }

    #[test]
    fn test_hour_block_with_half_hour_slots() {
        let slots = generate_slots(date(), t(9, 0), t(10, 0), 30, &[]);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, date().and_time(t(9, 0)));
        assert_eq!(slots[1].start, date().and_time(t(9, 30)));
        assert!(slots.iter().all(|slot| slot.available));
    }

    #[test]
    fn test_booking_straddling_both_slots_blocks_both() {
        let slots = generate_slots(date(), t(9, 0), t(10, 0), 30, &[booked(t(9, 15), t(9, 45))]);
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|slot| !slot.available));
    }

    #[test]
    fn test_touching_booking_leaves_slot_available() {
        let slots = generate_slots(date(), t(9, 0), t(10, 0), 30, &[booked(t(9, 30), t(10, 0))]);
        assert!(slots[0].available);
        assert!(!slots[1].available);
    }

    #[test]
    fn test_no_partial_trailing_slot() {
        let slots = generate_slots(date(), t(9, 0), t(10, 50), 25, &[]);
        // 110 minutes / 25 = 4 full slots
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[3].end, date().and_time(t(10, 40)));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_degenerate_inputs_yield_nothing() {
        assert!(generate_slots(date(), t(9, 0), t(10, 0), 0, &[]).is_empty());
        assert!(generate_slots(date(), t(9, 0), t(10, 0), -30, &[]).is_empty());
        assert!(generate_slots(date(), t(9, 0), t(10, 0), 90, &[]).is_empty());
        assert!(generate_slots(date(), t(9, 0), t(9, 0), 15, &[]).is_empty());
        assert!(generate_slots(date(), t(9, 0), t(10, 0), i64::MAX, &[]).is_empty());
    }

    #[test]
    fn test_last_representable_day_does_not_overflow() {
        let slots = generate_slots(NaiveDate::MAX, t(22, 0), t(23, 59), 60, &[]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start.hour(), 22);
    }

    #[test]
    fn test_generation_is_repeatable() {
        let bookings = [booked(t(13, 0), t(14, 0))];
        let first = generate_slots(date(), t(12, 0), t(17, 0), 45, &bookings);
        let second = generate_slots(date(), t(12, 0), t(17, 0), 45, &bookings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_blocks_are_merged_by_start_time() {
        let blocks = [block(t(14, 0), t(15, 0)), block(t(9, 0), t(10, 0))];
        let slots = slots_for_blocks(date(), &blocks, 60, &[]);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, date().and_time(t(9, 0)));
        assert_eq!(slots[1].start, date().and_time(t(14, 0)));
    }

    #[test]
    fn test_overlapping_blocks_are_not_deduplicated() {
        let blocks = [block(t(9, 0), t(10, 0)), block(t(9, 0), t(11, 0))];
        let slots = slots_for_blocks(date(), &blocks, 60, &[]);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].start, slots[1].start);
    }

    #[test]
    fn test_slot_wire_format() {
        let slots = generate_slots(date(), t(9, 0), t(9, 30), 30, &[]);
        let json = serde_json::to_value(slots[0]).unwrap();
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["datetime"], "2025-01-06T09:00:00");
        assert_eq!(json["available"], true);
    }
}
