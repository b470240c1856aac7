use crate::model::{Reservation, TimeWindow};

/// First non-cancelled reservation overlapping `window`, if any.
///
/// Overlap is half-open on the same calendar day: back-to-back bookings
/// never conflict. Scan order follows the input; the store keeps
/// reservations sorted, which makes the reported blocker reproducible.
/// Correctness does not depend on ordering — any overlap fails the check.
pub fn find_conflict<'a, I>(window: &TimeWindow, existing: I) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    existing
        .into_iter()
        .find(|r| r.status.blocks() && r.window.overlaps(window))
}

/// True if any non-cancelled reservation overlaps `window`.
pub fn has_conflict<'a, I>(window: &TimeWindow, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Reservation>,
{
    find_conflict(window, existing).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReservationStatus;

    use chrono::{NaiveDate, NaiveTime};
    use ulid::Ulid;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn w(day: u32, start: (u32, u32), end: (u32, u32)) -> TimeWindow {
        TimeWindow::new(
            NaiveDate::from_ymd_opt(2030, 5, day).unwrap(),
            t(start.0, start.1),
            t(end.0, end.1),
        )
    }

    fn reservation(window: TimeWindow, status: ReservationStatus) -> Reservation {
        Reservation {
            id: Ulid::new(),
            room_id: Ulid::new(),
            window,
            status,
        }
    }

    fn confirmed(window: TimeWindow) -> Reservation {
        reservation(window, ReservationStatus::Confirmed)
    }

    #[test]
    fn empty_history_never_conflicts() {
        assert!(!has_conflict(&w(1, (10, 0), (11, 0)), &[]));
    }

    #[test]
    fn back_to_back_is_not_a_conflict() {
        let existing = vec![confirmed(w(1, (11, 0), (12, 0)))];
        assert!(!has_conflict(&w(1, (10, 0), (11, 0)), &existing));

        let existing = vec![confirmed(w(1, (9, 0), (10, 0)))];
        assert!(!has_conflict(&w(1, (10, 0), (11, 0)), &existing));
    }

    #[test]
    fn boundary_overlap_conflicts() {
        let existing = vec![confirmed(w(1, (10, 30), (11, 30)))];
        assert!(has_conflict(&w(1, (10, 0), (11, 0)), &existing));
    }

    #[test]
    fn identical_window_conflicts() {
        let existing = vec![confirmed(w(1, (10, 0), (11, 0)))];
        assert!(has_conflict(&w(1, (10, 0), (11, 0)), &existing));
    }

    #[test]
    fn contained_window_conflicts() {
        let existing = vec![confirmed(w(1, (9, 0), (17, 0)))];
        assert!(has_conflict(&w(1, (12, 0), (13, 0)), &existing));
    }

    #[test]
    fn different_date_never_conflicts() {
        let existing = vec![confirmed(w(2, (10, 0), (11, 0)))];
        assert!(!has_conflict(&w(1, (10, 0), (11, 0)), &existing));
    }

    #[test]
    fn cancelled_never_blocks() {
        let existing = vec![reservation(
            w(1, (10, 0), (11, 0)),
            ReservationStatus::Cancelled,
        )];
        assert!(!has_conflict(&w(1, (10, 0), (11, 0)), &existing));
    }

    #[test]
    fn completed_blocks_like_confirmed() {
        let existing = vec![reservation(
            w(1, (10, 0), (11, 0)),
            ReservationStatus::Completed,
        )];
        assert!(has_conflict(&w(1, (10, 30), (11, 30)), &existing));
    }

    #[test]
    fn conflict_is_symmetric() {
        let pairs = [
            (w(1, (10, 0), (11, 0)), w(1, (10, 30), (11, 30))),
            (w(1, (10, 0), (11, 0)), w(1, (11, 0), (12, 0))),
            (w(1, (10, 0), (11, 0)), w(2, (10, 0), (11, 0))),
            (w(1, (9, 0), (17, 0)), w(1, (12, 0), (13, 0))),
        ];
        for (a, b) in pairs {
            let a_vs_b = has_conflict(&a, &[confirmed(b)]);
            let b_vs_a = has_conflict(&b, &[confirmed(a)]);
            assert_eq!(a_vs_b, b_vs_a);
        }
    }

    #[test]
    fn first_overlap_in_scan_order_reported() {
        let first = confirmed(w(1, (10, 0), (11, 0)));
        let second = confirmed(w(1, (10, 30), (11, 30)));
        let first_id = first.id;
        let existing = vec![first, second];

        let hit = find_conflict(&w(1, (10, 15), (10, 45)), &existing).unwrap();
        assert_eq!(hit.id, first_id);
    }
}
