use serde::Serialize;

use crate::{booking::Booking, status::BookingStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: &BookingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl From<&str> for StatusFilter {
    fn from(raw: &str) -> Self {
        match raw {
            "all" => StatusFilter::All,
            other => StatusFilter::Only(BookingStatus::from(other)),
        }
    }
}

/// Search box plus status dropdown of the booking views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub status: StatusFilter,
}

impl FilterCriteria {
    pub fn new(search: impl Into<String>, status: impl Into<StatusFilter>) -> Self {
        Self {
            search: search.into(),
            status: status.into(),
        }
    }

    /// True when the criteria can hide anything.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.status != StatusFilter::All
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = booking.title.to_lowercase().contains(&needle)
            || booking.name.to_lowercase().contains(&needle)
            || booking.rooms.name.to_lowercase().contains(&needle);

        matches_search && self.status.matches(&booking.status)
    }
}

/// Bookings matching `criteria`, in input order.
pub fn filter_bookings(bookings: &[Booking], criteria: &FilterCriteria) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|booking| criteria.matches(booking))
        .cloned()
        .collect()
}

/// Per-status counts over an unfiltered booking list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
}

impl BookingSummary {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        bookings.iter().fold(
            BookingSummary {
                total: bookings.len(),
                ..Default::default()
            },
            |mut summary, booking| {
                match booking.status {
                    BookingStatus::Pending => summary.pending += 1,
                    BookingStatus::Approved => summary.approved += 1,
                    BookingStatus::Rejected => summary.rejected += 1,
                    BookingStatus::Completed => summary.completed += 1,
                    BookingStatus::Unknown(_) => {}
                }
                summary
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::RoomSnapshot;

    fn booking(id: &str, title: &str, name: &str, room: &str, status: &str) -> Booking {
        Booking {
            id: id.into(),
            room_id: format!("room-{id}"),
            title: title.into(),
            description: String::new(),
            name: name.into(),
            start_time: "2025-01-01T10:00:00".into(),
            end_time: "2025-01-01T11:00:00".into(),
            created_at: String::new(),
            status: BookingStatus::from(status),
            image_link: None,
            rooms: RoomSnapshot {
                name: room.into(),
                location: "Floor 1".into(),
            },
        }
    }

    fn sample() -> Vec<Booking> {
        vec![
            booking("b1", "Weekly Sync", "Dina", "room a", "pending"),
            booking("b2", "Planning", "Budi", "Room B", "approved"),
            booking("b3", "Retro", "Sari", "Board Room", "rejected"),
            booking("b4", "Demo", "dina", "Room C", "completed"),
            booking("b5", "Offsite", "Eko", "Room A", "archived"),
        ]
    }

    #[test]
    fn empty_search_and_all_is_identity() {
        let bookings = sample();
        assert_eq!(bookings, filter_bookings(&bookings, &FilterCriteria::default()));
        assert!(!FilterCriteria::default().is_active());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let bookings = sample();
        let by_room = filter_bookings(&bookings, &FilterCriteria::new("ROOM A", "all"));
        let ids: Vec<_> = by_room.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(vec!["b1", "b5"], ids);

        let by_name = filter_bookings(&bookings, &FilterCriteria::new("DINA", "all"));
        assert_eq!(2, by_name.len());

        let by_title = filter_bookings(&bookings, &FilterCriteria::new("retro", "all"));
        assert_eq!("b3", by_title[0].id);
    }

    #[test]
    fn status_and_search_combine() {
        let bookings = sample();
        let criteria = FilterCriteria::new("room", "approved");
        let hits = filter_bookings(&bookings, &criteria);
        assert_eq!(1, hits.len());
        assert_eq!("b2", hits[0].id);
        assert!(criteria.is_active());
    }

    #[test]
    fn unknown_status_can_be_filtered_verbatim() {
        let hits = filter_bookings(&sample(), &FilterCriteria::new("", "archived"));
        assert_eq!(vec!["b5".to_string()], hits.into_iter().map(|b| b.id).collect::<Vec<_>>());
    }

    #[test]
    fn filtering_is_idempotent() {
        let bookings = sample();
        let criteria = FilterCriteria::new("o", "all");
        let once = filter_bookings(&bookings, &criteria);
        let twice = filter_bookings(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn summary_counts_each_known_status() {
        let summary = BookingSummary::from_bookings(&sample());
        assert_eq!(
            BookingSummary {
                total: 5,
                pending: 1,
                approved: 1,
                rejected: 1,
                completed: 1,
            },
            summary
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        static STATUSES: [&str; 6] = ["pending", "approved", "rejected", "completed", "archived", "all"];

        fn arb_booking() -> impl Strategy<Value = Booking> {
            (
                "[a-z0-9]{1,6}",
                "[A-Za-z ]{0,12}",
                "[A-Za-z ]{0,12}",
                "[A-Za-z ]{0,12}",
                prop::sample::select(&STATUSES[..5]),
            )
                .prop_map(|(id, title, name, room, status)| booking(&id, &title, &name, &room, status))
        }

        fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
            ("[A-Za-z ]{0,3}", prop::sample::select(&STATUSES[..]))
                .prop_map(|(search, status)| FilterCriteria::new(search, status))
        }

        proptest! {
            #[test]
            fn empty_search_with_all_returns_input(bookings in prop::collection::vec(arb_booking(), 0..20)) {
                prop_assert_eq!(&bookings, &filter_bookings(&bookings, &FilterCriteria::new("", "all")));
            }

            #[test]
            fn filtering_twice_changes_nothing(
                bookings in prop::collection::vec(arb_booking(), 0..20),
                criteria in arb_criteria(),
            ) {
                let once = filter_bookings(&bookings, &criteria);
                prop_assert_eq!(&once, &filter_bookings(&once, &criteria));
            }

            #[test]
            fn result_keeps_input_order(
                bookings in prop::collection::vec(arb_booking(), 0..20),
                criteria in arb_criteria(),
            ) {
                let hits = filter_bookings(&bookings, &criteria);
                let mut rest = bookings.iter();
                for hit in &hits {
                    prop_assert!(rest.any(|b| b == hit));
                    prop_assert!(criteria.matches(hit));
                }
            }

            #[test]
            fn summary_total_is_list_length(bookings in prop::collection::vec(arb_booking(), 0..20)) {
                let summary = BookingSummary::from_bookings(&bookings);
                prop_assert_eq!(bookings.len(), summary.total);
                prop_assert!(summary.pending + summary.approved + summary.rejected + summary.completed <= summary.total);
            }
        }
    }
}
