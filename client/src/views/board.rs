use domain::{
    datetime::format_date_time, filter_bookings, AdminAction, Booking, BookingSummary,
    FilterCriteria, StatusFilter,
};
use tracing::info;

use super::render_table;
use crate::{booking::BookingApi, error::ClientError};

/// Admin dashboard state: the last fetched bookings plus the search/status
/// criteria applied on top of them.
///
/// Every status change is followed by a full re-fetch; the local list is
/// never patched in place. Overlapping refreshes are not sequenced: whichever
/// response lands last wins.
pub struct AdminBoard<A> {
    api: A,
    bookings: Vec<Booking>,
    criteria: FilterCriteria,
}

impl<A: BookingApi> AdminBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            bookings: Vec::new(),
            criteria: FilterCriteria::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the list with the backend's. On failure the previous list stays.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.bookings = self.api.list_bookings().await?;
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
    }

    pub fn set_status_filter(&mut self, status: impl Into<StatusFilter>) {
        self.criteria.status = status.into();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Counts over the whole list, ignoring the current filter.
    pub fn summary(&self) -> BookingSummary {
        BookingSummary::from_bookings(&self.bookings)
    }

    pub fn visible(&self) -> Vec<Booking> {
        filter_bookings(&self.bookings, &self.criteria)
    }

    pub fn actions_for(&self, id: &str) -> &'static [AdminAction] {
        self.find(id)
            .map(|booking| booking.status.available_actions())
            .unwrap_or(&[])
    }

    /// Performs `action` on booking `id` and reloads the board.
    ///
    /// Actions the board would not offer are refused without a request.
    pub async fn apply(&mut self, id: &str, action: AdminAction) -> Result<Booking, ClientError> {
        let booking = self.find(id).ok_or_else(|| ClientError::not_on_board(id))?;
        let target = booking
            .status
            .apply(action)
            .map_err(|err| ClientError::transition(&err))?;

        let updated = self.api.update_booking_status(id, target).await?;
        info!(booking_id = id, %action, "admin action applied");
        self.refresh().await?;
        Ok(updated)
    }

    pub fn render(&self) -> String {
        let summary = self.summary();
        let visible = self.visible();

        let mut out = format!(
            "Total {}  Pending {}  Approved {}  Rejected {}  Completed {}\n",
            summary.total, summary.pending, summary.approved, summary.rejected, summary.completed
        );

        if visible.is_empty() {
            out.push_str(if self.criteria.is_active() {
                "No bookings found. Try adjusting your search or filter criteria"
            } else {
                "No bookings found"
            });
        } else {
            let rows: Vec<Vec<String>> = visible
                .iter()
                .map(|booking| {
                    let actions: Vec<&str> = booking
                        .status
                        .available_actions()
                        .iter()
                        .map(|action| action.verb())
                        .collect();
                    vec![
                        booking.id.clone(),
                        booking.title.clone(),
                        booking.name.clone(),
                        booking.rooms.name.clone(),
                        format!(
                            "{} to {}",
                            format_date_time(&booking.start_time),
                            format_date_time(&booking.end_time)
                        ),
                        booking.status.label().to_string(),
                        actions.join("/"),
                    ]
                })
                .collect();
            out.push_str(&render_table(
                &["ID", "TITLE", "ORGANIZER", "ROOM", "WHEN", "STATUS", "ACTIONS"],
                &rows,
            ));
        }

        out.push_str(&format!(
            "\nShowing {} of {} bookings",
            visible.len(),
            self.bookings.len()
        ));
        out
    }

    fn find(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }
}
