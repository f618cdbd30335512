use chrono::NaiveDate;
use lodge_core::booking::{BookingForm, BookingTotals};
use lodge_core::DataApi;
use lodge_shared::Booking;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::entity_list::{EntityList, LoadOutcome};

/// Figures on the dashboard landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub bookings: usize,
    pub guests: u32,
    pub bed_nights: u32,
    /// Bookings checking in on or after the reference day.
    pub upcoming_arrivals: usize,
}

impl DashboardSummary {
    pub fn of(bookings: &[Booking], from: NaiveDate) -> Self {
        bookings.iter().fold(Self::default(), |mut summary, booking| {
            let totals = BookingTotals::of(booking);
            summary.bookings += 1;
            summary.guests = summary.guests.saturating_add(totals.total_guests);
            summary.bed_nights = summary.bed_nights.saturating_add(totals.bed_nights);
            if booking.check_in_date >= from {
                summary.upcoming_arrivals += 1;
            }
            summary
        })
    }
}

pub struct DashboardHome {
    bookings: EntityList<BookingForm>,
}

impl DashboardHome {
    pub fn new(api: Arc<dyn DataApi>, lifetime: CancellationToken) -> Self {
        Self { bookings: EntityList::with_lifetime(api, "booking", lifetime) }
    }

    pub async fn load(&mut self) -> LoadOutcome {
        self.bookings.load().await
    }

    pub fn summary(&self, from: NaiveDate) -> DashboardSummary {
        DashboardSummary::of(self.bookings.items(), from)
    }
}
