//! Booking form state and the derived party/stay figures.

use chrono::NaiveDate;
use lodge_shared::{Booking, BookingMethod, Room};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::forms::{blank_to_null, EntityForm};

/// Everyone in the party, infants included.
pub fn total_guests(adults: u32, childs: u32, infants: u32) -> u32 {
    adults.saturating_add(childs).saturating_add(infants)
}

/// Nights billed for a stay: the whole-day span minus one, never negative.
/// Zero while either date is still missing.
pub fn bed_nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => {
            let nights = (check_out - check_in).num_days() - 1;
            u32::try_from(nights.max(0)).unwrap_or(u32::MAX)
        }
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingTotals {
    pub total_guests: u32,
    pub bed_nights: u32,
}

impl BookingTotals {
    pub fn of(booking: &Booking) -> Self {
        Self {
            total_guests: total_guests(booking.adults, booking.childs, booking.infants),
            bed_nights: bed_nights(Some(booking.check_in_date), Some(booking.check_out_date)),
        }
    }
}

/// Editable booking fields. References left unset are written as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub booking_name: String,
    pub customer_id: Option<Uuid>,
    pub gh_id: Option<Uuid>,
    pub room_type_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub country_id: Option<Uuid>,
    pub booking_method: BookingMethod,
    pub booking_ref: String,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub adults: u32,
    pub childs: u32,
    pub infants: u32,
    pub meal_id: Option<Uuid>,
    pub transfer_id: Option<Uuid>,
}

impl BookingForm {
    /// Read-only figures shown next to the inputs.
    pub fn totals(&self) -> BookingTotals {
        BookingTotals {
            total_guests: total_guests(self.adults, self.childs, self.infants),
            bed_nights: bed_nights(self.check_in_date, self.check_out_date),
        }
    }

    /// Rooms offered by the room picker: those of the selected room type, or
    /// all of them while no type is chosen.
    pub fn room_choices<'a>(&self, rooms: &'a [Room]) -> Vec<&'a Room> {
        rooms
            .iter()
            .filter(|room| match self.room_type_id {
                Some(type_id) => room.room_type_id == Some(type_id),
                None => true,
            })
            .collect()
    }
}

impl EntityForm for BookingForm {
    type Entity = Booking;

    fn from_entity(booking: &Booking) -> Self {
        Self {
            booking_name: booking.booking_name.clone(),
            customer_id: booking.customer_id,
            gh_id: booking.gh_id,
            room_type_id: booking.room_type_id,
            room_id: booking.room_id,
            country_id: booking.country_id,
            booking_method: booking.booking_method,
            booking_ref: booking.booking_ref.clone().unwrap_or_default(),
            check_in_date: Some(booking.check_in_date),
            check_out_date: Some(booking.check_out_date),
            adults: booking.adults,
            childs: booking.childs,
            infants: booking.infants,
            meal_id: booking.meal_id,
            transfer_id: booking.transfer_id,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.booking_name.is_empty() {
            return Err(ValidationError::MissingField("booking_name"));
        }
        if self.check_in_date.is_none() {
            return Err(ValidationError::MissingField("check_in_date"));
        }
        if self.check_out_date.is_none() {
            return Err(ValidationError::MissingField("check_out_date"));
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        json!({
            "booking_name": self.booking_name,
            "customer_id": self.customer_id,
            "gh_id": self.gh_id,
            "room_type_id": self.room_type_id,
            "room_id": self.room_id,
            "country_id": self.country_id,
            "booking_method": self.booking_method,
            "booking_ref": blank_to_null(&self.booking_ref),
            "check_in_date": self.check_in_date,
            "check_out_date": self.check_out_date,
            "adults": self.adults,
            "childs": self.childs,
            "infants": self.infants,
            "meal_id": self.meal_id,
            "transfer_id": self.transfer_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_guests_is_plain_sum() {
        assert_eq!(total_guests(2, 1, 0), 3);
        for a in 0..5 {
            for c in 0..5 {
                for i in 0..5 {
                    assert_eq!(total_guests(a, c, i), a + c + i);
                }
            }
        }
    }

    #[test]
    fn test_bed_nights_five_day_span() {
        assert_eq!(bed_nights(Some(date(2024, 1, 10)), Some(date(2024, 1, 15))), 4);
    }

    #[test]
    fn test_bed_nights_clamps_at_zero() {
        let day = date(2024, 3, 1);
        assert_eq!(bed_nights(Some(day), Some(day)), 0);
        assert_eq!(bed_nights(Some(day), Some(date(2024, 3, 2))), 0);
        assert_eq!(bed_nights(Some(date(2024, 3, 9)), Some(day)), 0);
    }

    #[test]
    fn test_bed_nights_spans_month_and_leap_day() {
        assert_eq!(bed_nights(Some(date(2024, 2, 27)), Some(date(2024, 3, 2))), 3);
        assert_eq!(bed_nights(Some(date(2023, 12, 30)), Some(date(2024, 1, 3))), 3);
    }

    #[test]
    fn test_bed_nights_missing_date() {
        assert_eq!(bed_nights(None, Some(date(2024, 1, 15))), 0);
        assert_eq!(bed_nights(Some(date(2024, 1, 10)), None), 0);
        assert_eq!(bed_nights(None, None), 0);
    }

    #[test]
    fn test_form_validation_requires_name_and_dates() {
        let mut form = BookingForm::default();
        assert_eq!(form.validate(), Err(ValidationError::MissingField("booking_name")));

        form.booking_name = "Walk-in".into();
        assert_eq!(form.validate(), Err(ValidationError::MissingField("check_in_date")));

        form.check_in_date = Some(date(2024, 1, 10));
        assert_eq!(form.validate(), Err(ValidationError::MissingField("check_out_date")));

        form.check_out_date = Some(date(2024, 1, 12));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_payload_nulls_blank_references() {
        let form = BookingForm {
            booking_name: "Walk-in".into(),
            check_in_date: Some(date(2024, 1, 10)),
            check_out_date: Some(date(2024, 1, 12)),
            adults: 2,
            ..Default::default()
        };
        let payload = form.payload();
        assert_eq!(payload["booking_ref"], Value::Null);
        assert_eq!(payload["customer_id"], Value::Null);
        assert_eq!(payload["check_in_date"], "2024-01-10");
        assert_eq!(payload["booking_method"], "Foreign Tour Operator");
        assert_eq!(payload["adults"], 2);
        assert!(payload.get("total_guests").is_none());
        assert!(payload.get("bed_nights").is_none());
    }

    #[test]
    fn test_room_choices_follow_room_type() {
        let standard = Uuid::new_v4();
        let suite = Uuid::new_v4();
        let room = |no: &str, type_id: Uuid| Room {
            id: Uuid::new_v4(),
            room_no: no.into(),
            room_type_id: Some(type_id),
            size: None,
            room_type: None,
        };
        let rooms = vec![room("101", standard), room("102", standard), room("301", suite)];

        let mut form = BookingForm::default();
        assert_eq!(form.room_choices(&rooms).len(), 3);

        form.room_type_id = Some(suite);
        let choices = form.room_choices(&rooms);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].room_no, "301");
    }
}
