use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use lodge_core::booking::{bed_nights, total_guests, BookingForm, BookingTotals};
use lodge_core::routing::Route;
use lodge_shared::BookingMethod;
use lodge_views::{BookingsView, Confirm};
use std::io::Write;
use uuid::Uuid;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct BookingsCommand {
    #[command(subcommand)]
    command: BookingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum BookingsSubcommand {
    /// List bookings, newest first
    List {
        /// Case-insensitive match on name, reference or customer
        #[arg(long, short)]
        search: Option<String>,
    },
    Create(BookingArgs),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: BookingArgs,
    },
    Delete { id: Uuid },
    /// Guests and bed-nights for a stay, without saving anything
    Quote(QuoteArgs),
    /// Rooms offered for a room type
    Rooms {
        #[arg(long)]
        room_type: Option<Uuid>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Foreign Tour Operator
    Foreign,
    /// Local Tour Operator Direct Booking (FIT)
    Fit,
    /// Online Travel Agent (OTA)
    Ota,
}

impl From<MethodArg> for BookingMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Foreign => BookingMethod::ForeignTourOperator,
            MethodArg::Fit => BookingMethod::LocalTourOperatorFit,
            MethodArg::Ota => BookingMethod::OnlineTravelAgent,
        }
    }
}

#[derive(Debug, Args)]
struct BookingArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    customer: Option<Uuid>,
    #[arg(long)]
    guest_house: Option<Uuid>,
    #[arg(long)]
    room_type: Option<Uuid>,
    #[arg(long)]
    room: Option<Uuid>,
    #[arg(long)]
    country: Option<Uuid>,
    #[arg(long, value_enum)]
    method: Option<MethodArg>,
    #[arg(long = "ref")]
    booking_ref: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    check_in: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    check_out: Option<NaiveDate>,
    #[arg(long)]
    adults: Option<u32>,
    #[arg(long)]
    childs: Option<u32>,
    #[arg(long)]
    infants: Option<u32>,
    #[arg(long)]
    meal: Option<Uuid>,
    #[arg(long)]
    transfer: Option<Uuid>,
}

impl BookingArgs {
    /// Overwrites only the fields given on the command line.
    fn apply(self, form: &mut BookingForm) {
        if let Some(name) = self.name {
            form.booking_name = name;
        }
        if let Some(method) = self.method {
            form.booking_method = method.into();
        }
        if let Some(booking_ref) = self.booking_ref {
            form.booking_ref = booking_ref;
        }
        form.customer_id = self.customer.or(form.customer_id);
        form.gh_id = self.guest_house.or(form.gh_id);
        form.room_type_id = self.room_type.or(form.room_type_id);
        form.room_id = self.room.or(form.room_id);
        form.country_id = self.country.or(form.country_id);
        form.check_in_date = self.check_in.or(form.check_in_date);
        form.check_out_date = self.check_out.or(form.check_out_date);
        form.adults = self.adults.unwrap_or(form.adults);
        form.childs = self.childs.unwrap_or(form.childs);
        form.infants = self.infants.unwrap_or(form.infants);
        form.meal_id = self.meal.or(form.meal_id);
        form.transfer_id = self.transfer.or(form.transfer_id);
    }
}

#[derive(Debug, Args)]
struct QuoteArgs {
    #[arg(long)]
    check_in: Option<NaiveDate>,
    #[arg(long)]
    check_out: Option<NaiveDate>,
    #[arg(long, default_value_t = 0)]
    adults: u32,
    #[arg(long, default_value_t = 0)]
    childs: u32,
    #[arg(long, default_value_t = 0)]
    infants: u32,
}

pub async fn run(
    command: BookingsCommand,
    state: &mut AppState,
    confirm: &dyn Confirm,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    if let BookingsSubcommand::Quote(args) = &command.command {
        let totals = BookingTotals {
            total_guests: total_guests(args.adults, args.childs, args.infants),
            bed_nights: bed_nights(args.check_in, args.check_out),
        };
        writeln!(out, "{}", render::totals(&totals))?;
        return Ok(());
    }

    state.require(Route::Bookings)?;
    let mut view = BookingsView::new(state.api.clone(), state.view_lifetime());

    match command.command {
        BookingsSubcommand::List { search } => {
            super::load(&mut view.list, "bookings").await?;
            view.list.set_search(search.unwrap_or_default());
            writeln!(out, "{}", render::bookings(&view.list.filtered()))?;
        }
        BookingsSubcommand::Create(fields) => {
            super::create(&mut view.list, "booking", |form| fields.apply(form), out).await?;
        }
        BookingsSubcommand::Update { id, fields } => {
            super::update(&mut view.list, "booking", id, |form| fields.apply(form), out).await?;
        }
        BookingsSubcommand::Delete { id } => {
            super::delete(&mut view.list, "booking", id, confirm, out).await?;
        }
        BookingsSubcommand::Rooms { room_type } => {
            view.load().await;
            view.list.open_editor(None);
            if let Some(form) = view.list.form_mut() {
                form.room_type_id = room_type;
            }
            writeln!(out, "{}", render::rooms(&view.room_choices()))?;
        }
        BookingsSubcommand::Quote(_) => {}
    }
    Ok(())
}
