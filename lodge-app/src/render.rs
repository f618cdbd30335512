//! Plain-text tables for the terminal.

use lodge_core::booking::BookingTotals;
use lodge_core::routing::Breadcrumb;
use lodge_shared::{AuthUser, Booking, Country, Customer, GuestHouse, Room, RoomType};
use lodge_views::{DashboardSummary, NavItem};
use tabled::{builder::Builder, settings::Style};

fn finish(builder: Builder) -> String {
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn bookings(rows: &[&Booking]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "ID", "Booking", "Customer", "Room Type", "Room", "Method", "Check-in", "Check-out",
        "Guests", "Bed-nights", "Ref",
    ]);
    for booking in rows {
        let totals = BookingTotals::of(booking);
        builder.push_record([
            booking.id.to_string(),
            booking.booking_name.clone(),
            or_dash(booking.customer_name()),
            or_dash(booking.room_type_name()),
            or_dash(booking.room_no()),
            booking.booking_method.to_string(),
            booking.check_in_date.to_string(),
            booking.check_out_date.to_string(),
            totals.total_guests.to_string(),
            totals.bed_nights.to_string(),
            or_dash(booking.booking_ref.as_deref()),
        ]);
    }
    finish(builder)
}

pub fn countries(rows: &[&Country]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Country", "Active"]);
    for country in rows {
        builder.push_record([
            country.id.to_string(),
            country.country_name.clone(),
            yes_no(country.is_active),
        ]);
    }
    finish(builder)
}

pub fn room_types(rows: &[&RoomType]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Total Rooms"]);
    for room_type in rows {
        builder.push_record([
            room_type.id.to_string(),
            room_type.name.clone(),
            room_type.total_rooms.to_string(),
        ]);
    }
    finish(builder)
}

pub fn rooms(rows: &[&Room]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Room No", "Room Type", "Size"]);
    for room in rows {
        builder.push_record([
            room.id.to_string(),
            room.room_no.clone(),
            or_dash(room.room_type_name()),
            or_dash(room.size.as_deref()),
        ]);
    }
    finish(builder)
}

pub fn operators(rows: &[&Customer]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Type", "Contact", "Email", "Phone", "Country", "Active"]);
    for customer in rows {
        builder.push_record([
            customer.id.to_string(),
            customer.name.clone(),
            or_dash(customer.customer_type.as_deref()),
            or_dash(customer.contact_person.as_deref()),
            or_dash(customer.email.as_deref()),
            or_dash(customer.phone.as_deref()),
            or_dash(customer.country_name()),
            yes_no(customer.is_active),
        ]);
    }
    finish(builder)
}

pub fn profile(gh: &GuestHouse) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let fields = [
        ("Guest House Name", gh.gh_name.as_str()),
        ("Contact Number", gh.contact_number.as_str()),
        ("Email", gh.email.as_str()),
        ("Website", gh.website.as_str()),
        ("Address", gh.address.as_str()),
        ("TIN No", gh.tin_no.as_str()),
        ("Permit No", gh.permit_no.as_str()),
        ("Company Name", gh.company_name.as_str()),
        ("Company Reg No", gh.company_reg_no.as_str()),
        ("Logo", gh.logo_url.as_deref().unwrap_or("")),
    ];
    for (label, value) in fields {
        builder.push_record([label.to_string(), or_dash(Some(value))]);
    }
    finish(builder)
}

pub fn user(user: &AuthUser) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Email", "Created"]);
    builder.push_record([
        user.id.to_string(),
        or_dash(user.email.as_deref()),
        user.created_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into()),
    ]);
    finish(builder)
}

pub fn nav(items: &[NavItem]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["", "Section", "Path"]);
    for item in items {
        let marker = if item.active { ">" } else { "" };
        builder.push_record([marker, item.label, item.path]);
    }
    finish(builder)
}

pub fn breadcrumbs(crumbs: &[Breadcrumb]) -> String {
    crumbs
        .iter()
        .map(|crumb| crumb.label)
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn summary(summary: &DashboardSummary) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Bookings", "Guests", "Bed-nights", "Upcoming Arrivals"]);
    builder.push_record([
        summary.bookings.to_string(),
        summary.guests.to_string(),
        summary.bed_nights.to_string(),
        summary.upcoming_arrivals.to_string(),
    ]);
    finish(builder)
}

pub fn totals(totals: &BookingTotals) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Total Guests", "Bed-nights"]);
    builder.push_record([totals.total_guests.to_string(), totals.bed_nights.to_string()]);
    finish(builder)
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}
