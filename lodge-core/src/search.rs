use lodge_shared::{Booking, Country, Customer, Room, RoomType};

/// The display fields a list's search box looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// Case-insensitive substring match against any search field. An empty term
/// matches everything.
pub fn matches<T: Searchable + ?Sized>(item: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    item.search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Rows matching `term`, in their original order. The source is left untouched.
pub fn filter<'a, T, I>(items: I, term: &str) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().filter(|item| matches(*item, term)).collect()
}

impl Searchable for Booking {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.booking_name.as_str()),
            self.booking_ref.as_deref(),
            self.customer_name(),
        ]
    }
}

impl Searchable for Country {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.country_name.as_str())]
    }
}

impl Searchable for RoomType {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str())]
    }
}

impl Searchable for Room {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.room_no.as_str()), self.room_type_name()]
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.customer_type.as_deref(),
            self.email.as_deref(),
            self.country_name(),
        ]
    }
}
