//! Shared fixtures and an in-memory backend for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::BookingResult;
use crate::net::api::{CreatedReservation, ReservationApi};
use crate::net::types::{ExpressMatch, Id, Reservation, ReservationRequest, Restaurant, Table};
use crate::state::query::AvailabilityQuery;

#[must_use]
pub fn table(id: Id, label: &str, capacity: u32) -> Table {
    Table { id, table_number: label.into(), capacity, x: 10.0, y: 10.0 }
}

/// "La Caleta" (id 1) with tables 7/A3 (4 seats), 8/A4 (2) and 9/B1 (6).
#[must_use]
pub fn la_caleta() -> Restaurant {
    Restaurant {
        id: 1,
        name: "La Caleta".into(),
        cuisine: Some("Marinos y Pescados".into()),
        category: None,
        address: Some("Malecón 123, Ilo".into()),
        location: None,
        rating: Some(4.7),
        image: None,
        phone: None,
        opening_hours: None,
        price_range: Some("$$".into()),
        description: None,
        tables: vec![table(7, "A3", 4), table(8, "A4", 2), table(9, "B1", 6)],
    }
}

type AvailabilityKey = (String, String, u32);

/// Scripted backend. Availability answers are keyed by (date, time, guests)
/// and can be delayed to simulate slow responses.
#[derive(Default)]
pub struct MockApi {
    restaurants: Vec<Restaurant>,
    availability: Mutex<HashMap<AvailabilityKey, (Duration, BookingResult<Vec<Table>>)>>,
    create_results: Mutex<VecDeque<BookingResult<CreatedReservation>>>,
    reservations: Vec<Reservation>,
    express: Vec<ExpressMatch>,
    pub created: Mutex<Vec<(String, ReservationRequest)>>,
    pub cancelled: Mutex<Vec<Id>>,
    pub express_queries: Mutex<Vec<AvailabilityKey>>,
    pub availability_calls: AtomicUsize,
}

impl MockApi {
    #[must_use]
    pub fn with_restaurant(restaurant: Restaurant) -> Self {
        Self { restaurants: vec![restaurant], ..Self::default() }
    }

    #[must_use]
    pub fn with_reservations(mut self, reservations: Vec<Reservation>) -> Self {
        self.reservations = reservations;
        self
    }

    #[must_use]
    pub fn with_express(mut self, express: Vec<ExpressMatch>) -> Self {
        self.express = express;
        self
    }

    pub fn answer(&self, date: &str, time: &str, guests: u32, delay: Duration, result: BookingResult<Vec<Table>>) {
        self.availability
            .lock()
            .unwrap()
            .insert((date.to_owned(), time.to_owned(), guests), (delay, result));
    }

    pub fn push_create_result(&self, result: BookingResult<CreatedReservation>) {
        self.create_results.lock().unwrap().push_back(result);
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ReservationApi for MockApi {
    async fn list_restaurants(&self) -> BookingResult<Vec<Restaurant>> {
        Ok(self.restaurants.clone())
    }

    async fn fetch_restaurant(&self, restaurant_id: Id) -> BookingResult<Restaurant> {
        self.restaurants
            .iter()
            .find(|r| r.id == restaurant_id)
            .cloned()
            .ok_or_else(|| crate::error::BookingError::Api { status: 404, message: "not found".into() })
    }

    async fn check_availability(&self, query: &AvailabilityQuery) -> BookingResult<Vec<Table>> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .availability
            .lock()
            .unwrap()
            .get(&(query.date.clone(), query.time.clone(), query.guests))
            .cloned();
        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Ok(Vec::new())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn search_express(&self, date: &str, time: &str, guests: u32) -> BookingResult<Vec<ExpressMatch>> {
        self.express_queries
            .lock()
            .unwrap()
            .push((date.to_owned(), time.to_owned(), guests));
        Ok(self.express.clone())
    }

    async fn create_reservation(
        &self,
        token: &str,
        request: &ReservationRequest,
    ) -> BookingResult<CreatedReservation> {
        self.created
            .lock()
            .unwrap()
            .push((token.to_owned(), request.clone()));
        self.create_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CreatedReservation { id: Some(101), status: Some("confirmed".into()) }))
    }

    async fn list_reservations(&self, _token: &str) -> BookingResult<Vec<Reservation>> {
        Ok(self.reservations.clone())
    }

    async fn cancel_reservation(&self, _token: &str, reservation_id: Id) -> BookingResult<()> {
        self.cancelled.lock().unwrap().push(reservation_id);
        Ok(())
    }
}
