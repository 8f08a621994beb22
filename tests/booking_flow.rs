use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use salon::errors::{AppError, AppResult};
use salon::models::{
    Block, Booking, BookingReceipt, BookingStatus, NewBooking, Service, Settings, TimeSlot,
};
use salon::services::booking::{BookingForm, CustomerForm};
use salon::services::gateway::{LocalGateway, PersistenceGateway};
use salon::services::session::BookingSession;

// ── Counting gateway ──

/// Delegates to a local store and counts every call made through it.
struct CountingGateway {
    inner: LocalGateway,
    calls: AtomicUsize,
    creates: AtomicUsize,
}

impl CountingGateway {
    fn new() -> Self {
        Self {
            inner: LocalGateway::open(":memory:").unwrap(),
            calls: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
        }
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersistenceGateway for CountingGateway {
    async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.tick();
        self.inner.list_services().await
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        self.tick();
        self.inner.list_bookings().await
    }

    async fn create_booking(&self, booking: &NewBooking) -> AppResult<BookingReceipt> {
        self.tick();
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_booking(booking).await
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        self.tick();
        self.inner.update_booking_status(id, status).await
    }

    async fn list_blocks(&self) -> AppResult<Vec<Block>> {
        self.tick();
        self.inner.list_blocks().await
    }

    async fn create_block(&self, date: NaiveDate, notes: &str) -> AppResult<Block> {
        self.tick();
        self.inner.create_block(date, notes).await
    }

    async fn get_settings(&self) -> AppResult<Settings> {
        self.tick();
        self.inner.get_settings().await
    }

    async fn put_settings(&self, settings: &Settings) -> AppResult<Settings> {
        self.tick();
        self.inner.put_settings(settings).await
    }

    async fn get_availability(&self, date: NaiveDate) -> AppResult<Vec<TimeSlot>> {
        self.tick();
        self.inner.get_availability(date).await
    }
}

// ── Helpers ──

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn form(service_id: &str, day: &str, time: &str, email: &str) -> BookingForm {
    BookingForm {
        service_id: Some(service_id.to_string()),
        date: Some(day.to_string()),
        time: Some(time.to_string()),
        customer: CustomerForm {
            name: Some("Alice Johnson".to_string()),
            phone: Some("555-123-4567".to_string()),
            email: Some(email.to_string()),
        },
        notes: None,
    }
}

// ── Tests ──

#[tokio::test]
async fn test_end_to_end_smedium_bohemian_fulani() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();

    let service = session.service("smedium-bohemian-fulani").unwrap();
    assert_eq!(service.title, "Smedium Bohemian Fulani");
    assert_eq!(session.settings().deposit_percent, Decimal::from_str("0.35").unwrap());
    assert_eq!(session.settings().deposit_min, Decimal::from_str("15").unwrap());

    let submitted = session
        .submit(
            &gw,
            &form("smedium-bohemian-fulani", "2025-11-15", "09:00", "alice@example.com"),
        )
        .await
        .unwrap();

    assert_eq!(submitted.receipt.status, BookingStatus::DepositPending);
    assert_eq!(submitted.receipt.deposit_amount, Decimal::from_str("87.50").unwrap());
    assert_eq!(submitted.receipt.amount_due, Decimal::from_str("250").unwrap());
    assert!(submitted.warning.is_none());

    let slots = gw.get_availability(date("2025-11-15")).await.unwrap();
    let nine = slots.iter().find(|s| s.time == "09:00").unwrap();
    assert!(!nine.available);

    let bookings = gw.list_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].service_title, "Smedium Bohemian Fulani");
    assert_eq!(bookings[0].customer.name, "Alice Johnson");
}

#[tokio::test]
async fn test_invalid_email_never_reaches_gateway() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();
    let before = gw.calls();

    let err = session
        .submit(
            &gw,
            &form("smedium-bohemian-fulani", "2025-11-15", "09:00", "not-an-email"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { field: "email", .. }));
    assert_eq!(gw.calls(), before);
}

#[tokio::test]
async fn test_unknown_service_never_reaches_gateway() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();
    let before = gw.calls();

    let err = session
        .submit(&gw, &form("", "2025-11-15", "09:00", "alice@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { field: "service_id", .. }));
    assert_eq!(gw.calls(), before);
}

#[tokio::test]
async fn test_taken_slot_is_not_submitted() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();

    session
        .submit(
            &gw,
            &form("medium-knotless-twists", "2025-11-20", "10:00", "alice@example.com"),
        )
        .await
        .unwrap();

    let err = session
        .submit(
            &gw,
            &form("large-bohemian-barbie", "2025-11-20", "10:00", "bob@example.com"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotAvailable(_)));
    assert_eq!(gw.creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_blocked_date_is_not_submitted() {
    let gw = CountingGateway::new();
    gw.create_block(date("2025-11-27"), "Thanksgiving").await.unwrap();
    let session = BookingSession::load(&gw).await.unwrap();

    let err = session
        .submit(
            &gw,
            &form("medium-knotless-twists", "2025-11-27", "10:00", "alice@example.com"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotAvailable(_)));
    assert_eq!(gw.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cutoff_is_advisory() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();

    // small-knotless-twists carries "DO NOT BOOK AFTER 8AM"
    let submitted = session
        .submit(
            &gw,
            &form("small-knotless-twists", "2025-11-15", "9:00", "alice@example.com"),
        )
        .await
        .unwrap();

    assert_eq!(submitted.receipt.status, BookingStatus::DepositPending);
    let warning = submitted.warning.unwrap();
    assert!(warning.contains("09:00"), "{warning}");
}

#[tokio::test]
async fn test_cancelled_booking_reopens_slot() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();

    let first = session
        .submit(
            &gw,
            &form("mens-two-strand", "2025-11-18", "11:00", "alice@example.com"),
        )
        .await
        .unwrap();
    gw.update_booking_status(&first.receipt.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    let second = session
        .submit(
            &gw,
            &form("mens-two-strand", "2025-11-18", "11:00", "bob@example.com"),
        )
        .await
        .unwrap();
    assert_ne!(first.receipt.id, second.receipt.id);
}

#[tokio::test]
async fn test_slots_for_service_flags_cutoff() {
    let gw = CountingGateway::new();
    let session = BookingSession::load(&gw).await.unwrap();

    let slots = session
        .slots_for(&gw, date("2025-11-15"), Some("mens-two-strand"))
        .await
        .unwrap();
    let flagged: Vec<&str> = slots
        .iter()
        .filter(|s| s.after_cutoff)
        .map(|s| s.slot.time.as_str())
        .collect();
    assert_eq!(flagged, vec!["16:00", "17:00"]);

    let unflagged = session
        .slots_for(&gw, date("2025-11-15"), None)
        .await
        .unwrap();
    assert!(unflagged.iter().all(|s| !s.after_cutoff));
}
