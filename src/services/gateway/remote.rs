use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::PersistenceGateway;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Block, Booking, BookingReceipt, BookingStatus, NewBooking, Service, Settings, TimeSlot,
};

pub struct RemoteGateway {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: BookingStatus,
}

#[derive(Serialize)]
struct BlockRequest<'a> {
    date: NaiveDate,
    notes: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    from: Option<BookingStatus>,
    #[serde(default)]
    to: Option<BookingStatus>,
}

impl RemoteGateway {
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            // The backend has already acted on the request; an unreadable
            // reply must not send the call to another store.
            return response.json::<T>().await.map_err(|e| {
                if e.is_decode() {
                    AppError::Backend(format!("unreadable {status} reply: {e}"))
                } else {
                    AppError::from(e)
                }
            });
        }
        Err(decode_error(response).await)
    }
}

async fn decode_error(response: Response) -> AppError {
    let status = response.status();
    let body = match response.json::<ErrorBody>().await {
        Ok(body) => body,
        Err(_) => return unrecognized(status, String::new()),
    };

    tracing::debug!(%status, kind = ?body.kind, error = %body.error, "backend rejected request");

    match (body.kind.as_deref(), status) {
        (Some("validation"), _) => AppError::Validation {
            field: field_name(body.field.as_deref()),
            message: body.error,
        },
        (Some("not_available"), _) => AppError::NotAvailable(body.error),
        (Some("invalid_transition"), _) => match (body.from, body.to) {
            (Some(from), Some(to)) => AppError::InvalidTransition { from, to },
            _ => unrecognized(status, body.error),
        },
        (Some("conflict"), _) => AppError::Conflict(body.error),
        (Some("not_found"), _) | (None, StatusCode::NOT_FOUND) => AppError::NotFound(body.error),
        _ => unrecognized(status, body.error),
    }
}

fn unrecognized(status: StatusCode, error: String) -> AppError {
    let message = format!("backend returned {status}: {error}");
    if status.is_server_error() {
        AppError::Gateway(message)
    } else {
        AppError::Backend(message)
    }
}

fn field_name(field: Option<&str>) -> &'static str {
    match field {
        Some("name") => "name",
        Some("phone") => "phone",
        Some("email") => "email",
        Some("service_id") => "service_id",
        Some("date") => "date",
        Some("time") => "time",
        Some("status") => "status",
        Some("deposit_percent") => "deposit_percent",
        Some("deposit_min") => "deposit_min",
        Some("hours") => "hours",
        _ => "request",
    }
}

#[async_trait]
impl PersistenceGateway for RemoteGateway {
    async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.send(self.client.get(self.url("/services"))).await
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        self.send(self.client.get(self.url("/bookings"))).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> AppResult<BookingReceipt> {
        self.send(self.client.post(self.url("/bookings")).json(booking))
            .await
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        let url = self.url(&format!("/bookings/{id}"));
        self.send(self.client.patch(url).json(&StatusUpdate { status }))
            .await
    }

    async fn list_blocks(&self) -> AppResult<Vec<Block>> {
        self.send(self.client.get(self.url("/blocks"))).await
    }

    async fn create_block(&self, date: NaiveDate, notes: &str) -> AppResult<Block> {
        self.send(
            self.client
                .post(self.url("/blocks"))
                .json(&BlockRequest { date, notes }),
        )
        .await
    }

    async fn get_settings(&self) -> AppResult<Settings> {
        self.send(self.client.get(self.url("/settings"))).await
    }

    async fn put_settings(&self, settings: &Settings) -> AppResult<Settings> {
        self.send(self.client.put(self.url("/settings")).json(settings))
            .await
    }

    async fn get_availability(&self, date: NaiveDate) -> AppResult<Vec<TimeSlot>> {
        let date = date.format("%Y-%m-%d").to_string();
        self.send(
            self.client
                .get(self.url("/availability"))
                .query(&[("date", date.as_str())]),
        )
        .await
    }
}
