use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::{BookingStatus, NewBooking, Service, Settings, TimeSlot};
use crate::services::availability;
use crate::services::booking::{
    parse_date_field, parse_time_field, validate_customer, BookingForm, SubmittedBooking,
};
use crate::services::deposit::{calculate_deposit, DepositQuote};
use crate::services::gateway::PersistenceGateway;
use crate::services::restriction::parse_restriction;

#[derive(Debug, Clone)]
pub struct BookingSession {
    services: Vec<Service>,
    settings: Settings,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub after_cutoff: bool,
}

impl BookingSession {
    pub fn new(services: Vec<Service>, settings: Settings) -> Self {
        Self { services, settings }
    }

    pub async fn load(gateway: &dyn PersistenceGateway) -> AppResult<Self> {
        let services = gateway.list_services().await?;
        let settings = gateway.get_settings().await?;
        tracing::debug!(services = services.len(), "booking session loaded");
        Ok(Self::new(services, settings))
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn quote(&self, service: &Service) -> DepositQuote {
        calculate_deposit(
            service.price,
            self.settings.deposit_percent,
            self.settings.deposit_min,
        )
    }

    pub async fn slots_for(
        &self,
        gateway: &dyn PersistenceGateway,
        date: NaiveDate,
        service_id: Option<&str>,
    ) -> AppResult<Vec<SlotView>> {
        let restriction = service_id
            .and_then(|id| self.service(id))
            .and_then(|service| parse_restriction(&service.notes));

        let slots = gateway.get_availability(date).await?;
        Ok(slots
            .into_iter()
            .map(|slot| {
                let after_cutoff = match (restriction, parse_time_field(Some(slot.time.as_str()))) {
                    (Some(r), Ok((hour, _))) => r.is_violated_by(hour),
                    _ => false,
                };
                SlotView { slot, after_cutoff }
            })
            .collect())
    }

    /// Validates `form` fail-fast and submits it. Customer fields and the
    /// service are checked before the gateway is contacted at all; a blocked
    /// date is reported before a missing or taken time.
    pub async fn submit(
        &self,
        gateway: &dyn PersistenceGateway,
        form: &BookingForm,
    ) -> AppResult<SubmittedBooking> {
        let customer = validate_customer(&form.customer)?;

        let service_id = form
            .service_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("service_id", "select a service"))?;
        let service = self
            .service(service_id)
            .ok_or_else(|| AppError::validation("service_id", "unknown service"))?;

        let date = parse_date_field(form.date.as_deref())?;
        let blocks = gateway.list_blocks().await?;
        if availability::is_blocked(date, &blocks) {
            return Err(AppError::NotAvailable(format!(
                "{date} is closed for bookings"
            )));
        }

        let (hour, time) = parse_time_field(form.time.as_deref())?;
        let slots = gateway.get_availability(date).await?;
        if !slots.iter().any(|slot| slot.time == time && slot.available) {
            return Err(AppError::NotAvailable(format!(
                "{date} at {time} is not available"
            )));
        }

        let quote = self.quote(service);

        let warning = parse_restriction(&service.notes)
            .filter(|r| r.is_violated_by(hour))
            .map(|r| r.warning(&time));
        if let Some(warning) = &warning {
            tracing::warn!(service_id = %service.id, %time, "{warning}");
        }

        let request = NewBooking {
            service_id: service.id.clone(),
            service_title: service.title.clone(),
            date,
            time,
            customer,
            notes: form.notes.as_deref().map(str::trim).unwrap_or_default().to_string(),
            status: BookingStatus::DepositPending,
            amount_due: service.price,
            deposit_amount: quote.deposit,
            deposit_percent: self.settings.deposit_percent,
            created_at: Utc::now(),
        };

        let receipt = gateway.create_booking(&request).await?;
        Ok(SubmittedBooking { receipt, warning })
    }
}
