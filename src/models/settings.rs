use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_business_name")]
    pub business_name: String,
    // 0.35 == 35%
    pub deposit_percent: Decimal,
    pub deposit_min: Decimal,
    pub hours_open: u32,
    pub hours_close: u32,
}

fn default_business_name() -> String {
    "Salon".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business_name: default_business_name(),
            deposit_percent: Decimal::new(35, 2),
            deposit_min: Decimal::new(1500, 2),
            hours_open: 9,
            hours_close: 18,
        }
    }
}

impl Settings {
    pub fn opening_hours(&self) -> OpeningHours {
        OpeningHours {
            open: self.hours_open,
            close: self.hours_close,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.deposit_percent < Decimal::ZERO || self.deposit_percent > Decimal::ONE {
            return Err(AppError::validation(
                "deposit_percent",
                "deposit percent must be between 0 and 1",
            ));
        }
        if self.deposit_min < Decimal::ZERO {
            return Err(AppError::validation(
                "deposit_min",
                "deposit minimum cannot be negative",
            ));
        }
        if self.hours_open > 24 || self.hours_close > 24 {
            return Err(AppError::validation(
                "hours",
                "opening hours must be within 0-24",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub open: u32,
    pub close: u32,
}
