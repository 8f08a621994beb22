use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub duration: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BohemianBarbie,
    KnotlessTwists,
    FulaniExtras,
    MensStyles,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BohemianBarbie => "bohemian_barbie",
            Category::KnotlessTwists => "knotless_twists",
            Category::FulaniExtras => "fulani_extras",
            Category::MensStyles => "mens_styles",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bohemian_barbie" => Some(Category::BohemianBarbie),
            "knotless_twists" => Some(Category::KnotlessTwists),
            "fulani_extras" => Some(Category::FulaniExtras),
            "mens_styles" => Some(Category::MensStyles),
            _ => None,
        }
    }
}
