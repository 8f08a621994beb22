use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Blackout,
    Other,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Blackout => "blackout",
            BlockType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "blackout" => BlockType::Blackout,
            _ => BlockType::Other,
        }
    }
}
