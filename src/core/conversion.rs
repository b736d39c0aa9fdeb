//! Conversion request and result types

use crate::error::ConversionError;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Amount as received from a caller, either already numeric or raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn parse(&self) -> Result<f64, ConversionError> {
        let value = match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ConversionError::InvalidAmount(s.clone()))?,
        };
        if !value.is_finite() {
            return Err(ConversionError::InvalidAmount(self.to_string()));
        }
        Ok(value)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{n}"),
            Amount::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub converted: f64,
    pub rate: f64,
}

/// Outcome of a conversion. Both variants serialize with `success` and its
/// older wire name `result`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Converted(Conversion),
    Failed { error: String },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Converted(_))
    }
}

impl From<Result<Conversion, ConversionError>> for ConversionResult {
    fn from(result: Result<Conversion, ConversionError>) -> Self {
        match result {
            Ok(conversion) => ConversionResult::Converted(conversion),
            Err(e) => ConversionResult::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl Serialize for ConversionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConversionResult::Converted(c) => {
                let mut map = serializer.serialize_map(Some(7))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("result", &true)?;
                map.serialize_entry("from", &c.from)?;
                map.serialize_entry("to", &c.to)?;
                map.serialize_entry("amount", &c.amount)?;
                map.serialize_entry("converted", &c.converted)?;
                map.serialize_entry("rate", &c.rate)?;
                map.end()
            }
            ConversionResult::Failed { error } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("result", &false)?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}
