// 📒 Movement Record - the one entity this crate produces
// Every field is sampled independently; no relationships between rows.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

pub const COL_CODE: &str = "Cód de Movimentação";
pub const COL_DATE: &str = "Data";
pub const COL_TYPE: &str = "Tipo";
pub const COL_CLASSIFICATION: &str = "Classificação";
pub const COL_DOCUMENT: &str = "Documento";
pub const COL_COST_CENTER: &str = "Centro de Custos";
pub const COL_LOCATION: &str = "Local";
pub const COL_AMOUNT: &str = "Valor";
pub const COL_CURRENCY: &str = "Moeda";

/// Column headers in export order
pub const COLUMNS: [&str; 9] = [
    COL_CODE,
    COL_DATE,
    COL_TYPE,
    COL_CLASSIFICATION,
    COL_DOCUMENT,
    COL_COST_CENTER,
    COL_LOCATION,
    COL_AMOUNT,
    COL_CURRENCY,
];

/// Prefix of every document reference (nota fiscal)
pub const DOCUMENT_PREFIX: &str = "NF-";
pub const DOCUMENT_MIN: u32 = 1000;
pub const DOCUMENT_MAX: u32 = 9999;

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

/// Purchase or sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "Compra")]
    Purchase,
    #[serde(rename = "Venda")]
    Sale,
}

impl MovementType {
    pub const ALL: [MovementType; 2] = [MovementType::Purchase, MovementType::Sale];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Purchase => "Compra",
            MovementType::Sale => "Venda",
        }
    }
}

/// Product classification of the movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Eletrônicos")]
    Electronics,
    #[serde(rename = "Vestuário")]
    Clothing,
    #[serde(rename = "Alimentos")]
    Food,
    #[serde(rename = "Móveis")]
    Furniture,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Electronics,
        Classification::Clothing,
        Classification::Food,
        Classification::Furniture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Electronics => "Eletrônicos",
            Classification::Clothing => "Vestuário",
            Classification::Food => "Alimentos",
            Classification::Furniture => "Móveis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CostCenter {
    #[serde(rename = "Setor de Compras")]
    Purchasing,
    #[serde(rename = "Setor de Vendas")]
    Sales,
    #[serde(rename = "Logística")]
    Logistics,
}

impl CostCenter {
    pub const ALL: [CostCenter; 3] = [CostCenter::Purchasing, CostCenter::Sales, CostCenter::Logistics];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostCenter::Purchasing => "Setor de Compras",
            CostCenter::Sales => "Setor de Vendas",
            CostCenter::Logistics => "Logística",
        }
    }
}

/// Country where the movement took place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Brasil")]
    Brazil,
    #[serde(rename = "EUA")]
    UnitedStates,
    #[serde(rename = "China")]
    China,
    #[serde(rename = "Alemanha")]
    Germany,
    #[serde(rename = "Japão")]
    Japan,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::Brazil,
        Location::UnitedStates,
        Location::China,
        Location::Germany,
        Location::Japan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Brazil => "Brasil",
            Location::UnitedStates => "EUA",
            Location::China => "China",
            Location::Germany => "Alemanha",
            Location::Japan => "Japão",
        }
    }
}

/// ISO 4217 code of the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "JPY")]
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Jpy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Jpy => "JPY",
        }
    }
}

// Labels are the only textual form, so Display/FromStr go through ALL + as_str
macro_rules! label_conversions {
    ($($ty:ident => $what:literal),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = anyhow::Error;

                fn from_str(s: &str) -> Result<Self> {
                    $ty::ALL
                        .iter()
                        .copied()
                        .find(|v| v.as_str() == s)
                        .ok_or_else(|| anyhow!("Unknown {}: {:?}", $what, s))
                }
            }
        )+
    };
}

label_conversions! {
    MovementType => "movement type",
    Classification => "classification",
    CostCenter => "cost center",
    Location => "location",
    Currency => "currency",
}

// ============================================================================
// MOVEMENT RECORD
// ============================================================================

/// Movement - one synthetic purchase/sale row
///
/// Serde renames are the column headers, so CSV round trips through
/// `csv::Writer::serialize` / `csv::Reader::deserialize` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(rename = "Cód de Movimentação")]
    pub code: u32,

    #[serde(rename = "Data")]
    pub date: NaiveDate,

    #[serde(rename = "Tipo")]
    pub movement_type: MovementType,

    #[serde(rename = "Classificação")]
    pub classification: Classification,

    #[serde(rename = "Documento")]
    pub document: String,

    #[serde(rename = "Centro de Custos")]
    pub cost_center: CostCenter,

    #[serde(rename = "Local")]
    pub location: Location,

    #[serde(rename = "Valor")]
    pub amount: f64,

    #[serde(rename = "Moeda")]
    pub currency: Currency,
}

/// Format a document reference from its number
pub fn document_reference(number: u32) -> String {
    format!("{}{}", DOCUMENT_PREFIX, number)
}

/// Extract the number from a document reference ("NF-1234" → 1234)
pub fn parse_document_number(document: &str) -> Option<u32> {
    let digits = document.strip_prefix(DOCUMENT_PREFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_order() {
        assert_eq!(COLUMNS.len(), 9);
        assert_eq!(COLUMNS[0], "Cód de Movimentação");
        assert_eq!(COLUMNS[7], "Valor");
        assert_eq!(COLUMNS[8], "Moeda");
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for t in MovementType::ALL {
            assert_eq!(t.as_str().parse::<MovementType>().unwrap(), t);
        }
        for c in Classification::ALL {
            assert_eq!(c.as_str().parse::<Classification>().unwrap(), c);
        }
        for c in CostCenter::ALL {
            assert_eq!(c.as_str().parse::<CostCenter>().unwrap(), c);
        }
        for l in Location::ALL {
            assert_eq!(l.as_str().parse::<Location>().unwrap(), l);
        }
        for c in Currency::ALL {
            assert_eq!(c.as_str().parse::<Currency>().unwrap(), c);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_labels() {
        assert!("Aluguel".parse::<MovementType>().is_err());
        assert!("eletrônicos".parse::<Classification>().is_err()); // Case sensitive
        assert!("BRL".parse::<Currency>().is_err());
        assert!("".parse::<Location>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Location::Japan).unwrap();
        assert_eq!(json, "\"Japão\"");

        let parsed: CostCenter = serde_json::from_str("\"Logística\"").unwrap();
        assert_eq!(parsed, CostCenter::Logistics);
    }

    #[test]
    fn test_document_reference() {
        assert_eq!(document_reference(1234), "NF-1234");
        assert_eq!(parse_document_number("NF-1234"), Some(1234));
        assert_eq!(parse_document_number("NF-"), None);
        assert_eq!(parse_document_number("NF-12a4"), None);
        assert_eq!(parse_document_number("XX-1234"), None);
    }
}
