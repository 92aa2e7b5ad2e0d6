// 📊 Batch Summary - per-category counts and per-currency totals

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::movement::{Classification, Currency, Location, Movement, MovementType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_movements: usize,
    pub by_type: BTreeMap<MovementType, usize>,
    pub by_classification: BTreeMap<Classification, usize>,
    pub by_location: BTreeMap<Location, usize>,

    /// Sum of amounts per currency (amounts are never converted)
    pub amount_by_currency: BTreeMap<Currency, f64>,

    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
}

impl BatchSummary {
    pub fn from_movements(movements: &[Movement]) -> Self {
        let mut summary = BatchSummary {
            total_movements: movements.len(),
            ..Default::default()
        };

        for m in movements {
            *summary.by_type.entry(m.movement_type).or_insert(0) += 1;
            *summary.by_classification.entry(m.classification).or_insert(0) += 1;
            *summary.by_location.entry(m.location).or_insert(0) += 1;
            *summary.amount_by_currency.entry(m.currency).or_insert(0.0) += m.amount;

            summary.earliest_date = Some(match summary.earliest_date {
                Some(d) if d <= m.date => d,
                _ => m.date,
            });
            summary.latest_date = Some(match summary.latest_date {
                Some(d) if d >= m.date => d,
                _ => m.date,
            });
        }

        summary
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let purchases = self.by_type.get(&MovementType::Purchase).copied().unwrap_or(0);
        let sales = self.by_type.get(&MovementType::Sale).copied().unwrap_or(0);

        let period = match (self.earliest_date, self.latest_date) {
            (Some(from), Some(to)) => format!("{} → {}", from, to),
            _ => "no dates".to_string(),
        };

        format!(
            "{} movements ({} compras, {} vendas), {}",
            self.total_movements, purchases, sales, period
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::CostCenter;

    fn movement(code: u32, date: (i32, u32, u32), currency: Currency, amount: f64) -> Movement {
        Movement {
            code,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            movement_type: if code % 2 == 0 { MovementType::Sale } else { MovementType::Purchase },
            classification: Classification::Food,
            document: format!("NF-{}", 1000 + code),
            cost_center: CostCenter::Logistics,
            location: Location::Brazil,
            amount,
            currency,
        }
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let movements = vec![
            movement(1, (2024, 3, 1), Currency::Usd, 100.0),
            movement(2, (2024, 1, 15), Currency::Eur, 50.5),
            movement(3, (2024, 6, 30), Currency::Usd, 200.0),
        ];

        let summary = BatchSummary::from_movements(&movements);

        assert_eq!(summary.total_movements, 3);
        assert_eq!(summary.by_type[&MovementType::Purchase], 2);
        assert_eq!(summary.by_type[&MovementType::Sale], 1);
        assert_eq!(summary.by_classification[&Classification::Food], 3);
        assert_eq!(summary.amount_by_currency[&Currency::Usd], 300.0);
        assert_eq!(summary.amount_by_currency[&Currency::Eur], 50.5);
        assert!(!summary.amount_by_currency.contains_key(&Currency::Jpy));
        assert_eq!(summary.earliest_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(summary.latest_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(
            summary.summary(),
            "3 movements (2 compras, 1 vendas), 2024-01-15 → 2024-06-30"
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_movements(&[]);
        assert_eq!(summary.total_movements, 0);
        assert!(summary.earliest_date.is_none());
        assert_eq!(summary.summary(), "0 movements (0 compras, 0 vendas), no dates");
    }

    #[test]
    fn test_summary_serializes_with_labels() {
        let movements = vec![movement(1, (2024, 3, 1), Currency::Jpy, 10.0)];
        let json = serde_json::to_value(BatchSummary::from_movements(&movements)).unwrap();

        assert_eq!(json["by_type"]["Compra"], 1);
        assert_eq!(json["by_location"]["Brasil"], 1);
        assert_eq!(json["amount_by_currency"]["JPY"], 10.0);
        assert_eq!(json["earliest_date"], "2024-03-01");
    }
}
