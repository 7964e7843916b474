//! Sorting and truncation of assembled rows.
//!
//! Sorting is stable: rows with equal keys keep their assembly order, so
//! the same search always pages the same way. Rows missing the sort key go
//! last.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::domain::SortKey;

use super::assemble::{OneWayRow, ResultSet, RoundTripRow};

/// Values a row exposes for ordering.
pub trait Rankable {
    fn departure(&self) -> Option<NaiveDateTime>;
    fn leg_price(&self) -> Option<f64>;
    fn total_price(&self) -> Option<f64>;
    fn group_total(&self) -> Option<f64>;
}

impl Rankable for OneWayRow {
    fn departure(&self) -> Option<NaiveDateTime> {
        self.departure
    }

    fn leg_price(&self) -> Option<f64> {
        self.price
    }

    fn total_price(&self) -> Option<f64> {
        self.price
    }

    fn group_total(&self) -> Option<f64> {
        None
    }
}

impl Rankable for RoundTripRow {
    fn departure(&self) -> Option<NaiveDateTime> {
        self.outbound_departure
    }

    fn leg_price(&self) -> Option<f64> {
        self.outbound_price
    }

    fn total_price(&self) -> Option<f64> {
        self.total_price
    }

    fn group_total(&self) -> Option<f64> {
        self.group_total
    }
}

/// Compare optional values, ordering `None` after every `Some`.
fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable ascending sort by `key`.
pub fn sort_rows<R: Rankable>(rows: &mut [R], key: SortKey) {
    match key {
        SortKey::Departure => {
            rows.sort_by(|a, b| missing_last(a.departure(), b.departure(), Ord::cmp))
        }
        SortKey::LegPrice => {
            rows.sort_by(|a, b| missing_last(a.leg_price(), b.leg_price(), f64::total_cmp))
        }
        SortKey::TotalPrice => {
            rows.sort_by(|a, b| missing_last(a.total_price(), b.total_price(), f64::total_cmp))
        }
        SortKey::GroupTotal => {
            rows.sort_by(|a, b| missing_last(a.group_total(), b.group_total(), f64::total_cmp))
        }
    }
}

/// Keep the first `limit` rows. Zero or `None` keeps everything.
pub fn apply_limit<R>(rows: &mut Vec<R>, limit: Option<usize>) {
    if let Some(n) = limit.filter(|n| *n > 0) {
        rows.truncate(n);
    }
}

/// Sort then truncate.
pub fn rank_rows<R: Rankable>(mut rows: Vec<R>, key: SortKey, limit: Option<usize>) -> Vec<R> {
    sort_rows(&mut rows, key);
    apply_limit(&mut rows, limit);
    rows
}

impl ResultSet {
    /// Sort and truncate whichever shape of rows this holds.
    pub fn rank(self, key: SortKey, limit: Option<usize>) -> Self {
        match self {
            ResultSet::OneWay(rows) => ResultSet::OneWay(rank_rows(rows, key, limit)),
            ResultSet::RoundTrip(rows) => ResultSet::RoundTrip(rank_rows(rows, key, limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Minimal row for exercising the sort without assembling fares.
    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        departure: Option<NaiveDateTime>,
        price: Option<f64>,
        total: Option<f64>,
        group: Option<f64>,
    }

    impl Rankable for Row {
        fn departure(&self) -> Option<NaiveDateTime> {
            self.departure
        }
        fn leg_price(&self) -> Option<f64> {
            self.price
        }
        fn total_price(&self) -> Option<f64> {
            self.total
        }
        fn group_total(&self) -> Option<f64> {
            self.group
        }
    }

    fn hour(h: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
    }

    fn row(id: u32, dep: Option<NaiveDateTime>, price: Option<f64>) -> Row {
        Row {
            id,
            departure: dep,
            price,
            total: price.map(|p| p * 2.0),
            group: None,
        }
    }

    fn ids(rows: &[Row]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn sort_by_departure() {
        let rows = vec![
            row(1, hour(12), None),
            row(2, hour(6), None),
            row(3, hour(9), None),
        ];
        assert_eq!(
            ids(&rank_rows(rows, SortKey::Departure, None)),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn missing_values_sort_last() {
        let rows = vec![
            row(1, None, Some(10.0)),
            row(2, hour(6), None),
            row(3, hour(5), Some(5.0)),
        ];
        assert_eq!(
            ids(&rank_rows(rows.clone(), SortKey::Departure, None)),
            vec![3, 2, 1]
        );
        assert_eq!(
            ids(&rank_rows(rows, SortKey::LegPrice, None)),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![
            row(1, hour(8), Some(20.0)),
            row(2, hour(7), Some(10.0)),
            row(3, hour(9), Some(20.0)),
            row(4, hour(6), Some(10.0)),
        ];
        assert_eq!(
            ids(&rank_rows(rows, SortKey::TotalPrice, None)),
            vec![2, 4, 1, 3]
        );
    }

    #[test]
    fn all_missing_group_totals_keep_order() {
        let rows = vec![
            row(3, hour(9), None),
            row(1, hour(8), None),
            row(2, hour(7), None),
        ];
        assert_eq!(
            ids(&rank_rows(rows, SortKey::GroupTotal, None)),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn limit_truncates() {
        let rows: Vec<Row> = (0..5).map(|i| row(i, hour(i), None)).collect();
        assert_eq!(
            rank_rows(rows.clone(), SortKey::Departure, Some(2)).len(),
            2
        );
        assert_eq!(
            rank_rows(rows.clone(), SortKey::Departure, Some(0)).len(),
            5
        );
        assert_eq!(rank_rows(rows.clone(), SortKey::Departure, None).len(), 5);
        assert_eq!(rank_rows(rows, SortKey::Departure, Some(50)).len(), 5);
    }

    #[test]
    fn empty_input() {
        assert!(rank_rows(Vec::<Row>::new(), SortKey::LegPrice, Some(3)).is_empty());
    }
}
