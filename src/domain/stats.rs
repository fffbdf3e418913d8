use crate::domain::listing::HotelRecord;
use crate::domain::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Spread {
    /// `None` when no record has a value.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        (count > 0).then(|| Spread {
            mean: sum / count as f64,
            min,
            max,
        })
    }
}

/// Headline numbers shown above the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub price: Option<Spread>,
    pub rate_review: Option<Spread>,
    pub distance: Option<Spread>,
}

impl Summary {
    pub fn from_records(records: &[HotelRecord]) -> Self {
        let spread = |m: Metric| Spread::of(records.iter().filter_map(|r| m.value(r)));

        Self {
            count: records.len(),
            price: spread(Metric::Price),
            rate_review: spread(Metric::RateReview),
            distance: spread(Metric::Distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_skips_missing_values() {
        let records = vec![
            HotelRecord {
                link: "a".into(),
                price: Some(100.0),
                distance: Some(400.0),
                ..Default::default()
            },
            HotelRecord {
                link: "b".into(),
                price: Some(300.0),
                rate_review: Some(8.0),
                ..Default::default()
            },
            HotelRecord {
                link: "c".into(),
                ..Default::default()
            },
        ];

        let summary = Summary::from_records(&records);
        assert_eq!(summary.count, 3);
        assert_eq!(
            summary.price,
            Some(Spread {
                mean: 200.0,
                min: 100.0,
                max: 300.0
            })
        );
        assert_eq!(summary.rate_review.map(|s| s.mean), Some(8.0));
        assert_eq!(summary.distance.map(|s| s.max), Some(400.0));
    }

    #[test]
    fn empty_input_has_no_spread() {
        let summary = Summary::from_records(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.price.is_none());
    }
}
