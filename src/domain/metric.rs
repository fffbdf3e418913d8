use crate::domain::listing::{Column, HotelRecord};
use std::cmp::Ordering;
use std::str::FromStr;

/// Numeric fields a user can rank by or put on a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Distance,
    RateReview,
    RatingStars,
    NumReview,
    Price,
}

/// Which end of a metric counts as "top".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    Smallest,
    Largest,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Distance,
        Metric::RateReview,
        Metric::RatingStars,
        Metric::NumReview,
        Metric::Price,
    ];

    /// Metrics offered to colour the treemap.
    pub const TREEMAP_COLORS: [Metric; 3] = [Metric::NumReview, Metric::RateReview, Metric::RatingStars];

    pub fn as_str(self) -> &'static str {
        self.column().as_str()
    }

    pub fn column(self) -> Column {
        match self {
            Metric::Distance => Column::Distance,
            Metric::RateReview => Column::RateReview,
            Metric::RatingStars => Column::RatingStars,
            Metric::NumReview => Column::NumReview,
            Metric::Price => Column::Price,
        }
    }

    pub fn value(self, record: &HotelRecord) -> Option<f64> {
        match self {
            Metric::Distance => record.distance,
            Metric::RateReview => record.rate_review,
            Metric::RatingStars => Some(f64::from(record.rating_stars)),
            Metric::NumReview => record.num_review.map(f64::from),
            Metric::Price => record.price,
        }
        .filter(|v| v.is_finite())
    }

    /// Star rating ranks highest-first; every other field ranks
    /// lowest-first, including review rate and review count.
    pub fn rank_order(self) -> RankOrder {
        match self {
            Metric::RatingStars => RankOrder::Largest,
            Metric::Distance | Metric::RateReview | Metric::NumReview | Metric::Price => {
                RankOrder::Smallest
            }
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Metric::Distance => "hotels closest to the city center",
            Metric::RateReview => "hotels ranked by review score",
            Metric::RatingStars => "hotels with the most stars",
            Metric::NumReview => "hotels ranked by number of reviews",
            Metric::Price => "the cheapest hotels",
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown field \"{s}\""))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `n` most extreme records along `metric`, in ranking order.
/// Records without a value for the metric are never ranked; ties keep
/// table order.
pub fn top_n(records: &[HotelRecord], metric: Metric, n: usize) -> Vec<&HotelRecord> {
    let mut ranked: Vec<(&HotelRecord, f64)> = records
        .iter()
        .filter_map(|r| metric.value(r).map(|v| (r, v)))
        .collect();

    ranked.sort_by(|(_, a), (_, b)| {
        let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match metric.rank_order() {
            RankOrder::Smallest => ord,
            RankOrder::Largest => ord.reverse(),
        }
    });

    ranked.into_iter().take(n).map(|(r, _)| r).collect()
}
