// src/domain/price_range.rs

/// Per-night price bucket shown in the treemap and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceRange {
    Cheap,
    Moderate,
    Expensive,
    Luxury,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::Cheap,
        PriceRange::Moderate,
        PriceRange::Expensive,
        PriceRange::Luxury,
    ];

    /// Buckets a nightly price. Each boundary belongs to the bucket above it,
    /// so exactly 150 is moderate. Missing or non-positive prices have no bucket.
    pub fn from_nightly(price_per_night: Option<f64>) -> Option<Self> {
        let p = price_per_night.filter(|p| p.is_finite() && *p > 0.0)?;
        Some(if p < 150.0 {
            PriceRange::Cheap
        } else if p < 300.0 {
            PriceRange::Moderate
        } else if p < 500.0 {
            PriceRange::Expensive
        } else {
            PriceRange::Luxury
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceRange::Cheap => "cheap",
            PriceRange::Moderate => "moderate",
            PriceRange::Expensive => "expensive",
            PriceRange::Luxury => "luxury",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PriceRange::Cheap => "from 0 to 150 per night. affordable options for budget-conscious travellers.",
            PriceRange::Moderate => "between 150 and 300 per night. a balance between quality and cost.",
            PriceRange::Expensive => "from 300 to 500 per night. higher-priced stays, often with premium features.",
            PriceRange::Luxury => "over 500 per night. high-end, exclusive places.",
        }
    }
}

/// Total stay price divided over the nights of the search.
pub fn nightly_price(total: Option<f64>, nights: u32) -> Option<f64> {
    total.map(|t| t / f64::from(nights.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_the_fixed_boundaries() {
        assert_eq!(PriceRange::from_nightly(Some(120.0)), Some(PriceRange::Cheap));
        assert_eq!(PriceRange::from_nightly(Some(250.0)), Some(PriceRange::Moderate));
        assert_eq!(PriceRange::from_nightly(Some(450.0)), Some(PriceRange::Expensive));
        assert_eq!(PriceRange::from_nightly(Some(600.0)), Some(PriceRange::Luxury));
    }

    #[test]
    fn boundary_values_go_to_the_upper_bucket() {
        assert_eq!(PriceRange::from_nightly(Some(150.0)), Some(PriceRange::Moderate));
        assert_eq!(PriceRange::from_nightly(Some(300.0)), Some(PriceRange::Expensive));
        assert_eq!(PriceRange::from_nightly(Some(500.0)), Some(PriceRange::Luxury));
    }

    #[test]
    fn missing_or_non_positive_prices_are_unbucketed() {
        assert_eq!(PriceRange::from_nightly(None), None);
        assert_eq!(PriceRange::from_nightly(Some(0.0)), None);
        assert_eq!(PriceRange::from_nightly(Some(-20.0)), None);
    }

    #[test]
    fn total_price_is_split_over_nights() {
        assert_eq!(nightly_price(Some(900.0), 3), Some(300.0));
        assert_eq!(nightly_price(Some(900.0), 0), Some(900.0));
        assert_eq!(nightly_price(None, 2), None);
    }
}
