use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

/// Rejections raised before anything is fetched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("no vibes, no travel. type in a destination!")]
    EmptyDestination,

    #[error("whoa there. check-in ({checkin}) must come before check-out ({checkout})")]
    DatesOutOfOrder {
        checkin: NaiveDate,
        checkout: NaiveDate,
    },

    #[error("{field} is not a valid date: \"{value}\"")]
    InvalidDate { field: &'static str, value: String },

    #[error("number of adults must be a whole number of at least 1, got \"{0}\"")]
    InvalidAdults(String),

    #[error("invalid search base URL \"{0}\"")]
    InvalidBaseUrl(String),
}

/// A validated hotel search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub destination: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub adults: u32,
}

impl SearchQuery {
    pub fn new(
        destination: &str,
        checkin: NaiveDate,
        checkout: NaiveDate,
        adults: u32,
    ) -> Result<Self, QueryError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(QueryError::EmptyDestination);
        }
        if checkin >= checkout {
            return Err(QueryError::DatesOutOfOrder { checkin, checkout });
        }
        if adults == 0 {
            return Err(QueryError::InvalidAdults(adults.to_string()));
        }

        Ok(Self {
            destination: destination.to_string(),
            checkin,
            checkout,
            adults,
        })
    }

    /// Build from raw form fields (`destination`, `checkin`, `checkout`, `adults`).
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, QueryError> {
        let field = |name: &str| form.get(name).map(|s| s.trim()).unwrap_or("");

        let destination = field("destination");
        if destination.is_empty() {
            return Err(QueryError::EmptyDestination);
        }

        let checkin = parse_date("checkin", field("checkin"))?;
        let checkout = parse_date("checkout", field("checkout"))?;

        let adults_raw = field("adults");
        let adults = adults_raw
            .parse::<u32>()
            .map_err(|_| QueryError::InvalidAdults(adults_raw.to_string()))?;

        Self::new(destination, checkin, checkout, adults)
    }

    pub fn nights(&self) -> u32 {
        // checkin < checkout is enforced at construction
        u32::try_from((self.checkout - self.checkin).num_days()).unwrap_or(1)
    }

    /// The results page the listing stage starts from, also offered to the
    /// user as a link while the scrape runs.
    pub fn search_url(&self, base: &str) -> Result<String, QueryError> {
        let mut url = Url::parse(base).map_err(|_| QueryError::InvalidBaseUrl(base.to_string()))?;
        url.query_pairs_mut()
            .append_pair("ss", &self.destination)
            .append_pair("checkin", &self.checkin.to_string())
            .append_pair("checkout", &self.checkout.to_string())
            .append_pair("group_adults", &self.adults.to_string());
        Ok(url.into())
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| QueryError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn blank_destination_is_rejected() {
        let err = SearchQuery::new("   ", date("2026-05-01"), date("2026-05-03"), 2).unwrap_err();
        assert_eq!(err, QueryError::EmptyDestination);
    }

    #[test]
    fn checkin_on_checkout_day_is_rejected() {
        let err = SearchQuery::new("Kraków", date("2026-05-03"), date("2026-05-03"), 2).unwrap_err();
        assert!(matches!(err, QueryError::DatesOutOfOrder { .. }));
    }

    #[test]
    fn nights_counts_calendar_days() {
        let q = SearchQuery::new("Gdańsk", date("2026-05-01"), date("2026-05-04"), 1).unwrap();
        assert_eq!(q.nights(), 3);
    }

    #[test]
    fn search_url_encodes_inputs() {
        let q = SearchQuery::new("Zakopane Tatry", date("2026-02-10"), date("2026-02-12"), 2).unwrap();
        let url = q
            .search_url("https://www.booking.com/searchresults.pl.html")
            .unwrap();
        assert_eq!(
            url,
            "https://www.booking.com/searchresults.pl.html?ss=Zakopane+Tatry&checkin=2026-02-10&checkout=2026-02-12&group_adults=2"
        );
    }

    #[test]
    fn form_fields_are_parsed_and_validated() {
        let q = SearchQuery::from_form(&form(&[
            ("destination", " Warszawa "),
            ("checkin", "2026-06-01"),
            ("checkout", "2026-06-02"),
            ("adults", "3"),
        ]))
        .unwrap();
        assert_eq!(q.destination, "Warszawa");
        assert_eq!(q.adults, 3);

        let err = SearchQuery::from_form(&form(&[
            ("destination", "Warszawa"),
            ("checkin", "June 1st"),
            ("checkout", "2026-06-02"),
            ("adults", "3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidDate { field: "checkin", .. }));
    }

    #[test]
    fn zero_adults_is_rejected() {
        let err = SearchQuery::from_form(&form(&[
            ("destination", "Poznań"),
            ("checkin", "2026-06-01"),
            ("checkout", "2026-06-02"),
            ("adults", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidAdults(_)));
    }
}
