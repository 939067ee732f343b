use serde::Serialize;

use crate::tour::{find_tour, Currency};

/// Price summary for a tour and a party size, as rendered next to the booking form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub tour: &'static str,
    pub name: &'static str,
    pub duration: &'static str,
    pub location: &'static str,
    pub participants: u32,
    pub currency: Currency,
    pub highlights: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_person: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<u32>,
    /// Set for tours without a list price
    pub contact_for_pricing: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Tour not found: {0}")]
    UnknownTour(String),

    #[error("Invalid participant count: {0}")]
    InvalidParticipants(u32),
}

/// Build the price summary for `participants` people on the tour `slug`.
pub fn quote(slug: &str, participants: u32) -> Result<Quote, CatalogError> {
    let tour = find_tour(slug).ok_or_else(|| CatalogError::UnknownTour(slug.to_string()))?;
    if participants == 0 {
        return Err(CatalogError::InvalidParticipants(participants));
    }

    let (price_per_person, total_price) = if tour.is_priced() {
        let total = tour
            .price
            .checked_mul(participants)
            .ok_or(CatalogError::InvalidParticipants(participants))?;
        (Some(tour.price), Some(total))
    } else {
        (None, None)
    };

    Ok(Quote {
        tour: tour.slug,
        name: tour.name,
        duration: tour.duration,
        location: tour.location,
        participants,
        currency: tour.currency,
        highlights: tour.highlights,
        price_per_person,
        total_price,
        contact_for_pricing: !tour.is_priced(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_price_by_participants() {
        let q = quote("winter-walking", 2).unwrap();
        assert_eq!(q.price_per_person, Some(967));
        assert_eq!(q.total_price, Some(1934));
        assert!(!q.contact_for_pricing);
    }

    #[test]
    fn unpriced_tour_asks_for_contact() {
        let q = quote("hut-to-hut", 4).unwrap();
        assert!(q.contact_for_pricing);
        assert_eq!(q.total_price, None);

        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("totalPrice").is_none());
        assert_eq!(json["contactForPricing"], true);
    }

    #[test]
    fn rejects_unknown_tour_and_empty_party() {
        assert_eq!(
            quote("nowhere", 1).unwrap_err(),
            CatalogError::UnknownTour("nowhere".to_string())
        );
        assert_eq!(
            quote("all-seasons", 0).unwrap_err(),
            CatalogError::InvalidParticipants(0)
        );
    }
}
