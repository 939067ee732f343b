use serde::Serialize;

/// Currencies tours are priced in
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
}

/// A bookable tour as shown on the booking form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    /// Identifier sent by the form as the booking's `tour` field
    pub slug: &'static str,
    pub name: &'static str,
    pub duration: &'static str,
    /// Price per person in whole currency units. Zero means "contact for pricing".
    pub price: u32,
    pub currency: Currency,
    pub location: &'static str,
    pub highlights: &'static [&'static str],
}

impl Tour {
    pub fn is_priced(&self) -> bool {
        self.price > 0
    }
}

static TOURS: [Tour; 5] = [
    Tour {
        slug: "winter-walking",
        name: "Winter Walking and Activity Holiday",
        duration: "5 days",
        price: 967,
        currency: Currency::Usd,
        location: "Poprad/High Tatras",
        highlights: &["Snow Hiking", "Frozen Lakes", "Guided Walks"],
    },
    Tour {
        slug: "wellness-retreat",
        name: "Winter Wellness Retreat",
        duration: "5 days",
        price: 1340,
        currency: Currency::Usd,
        location: "Ždiar/High Tatras",
        highlights: &["Spa & Wellness", "Mountain Views", "Relaxation"],
    },
    Tour {
        slug: "mountain-escape",
        name: "High Tatras Walking Holiday Mountain Escape",
        duration: "6 days",
        price: 1187,
        currency: Currency::Eur,
        location: "High Tatras National Park",
        highlights: &["Alpine Walking", "National Park", "Photography"],
    },
    Tour {
        slug: "all-seasons",
        name: "High Tatras Walking Holiday All Seasons",
        duration: "7 days",
        price: 1465,
        currency: Currency::Eur,
        location: "High Tatras Region",
        highlights: &["All Weather", "Peak Climbing", "Comprehensive"],
    },
    Tour {
        slug: "hut-to-hut",
        name: "Hut-to-Hut Self-Guided Trek",
        duration: "7+ days",
        price: 0,
        currency: Currency::Usd,
        location: "Alpine Valleys & Lakes",
        highlights: &["Mountain Huts", "Multi-day Trek", "Self-Guided"],
    },
];

/// All tours, in the order the booking form lists them
pub fn tours() -> &'static [Tour] {
    &TOURS
}

pub fn find_tour(slug: &str) -> Option<&'static Tour> {
    TOURS.iter().find(|t| t.slug == slug)
}

pub fn is_known_tour(slug: &str) -> bool {
    find_tour(slug).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<_> = tours().iter().map(|t| t.slug).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), tours().len());
    }

    #[test]
    fn finds_tour_by_slug() {
        let tour = find_tour("mountain-escape").unwrap();
        assert_eq!(tour.price, 1187);
        assert_eq!(tour.currency, Currency::Eur);
        assert!(!is_known_tour("everest-base-camp"));
    }

    #[test]
    fn serializes_currency_uppercase() {
        let json = serde_json::to_value(find_tour("winter-walking").unwrap()).unwrap();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["slug"], "winter-walking");
    }
}
