pub mod tour;
pub mod pricing;

pub use tour::{find_tour, is_known_tour, tours, Currency, Tour};
pub use pricing::{quote, CatalogError, Quote};
