pub mod imagery;
pub mod maps;
pub mod session;
pub mod table;
pub mod venues;

pub use crate::domain::model::{Coordinate, Field, SortDirection, SortDirective, Venue, VenueDraft};
pub use crate::domain::ports::{AuthProvider, ConfigProvider, PlacePhotoLookup, VenueStore};
pub use crate::utils::error::Result;
