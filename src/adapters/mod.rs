// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod google;
pub mod supabase;

pub use google::GooglePlaces;
pub use supabase::{SupabaseAuth, SupabaseClient, SupabaseVenueStore};
