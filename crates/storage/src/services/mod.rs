pub mod athlete_store;
pub mod seed;

pub use athlete_store::AthleteStore;
