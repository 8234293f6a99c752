pub mod athlete;
pub mod user;

pub use athlete::{Athlete, AthleteRow, Metrics};
pub use user::{ROLE_ADMIN, ROLE_ATHLETE, ROLE_COACH, User};
