pub mod booking;
pub mod profile;
pub mod turf;

pub use booking::{Booking, BookingDetails, BookingStatus, NewBooking, ReviewDecision};
pub use profile::{Profile, Role, Session};
pub use turf::{NewTurf, Turf, TurfListing};
