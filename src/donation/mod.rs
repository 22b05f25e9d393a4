// Donation-report detection and structuring
pub mod classifier;
pub mod structurer;

pub use classifier::is_donation_report;
pub use structurer::{structure, DonationData, DonationRecord};
