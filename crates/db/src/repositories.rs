pub mod availability;
pub mod booking;
pub mod ledger;
pub mod tutor;
pub mod user;
