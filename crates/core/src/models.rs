pub mod availability;
pub mod booking;
pub mod identity;
pub mod ledger;
pub mod tutor;
