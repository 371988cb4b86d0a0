pub mod account;
pub mod availability;
pub mod booking;
pub mod ledger;
pub mod tutor;
