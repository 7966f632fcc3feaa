pub mod booking;
pub mod catalog;
pub mod health;
pub mod quotes;
pub mod schedule;
