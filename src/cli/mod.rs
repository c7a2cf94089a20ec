pub mod convert;
pub mod currencies;
pub mod dashboard;
pub mod rates;
pub mod selector;
pub mod setup;
pub mod ui;
