pub mod chart;
pub mod compare;
pub mod setup;
pub mod top;
pub mod ui;
