pub mod applications;
pub mod charities;
pub mod donations;
pub mod setup;
pub mod ui;
pub mod view;
