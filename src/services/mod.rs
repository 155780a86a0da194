pub mod ai;
pub mod calendar;
pub mod confirmation;
pub mod intake;
pub mod matcher;
pub mod oauth;
pub mod summary;
