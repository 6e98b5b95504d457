pub mod builder;
mod date;
mod datetime;
mod duration;

pub use date::Date;
pub use datetime::DateTime;
pub use duration::Duration;

#[cfg(test)]
pub use datetime::FIXED_NOW;
