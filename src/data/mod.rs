//! Data model and the numeric pipeline: table -> stack -> scales -> curves.

pub mod catalog;
pub mod curve;
pub mod scale;
pub mod stack;
pub mod summary;
pub mod table;
pub mod time_format;
