pub mod catalog;
pub mod error;
pub mod satellites;
pub mod visible;
