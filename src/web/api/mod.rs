pub mod error;
pub mod objects;
pub mod risk;
pub mod session;
