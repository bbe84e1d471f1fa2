pub mod intake;
pub mod tools;
