pub mod conversation;
pub mod ticket;
