//! Repository functions, generic over `ConnectionTrait` so they run the same
//! against the pool or inside a transaction.

pub mod activity;
pub mod carousel;
pub mod donation_programs;
pub mod donations;
pub mod news;
pub mod transactions;
pub mod users;
