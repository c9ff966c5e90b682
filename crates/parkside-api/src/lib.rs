pub mod accounts;
pub mod contacts;
pub mod listings;
pub mod middleware;
pub mod pages;
