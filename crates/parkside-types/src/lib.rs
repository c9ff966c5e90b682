pub mod api;
pub mod choices;
