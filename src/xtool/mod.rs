pub mod client;
pub mod controller;
pub mod endpoint;
mod envelope;
pub mod fields;
pub mod poll;

pub use client::new_client;
pub use controller::XToolController;
pub use poll::poll;
