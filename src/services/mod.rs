pub mod bids;
pub mod clients;
pub mod projects;

pub use bids::BidService;
pub use clients::ClientService;
pub use projects::ProjectService;
