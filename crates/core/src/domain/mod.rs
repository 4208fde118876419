pub mod card;
pub mod contract;
pub mod export;
pub mod profile;
pub mod recommendation;
