pub mod dto;
pub mod model;

pub use model::{Auction, AuctionStatus, Item, ItemChanges, NewAuction, ValidationError};
