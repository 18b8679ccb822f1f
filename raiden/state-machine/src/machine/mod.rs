#![warn(clippy::missing_docs_in_private_items)]

pub mod channel;
pub mod locks;
pub mod settlement;
pub mod token_network;
