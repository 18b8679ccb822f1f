#![warn(clippy::missing_docs_in_private_items)]

/// Token network configuration.
pub mod config;
/// Base constants.
pub mod constants;
/// Base deserializers.
pub mod deserializers;
/// Base hashing functions.
pub mod hashing;
/// Base trait implementations.
pub mod impls;
/// Signed message packing.
pub mod packing;
/// Base serializers.
pub mod serializers;
/// Signature recovery utils.
pub mod signing;
#[cfg(test)]
mod tests;
/// Base traits.
pub mod traits;
/// Base types.
pub mod types;
