//! Repository implementations.
//!
//! One repository per aggregate:
//! - [`account`] - customer accounts (identity-api)
//! - [`cart`] - shopping carts and their items (cart-api)

pub mod account;
pub mod cart;
