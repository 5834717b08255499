// Entity Models
// The account table has a single entity: the account stored in each slot

pub mod account;

pub use account::{Account, NewAccount};
