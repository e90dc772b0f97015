pub mod account;

pub use account::{AccountDirectory, CodePurpose, MockAccountDirectory};
