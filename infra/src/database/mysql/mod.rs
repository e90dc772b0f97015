//! MySQL implementations of the core persistence traits

mod account_directory_impl;

pub use account_directory_impl::MySqlAccountDirectory;
