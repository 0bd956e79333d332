pub mod backend;
pub mod cleanup;
pub mod layout;
