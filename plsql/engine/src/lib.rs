pub mod args;
pub mod error;
pub mod invoker;
pub mod locator;
pub mod path;
pub mod result;
pub mod selector;
pub mod transport;

mod cache;
