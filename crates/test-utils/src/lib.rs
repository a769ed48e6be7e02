#[macro_use]
extern crate lazy_static;

pub mod constants;
pub mod dsa;
pub mod test_chain;

pub use test_chain::TestChain;
