//! Plain business types, free of actor plumbing.

pub mod order;
pub mod product;
pub mod restaurant;

pub use order::*;
pub use product::*;
pub use restaurant::*;
