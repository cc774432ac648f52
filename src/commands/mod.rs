//! CLI command implementations.

pub mod batch;
pub mod lookup;

pub use batch::BatchCommand;
pub use lookup::LookupCommand;
