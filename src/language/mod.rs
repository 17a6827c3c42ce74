pub mod pool;

pub use pool::{PoolRegistry, WordPool};
