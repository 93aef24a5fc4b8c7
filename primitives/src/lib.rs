pub mod address;
pub mod error;
pub mod proofs;
pub mod randomness;
pub mod types;
pub mod units;

pub use address::*;
pub use error::*;
pub use proofs::*;
pub use randomness::*;
pub use types::*;
pub use units::*;
