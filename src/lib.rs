pub mod dataset;
pub mod evaluation;
pub mod linear_algebra;

mod activation;
mod error;
mod network;

pub use self::error::NetworkError;
pub use self::network::Network;
