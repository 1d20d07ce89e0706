mod codec;
pub mod config;
mod encoded;
mod temporal;

pub use codec::Codec;
pub use config::{CodecConfig, EmptyLobBehavior, TimeZoneMode};
pub use encoded::EncodedValue;
