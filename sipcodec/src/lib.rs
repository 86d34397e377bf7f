pub use self::connection::Connection;
pub use self::error::Error;
pub use self::message::Field;
pub use self::message::FixedField;
pub use self::message::Message;
pub use self::spec::ProtocolVersion;

pub mod checksum;
pub mod schema;
pub mod spec;
pub mod util;

mod connection;
mod error;
mod message;

#[cfg(test)]
mod tests;
