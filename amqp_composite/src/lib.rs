//! Composite (described) types layered over the wire codec: static
//! schemas, schema-driven decoding, and the mutable-bean /
//! immutable-buffer pair every composite type is expressed through.

mod bean;
mod buffer;
mod decode;
mod schema;
mod composite_test;

pub mod marshaller;
pub mod sasl;
pub mod source;

pub use bean::*;
pub use buffer::*;
pub use decode::*;
pub use marshaller::*;
pub use schema::*;
