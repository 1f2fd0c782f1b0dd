//! # Serialization format
//!
//! The primitive de/serializable type is [`WireValue`], covering the
//! AMQP 1.0 encodings this codec emits and accepts.
//!
//! The below pseudocode depicts the serialized representations.
//!
//! Every value starts with a one-byte `format_code`. The high nibble of
//! the code determines the category: how many header bytes follow, and
//! whether the body length is implicit (fixed-width), carried in a size
//! field (variable-width), or carried in a size + count pair (compound).
//!
//! ```text
//! struct Null {
//!     format_code:    0x40,
//! }
//!
//! struct Boolean {
//!     format_code:    0x41 (true) or 0x42 (false),
//! }
//!
//! struct Uint {
//!     format_code:    0x43 (zero) or 0x52 (small) or 0x70,
//!     body:           [u8; 0 | 1 | 4],    // big-endian
//! }
//!
//! struct Ulong {
//!     format_code:    0x44 (zero) or 0x53 (small) or 0x80,
//!     body:           [u8; 0 | 1 | 8],    // big-endian
//! }
//!
//! struct Binary or Str or Symbol {
//!     format_code:    0xa0/0xa1/0xa3 (u8 size) or 0xb0/0xb1/0xb3 (u32 size),
//!     size:           u8 | u32,           // big-endian, byte count of body
//!     body:           [u8; size],
//! }
//!
//! struct List or Map {
//!     format_code:    0xc0/0xc1 (u8 fields) or 0xd0/0xd1 (u32 fields),
//!     size:           u8 | u32,           // bytes after the size field
//!     count:          u8 | u32,           // elements (map: keys + values)
//!     elements:       [WireValue; count],
//! }
//!
//! struct Described {
//!     format_code:    0x00,
//!     descriptor:     Ulong (always 0x80 + 8 bytes) or Symbol,
//!     value:          WireValue,          // typically a List or Map
//! }
//! ```
//!
//! Encoding always chooses the most compact width for the value at hand
//! (`0x43` for a zero uint, `0xa0` for a short binary, ...), except for
//! the numeric descriptor of a described value, which is always written
//! in the full `0x80` + 8-byte form so that the descriptor preamble is
//! byte-identical across implementations.
//!
//! Decoding accepts every width listed above. Readers may skip over any
//! value by parsing only its header; element payloads of a list or map
//! are never touched until a caller asks for them.

mod described;
mod encoded;
mod encoded_buffer;
mod format_code;
mod reader;
mod serializable;
mod value;

pub use described::*;
pub use encoded::*;
pub use encoded_buffer::*;
pub use format_code::*;
pub use reader::*;
pub use serializable::*;
pub use value::*;
