//! this is a crate for serializing and deserializing protobuf messages on embedded targets, without any heap
//! allocations.
//!
//! every field stores its value inline and serializes itself into a fixed capacity [`Buffer`], producing output
//! which is byte identical to the reference protobuf wire format. capacity is checked before the first byte is
//! written, so a failed serialization never leaves a partially written field or message behind, and a failed
//! deserialization never leaves a partially updated value behind.
//!
//! the following fields are supported:
//! - fixed width scalars: `fixed32`, `sfixed32`, `float`, `fixed64`, `sfixed64` and `double`, see the [`fixed`]
//!   module.
//!
//! like the protobuf reference implementation for scalar fields without explicit presence, a field holding its
//! default value is left out of the serialized output. for floating point fields, any value within machine epsilon
//! of zero counts as the default.
//!
//! ### features
//!
//! - `std`: the [`Error`] type implements `std::error::Error`.
//! - `defmt`: [`Error`] and [`WireType`] implement `defmt::Format`, for logging outcomes on embedded targets.
//!
//! # Example
//! ```
//! use stackproto::{ArrayBuffer, Fixed64Field, FloatField, Message, SFixed32Field};
//!
//! #[derive(Message)]
//! struct Telemetry {
//!     timestamp: Fixed64Field,
//!     temperature: FloatField,
//!     offset: SFixed32Field,
//! }
//!
//! impl Telemetry {
//!     fn new() -> Self {
//!         Self {
//!             timestamp: Fixed64Field::new(1),
//!             temperature: FloatField::new(2),
//!             offset: SFixed32Field::new(3),
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let mut telemetry = Telemetry::new();
//!     telemetry.timestamp.set(1_700_000_000);
//!     telemetry.temperature.set(36.6);
//!
//!     // serialize into a statically sized buffer on the stack
//!     let mut buf = ArrayBuffer::<64>::new();
//!     telemetry.serialize(&mut buf).unwrap();
//!
//!     // the zero valued offset was left out
//!     assert_eq!(buf.as_slice().len(), 9 + 5);
//!
//!     let mut decoded = Telemetry::new();
//!     decoded.deserialize(&mut buf).unwrap();
//!     assert_eq!(decoded.timestamp.get(), 1_700_000_000);
//!     assert_eq!(decoded.temperature.get(), 36.6);
//!     assert_eq!(decoded.offset.get(), 0);
//! }
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod buffer;
mod error;
mod field;
pub mod fixed;
pub mod message;
pub mod wire;

pub use buffer::{ArrayBuffer, Buffer};
pub use error::Error;
pub use field::Field;
pub use fixed::{
    DoubleField, Fixed32Field, Fixed64Field, FixedField, FloatField, SFixed32Field, SFixed64Field,
};
pub use message::Message;
pub use stackproto_macros::Message;
pub use wire::WireType;
