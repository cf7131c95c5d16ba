//! messages, which are fixed sets of fields serialized one after the other.
//!
//! messages are usually implemented using `#[derive(Message)]` on a struct whose members are all fields:
//!
//! ```
//! use stackproto::{ArrayBuffer, DoubleField, Fixed32Field, Message};
//!
//! #[derive(Message)]
//! struct Reading {
//!     sensor_id: Fixed32Field,
//!     value: DoubleField,
//! }
//!
//! let mut reading = Reading {
//!     sensor_id: Fixed32Field::with_value(1, 3),
//!     value: DoubleField::with_value(2, 21.5),
//! };
//!
//! let mut buf = ArrayBuffer::<32>::new();
//! reading.serialize(&mut buf).unwrap();
//!
//! reading.clear();
//! reading.deserialize(&mut buf).unwrap();
//! assert_eq!(reading.sensor_id.get(), 3);
//! assert_eq!(reading.value.get(), 21.5);
//! ```

use crate::{
    wire::{self, WireType},
    Buffer, Error, Field,
};

/// the maximum amount of bytes in a varint encoded `u64`.
const MAX_VARINT64_SIZE: usize = 10;

/// a message made of a fixed, ordered set of fields.
pub trait Message {
    /// serializes every field in declaration order, without checking the capacity of the buffer up front.
    fn serialize_fields<B: Buffer + ?Sized>(&self, buffer: &mut B) -> Result<(), Error>;

    /// deserializes the payload of the field with the given number. the tag is expected to already be consumed.
    ///
    /// returns `Ok(false)` without touching the buffer if no field of this message has the given number.
    fn deserialize_field<B: Buffer + ?Sized>(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        buffer: &mut B,
    ) -> Result<bool, Error>;

    /// resets every field to its default value.
    fn clear(&mut self);

    /// the amount of bytes [`Message::serialize`] will write.
    fn serialized_size(&self) -> usize;

    /// serializes every non default field in declaration order.
    ///
    /// nothing is written to the buffer if it doesn't have room for the whole message.
    fn serialize<B: Buffer + ?Sized>(&self, buffer: &mut B) -> Result<(), Error> {
        if self.serialized_size() > buffer.remaining() {
            return Err(Error::BufferTooSmall);
        }
        self.serialize_fields(buffer)
    }

    /// deserializes fields from the buffer until it is empty.
    ///
    /// fields which are not present in the buffer keep their current value, so [`Message::clear`] should be called
    /// first when decoding into a reused message. fields with unknown numbers are skipped.
    fn deserialize<B: Buffer + ?Sized>(&mut self, buffer: &mut B) -> Result<(), Error> {
        while buffer.size() > 0 {
            let (field_number, wire_type) = wire::deserialize_tag(buffer)?;
            if !self.deserialize_field(field_number, wire_type, buffer)? {
                skip_field(wire_type, buffer)?;
            }
        }
        Ok(())
    }
}

/// deserializes the payload of the given field after checking that the wire type of its tag matches the field.
pub fn deserialize_checked<F: Field + ?Sized, B: Buffer + ?Sized>(
    field: &mut F,
    wire_type: WireType,
    buffer: &mut B,
) -> Result<(), Error> {
    if field.wire_type() != wire_type {
        return Err(Error::InvalidWireType);
    }
    field.deserialize(buffer)
}

/// consumes the payload of a field with the given wire type without interpreting it.
pub fn skip_field<B: Buffer + ?Sized>(wire_type: WireType, buffer: &mut B) -> Result<(), Error> {
    match wire_type {
        WireType::Varint => skip_varint(buffer),
        WireType::Fixed64 => skip_bytes(8, buffer),
        WireType::Fixed32 => skip_bytes(4, buffer),
        WireType::LengthDelimited => {
            let len = wire::deserialize_varint(buffer)?;
            // a length that doesn't fit in usize can't be held by any buffer either
            let len = usize::try_from(len).map_err(|_| Error::BufferTooSmall)?;
            skip_bytes(len, buffer)
        }
    }
}

fn skip_varint<B: Buffer + ?Sized>(buffer: &mut B) -> Result<(), Error> {
    for _ in 0..MAX_VARINT64_SIZE {
        let byte = buffer.pop().ok_or(Error::BufferTooSmall)?;
        if byte & 0x80 == 0 {
            return Ok(());
        }
    }
    Err(Error::IllegalData)
}

fn skip_bytes<B: Buffer + ?Sized>(amount: usize, buffer: &mut B) -> Result<(), Error> {
    if buffer.size() < amount {
        return Err(Error::BufferTooSmall);
    }
    for _ in 0..amount {
        buffer.pop().ok_or(Error::BufferTooSmall)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayBuffer, Fixed32Field, FloatField};
    use assert_matches::assert_matches;
    use hex_literal::hex;

    #[test]
    fn skip_field_consumes_each_wire_type() {
        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("ac02 ff")).unwrap();
        skip_field(WireType::Varint, &mut buf).unwrap();
        assert_eq!(buf.as_slice(), &[0xff]);

        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("01020304 ff")).unwrap();
        skip_field(WireType::Fixed32, &mut buf).unwrap();
        assert_eq!(buf.as_slice(), &[0xff]);

        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("0102030405060708 ff")).unwrap();
        skip_field(WireType::Fixed64, &mut buf).unwrap();
        assert_eq!(buf.as_slice(), &[0xff]);

        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("03 616263 ff")).unwrap();
        skip_field(WireType::LengthDelimited, &mut buf).unwrap();
        assert_eq!(buf.as_slice(), &[0xff]);
    }

    #[test]
    fn skip_field_rejects_truncated_and_overlong_payloads() {
        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("0102")).unwrap();
        assert_matches!(skip_field(WireType::Fixed32, &mut buf), Err(Error::BufferTooSmall));
        assert_eq!(buf.size(), 2);

        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("05 6162")).unwrap();
        assert_matches!(
            skip_field(WireType::LengthDelimited, &mut buf),
            Err(Error::BufferTooSmall)
        );

        let mut buf = ArrayBuffer::<32>::from_slice(&[0xff; 11]).unwrap();
        assert_matches!(skip_field(WireType::Varint, &mut buf), Err(Error::IllegalData));
    }

    #[test]
    fn skip_field_rejects_huge_length_prefix() {
        // a u32::MAX length followed by a few bytes of payload
        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("ffffffff0f 616263")).unwrap();
        assert_matches!(
            skip_field(WireType::LengthDelimited, &mut buf),
            Err(Error::BufferTooSmall)
        );
        // only the length prefix was consumed
        assert_eq!(buf.as_slice(), hex!("616263"));
    }

    #[test]
    fn deserialize_checked_rejects_mismatching_wire_type() {
        let mut field = Fixed32Field::with_value(1, 9);
        let mut buf = ArrayBuffer::<8>::from_slice(&hex!("01000000")).unwrap();
        assert_matches!(
            deserialize_checked(&mut field, WireType::Fixed64, &mut buf),
            Err(Error::InvalidWireType)
        );
        assert_eq!(field.get(), 9);

        deserialize_checked(&mut field, WireType::Fixed32, &mut buf).unwrap();
        assert_eq!(field.get(), 1);
    }

    /// a message implemented by hand, the way `#[derive(Message)]` would.
    struct Point {
        x: FloatField,
        y: FloatField,
    }

    impl Message for Point {
        fn serialize_fields<B: Buffer + ?Sized>(&self, buffer: &mut B) -> Result<(), Error> {
            self.x.serialize(buffer)?;
            self.y.serialize(buffer)
        }

        fn deserialize_field<B: Buffer + ?Sized>(
            &mut self,
            field_number: u32,
            wire_type: WireType,
            buffer: &mut B,
        ) -> Result<bool, Error> {
            if field_number == self.x.field_number() {
                deserialize_checked(&mut self.x, wire_type, buffer)?;
                return Ok(true);
            }
            if field_number == self.y.field_number() {
                deserialize_checked(&mut self.y, wire_type, buffer)?;
                return Ok(true);
            }
            Ok(false)
        }

        fn clear(&mut self) {
            self.x.clear();
            self.y.clear();
        }

        fn serialized_size(&self) -> usize {
            self.x.serialized_size() + self.y.serialized_size()
        }
    }

    fn point(x: f32, y: f32) -> Point {
        Point {
            x: FloatField::with_value(1, x),
            y: FloatField::with_value(2, y),
        }
    }

    #[test]
    fn serialize_writes_fields_in_order() {
        let mut buf = ArrayBuffer::<16>::new();
        point(1.0, 2.0).serialize(&mut buf).unwrap();
        assert_eq!(buf.as_slice(), hex!("0d 0000803f 15 00000040"));
    }

    #[test]
    fn serialize_never_writes_a_partial_message() {
        // room for the first field but not the second
        let mut buf = ArrayBuffer::<7>::new();
        assert_matches!(point(1.0, 2.0).serialize(&mut buf), Err(Error::BufferTooSmall));
        assert_eq!(buf.size(), 0);

        // the default x is elided, so y alone fits
        let mut buf = ArrayBuffer::<7>::new();
        point(0.0, 2.0).serialize(&mut buf).unwrap();
        assert_eq!(buf.as_slice(), hex!("15 00000040"));
    }

    #[test]
    fn deserialize_skips_unknown_fields() {
        let mut buf =
            ArrayBuffer::<32>::from_slice(&hex!("15 00000040 18 96 01 0d 0000803f")).unwrap();
        let mut p = point(0.0, 0.0);
        p.deserialize(&mut buf).unwrap();
        assert_eq!(p.x.get(), 1.0);
        assert_eq!(p.y.get(), 2.0);
    }

    #[test]
    fn deserialize_rejects_wire_type_mismatch() {
        let mut buf = ArrayBuffer::<32>::from_slice(&hex!("09 0000000000000040")).unwrap();
        let mut p = point(0.0, 0.0);
        assert_matches!(p.deserialize(&mut buf), Err(Error::InvalidWireType));
        assert_eq!(p.x.get(), 0.0);
    }
}
