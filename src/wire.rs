//! the low level building blocks of the wire format: wire types, tags and the varint encoding used for tags.
//!
//! see <https://protobuf.dev/programming-guides/encoding/#structure>.

use crate::{Buffer, Error};

/// the largest field number allowed by the protocol.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// the maximum amount of bytes in a varint encoded `u32`.
pub const MAX_VARINT32_SIZE: usize = 5;

const WIRE_TYPE_BITS: u32 = 3;
const WIRE_TYPE_MASK: u32 = (1 << WIRE_TYPE_BITS) - 1;

/// the wire types of the protocol. the discriminants are the low 3 bits of a tag and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum WireType {
    /// variable length integers (int32, int64, uint32, uint64, sint32, sint64, bool, enum).
    Varint = 0,
    /// 8 byte little endian values (fixed64, sfixed64, double).
    Fixed64 = 1,
    /// length prefixed values (string, bytes, embedded messages, packed repeated fields).
    LengthDelimited = 2,
    /// 4 byte little endian values (fixed32, sfixed32, float).
    Fixed32 = 5,
}

impl TryFrom<u32> for WireType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            5 => Ok(Self::Fixed32),
            // groups (3 and 4) are deprecated and not supported.
            _ => Err(Error::InvalidWireType),
        }
    }
}

/// combines a field number and a wire type into a tag.
pub const fn tag(field_number: u32, wire_type: WireType) -> u32 {
    (field_number << WIRE_TYPE_BITS) | wire_type as u32
}

/// returns the amount of bytes needed to varint encode the given value.
pub const fn varint_size(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0xfff_ffff => 4,
        _ => 5,
    }
}

/// varint encodes the given value into the buffer.
///
/// nothing is written if the buffer doesn't have room for the whole encoding.
pub fn serialize_varint<B: Buffer + ?Sized>(mut value: u32, buffer: &mut B) -> Result<(), Error> {
    if varint_size(value) > buffer.remaining() {
        return Err(Error::BufferTooSmall);
    }
    loop {
        // least significant 7 bits, with the top bit set when more bytes follow
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        if !buffer.push(byte) {
            return Err(Error::BufferTooSmall);
        }
        if value == 0 {
            return Ok(());
        }
    }
}

/// decodes a varint encoded `u32` from the buffer.
///
/// # Errors
///
/// returns [`Error::BufferTooSmall`] if the buffer ran out before the last byte of the varint, and
/// [`Error::IllegalData`] if the varint is longer than 5 bytes or doesn't fit in 32 bits.
pub fn deserialize_varint<B: Buffer + ?Sized>(buffer: &mut B) -> Result<u32, Error> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT32_SIZE {
        let byte = buffer.pop().ok_or(Error::BufferTooSmall)?;
        let bits = u32::from(byte & 0x7f);
        // the fifth byte may only carry the 4 remaining bits of a u32
        if i == MAX_VARINT32_SIZE - 1 && bits > 0x0f {
            return Err(Error::IllegalData);
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::IllegalData)
}

/// serializes the tag made of the given field number and wire type into the buffer.
pub fn serialize_tag<B: Buffer + ?Sized>(
    field_number: u32,
    wire_type: WireType,
    buffer: &mut B,
) -> Result<(), Error> {
    serialize_varint(tag(field_number, wire_type), buffer)
}

/// decodes a tag from the buffer and splits it into its field number and wire type.
///
/// # Errors
///
/// on top of the errors of [`deserialize_varint`], returns [`Error::InvalidWireType`] for unknown wire types and
/// [`Error::InvalidFieldNumber`] for a field number of zero.
pub fn deserialize_tag<B: Buffer + ?Sized>(buffer: &mut B) -> Result<(u32, WireType), Error> {
    let tag = deserialize_varint(buffer)?;
    let wire_type = WireType::try_from(tag & WIRE_TYPE_MASK)?;
    let field_number = tag >> WIRE_TYPE_BITS;
    if field_number == 0 {
        return Err(Error::InvalidFieldNumber);
    }
    Ok((field_number, wire_type))
}
