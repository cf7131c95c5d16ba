//! fields whose payload always occupies a fixed amount of bytes on the wire.
//!
//! a fixed field is parameterized by its wire width ([`Fixed32`] or [`Fixed64`]) and by the native type it holds. the
//! payload is the raw bit pattern of the value in little endian byte order: two's complement for signed integers and
//! IEEE-754 for floats. the value is moved through an unsigned integer of the same width using a bit cast, never a
//! numeric conversion, so every bit pattern (including NaN payloads) crosses the wire unchanged.
//!
//! the following concrete field types are provided:
//!
//! | protobuf type | field type         | wire width   |
//! |---------------|--------------------|--------------|
//! | `fixed32`     | [`Fixed32Field`]   | [`Fixed32`]  |
//! | `sfixed32`    | [`SFixed32Field`]  | [`Fixed32`]  |
//! | `float`       | [`FloatField`]     | [`Fixed32`]  |
//! | `fixed64`     | [`Fixed64Field`]   | [`Fixed64`]  |
//! | `sfixed64`    | [`SFixed64Field`]  | [`Fixed64`]  |
//! | `double`      | [`DoubleField`]    | [`Fixed64`]  |

use core::{
    fmt::Debug,
    marker::PhantomData,
    ops::{Add, Sub},
};

use crate::{
    wire::{self, WireType, MAX_FIELD_NUMBER},
    Buffer, Error, Field,
};

mod sealed {
    pub trait Sealed {}
}

/// a wire width of a fixed field.
///
/// this trait is sealed, the only widths are [`Fixed32`] and [`Fixed64`].
pub trait FixedWidth: sealed::Sealed + Debug + Clone + Copy + PartialEq {
    /// the wire type of fields with this width.
    const WIRE_TYPE: WireType;

    /// the amount of payload bytes of fields with this width.
    const SIZE: usize;

    /// the unsigned integer type that has exactly this width. values are moved through it on their way to the wire.
    type Bits: Copy;

    /// writes the given bits to the buffer in little endian byte order.
    fn write_bits<B: Buffer + ?Sized>(bits: Self::Bits, buffer: &mut B) -> Result<(), Error>;

    /// reads bits in little endian byte order from the buffer, one byte at a time.
    ///
    /// bytes popped before a failure are lost, but no partial value is ever produced.
    fn read_bits<B: Buffer + ?Sized>(buffer: &mut B) -> Result<Self::Bits, Error>;
}

/// the 4 byte wire width, used by `fixed32`, `sfixed32` and `float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed32;

/// the 8 byte wire width, used by `fixed64`, `sfixed64` and `double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed64;

macro_rules! impl_fixed_width {
    {$($width: ident => $bits: ty),+} => {
        $(
            impl sealed::Sealed for $width {}

            impl FixedWidth for $width {
                const WIRE_TYPE: WireType = WireType::$width;
                const SIZE: usize = core::mem::size_of::<$bits>();
                type Bits = $bits;

                fn write_bits<B: Buffer + ?Sized>(bits: $bits, buffer: &mut B) -> Result<(), Error> {
                    for byte in bits.to_le_bytes() {
                        if !buffer.push(byte) {
                            return Err(Error::BufferTooSmall);
                        }
                    }
                    Ok(())
                }

                fn read_bits<B: Buffer + ?Sized>(buffer: &mut B) -> Result<$bits, Error> {
                    let bytes = array_init::try_array_init(|_| buffer.pop().ok_or(Error::BufferTooSmall))?;
                    Ok(<$bits>::from_le_bytes(bytes))
                }
            }
        )+
    };
}

impl_fixed_width! {Fixed32 => u32, Fixed64 => u64}

/// a native type which can be held by a fixed field of width `W`.
///
/// this is only implemented for types whose size is exactly `W::SIZE`, which is checked at compile time.
pub trait FixedScalar<W: FixedWidth>:
    sealed::Sealed + Debug + Clone + Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self>
{
    /// the protobuf default value of this type.
    const ZERO: Self;

    /// the tolerance used when comparing against [`Self::ZERO`]. zero for integers and the machine epsilon for floats.
    const EPSILON: Self;

    /// reinterprets the bit pattern of this value as an unsigned integer of the same width.
    fn to_bits(self) -> W::Bits;

    /// reinterprets the given bits as a value of this type.
    fn from_bits(bits: W::Bits) -> Self;

    /// returns `true` if this value is within [`Self::EPSILON`] of [`Self::ZERO`].
    ///
    /// NaN compares false on both sides and is therefore never a default.
    fn is_default_value(self) -> bool {
        Self::ZERO - Self::EPSILON <= self && self <= Self::ZERO + Self::EPSILON
    }
}

macro_rules! impl_fixed_scalar_for_ints {
    {$($type: ty => $width: ty as $bits: ty),+} => {
        $(
            impl sealed::Sealed for $type {}

            impl FixedScalar<$width> for $type {
                const ZERO: Self = 0;
                const EPSILON: Self = 0;

                fn to_bits(self) -> $bits {
                    // same width, so this reinterprets the two's complement bits
                    self as $bits
                }

                fn from_bits(bits: $bits) -> Self {
                    bits as Self
                }
            }

            const _: () = assert!(core::mem::size_of::<$type>() == <$width as FixedWidth>::SIZE);
        )+
    };
}

macro_rules! impl_fixed_scalar_for_floats {
    {$($type: ty => $width: ty),+} => {
        $(
            impl sealed::Sealed for $type {}

            impl FixedScalar<$width> for $type {
                const ZERO: Self = 0.0;
                const EPSILON: Self = <$type>::EPSILON;

                fn to_bits(self) -> <$width as FixedWidth>::Bits {
                    <$type>::to_bits(self)
                }

                fn from_bits(bits: <$width as FixedWidth>::Bits) -> Self {
                    <$type>::from_bits(bits)
                }
            }

            const _: () = assert!(core::mem::size_of::<$type>() == <$width as FixedWidth>::SIZE);
        )+
    };
}

impl_fixed_scalar_for_ints! {u32 => Fixed32 as u32, i32 => Fixed32 as u32, u64 => Fixed64 as u64, i64 => Fixed64 as u64}
impl_fixed_scalar_for_floats! {f32 => Fixed32, f64 => Fixed64}

/// a field holding a single fixed width value inline.
///
/// a value equal to the default (within epsilon for floats) is never serialized, so a field explicitly set to zero
/// can't be told apart from an untouched one on the wire.
///
/// # Example
/// ```
/// use stackproto::{ArrayBuffer, Field, Fixed32Field};
///
/// let mut field = Fixed32Field::new(1);
/// field.set(0x01020304);
///
/// let mut buf = ArrayBuffer::<8>::new();
/// field.serialize(&mut buf).unwrap();
/// assert_eq!(buf.as_slice(), &[0x0d, 0x04, 0x03, 0x02, 0x01]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedField<W: FixedWidth, T: FixedScalar<W>> {
    number: u32,
    value: T,
    width: PhantomData<W>,
}

impl<W: FixedWidth, T: FixedScalar<W>> FixedField<W, T> {
    /// creates a field with the given field number, holding the default value.
    pub const fn new(number: u32) -> Self {
        Self::with_value(number, T::ZERO)
    }

    /// creates a field with the given field number, holding the given value.
    pub const fn with_value(number: u32, value: T) -> Self {
        debug_assert!(
            number != 0 && number <= MAX_FIELD_NUMBER,
            "field number out of range"
        );
        Self {
            number,
            value,
            width: PhantomData,
        }
    }

    /// sets the value of this field. every bit pattern is accepted.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// returns the value of this field.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<W: FixedWidth, T: FixedScalar<W>> Field for FixedField<W, T> {
    fn field_number(&self) -> u32 {
        self.number
    }

    fn wire_type(&self) -> WireType {
        W::WIRE_TYPE
    }

    fn serialize<B: Buffer + ?Sized>(&self, buffer: &mut B) -> Result<(), Error> {
        if self.is_default() {
            return Ok(());
        }
        // the size is known up front, so checking once guarantees that nothing is written partially.
        if self.serialized_size() > buffer.remaining() {
            return Err(Error::BufferTooSmall);
        }
        wire::serialize_varint(self.tag(), buffer)?;
        W::write_bits(self.value.to_bits(), buffer)
    }

    fn deserialize<B: Buffer + ?Sized>(&mut self, buffer: &mut B) -> Result<(), Error> {
        if buffer.size() < W::SIZE {
            return Err(Error::BufferTooSmall);
        }
        let bits = W::read_bits(buffer)?;
        self.value = T::from_bits(bits);
        Ok(())
    }

    fn clear(&mut self) {
        self.value = T::ZERO;
    }

    fn serialized_data_size(&self) -> usize {
        W::SIZE
    }

    fn is_default(&self) -> bool {
        self.value.is_default_value()
    }
}

/// a protobuf `fixed32` field.
pub type Fixed32Field = FixedField<Fixed32, u32>;
/// a protobuf `sfixed32` field.
pub type SFixed32Field = FixedField<Fixed32, i32>;
/// a protobuf `float` field.
pub type FloatField = FixedField<Fixed32, f32>;
/// a protobuf `fixed64` field.
pub type Fixed64Field = FixedField<Fixed64, u64>;
/// a protobuf `sfixed64` field.
pub type SFixed64Field = FixedField<Fixed64, i64>;
/// a protobuf `double` field.
pub type DoubleField = FixedField<Fixed64, f64>;
