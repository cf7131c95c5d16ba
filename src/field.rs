use crate::{
    wire::{self, WireType},
    Buffer, Error,
};

/// the contract shared by every kind of field a message is made of.
///
/// a field knows its own field number and wire type, and can write itself to and read itself from a [`Buffer`].
pub trait Field {
    /// the field number as specified in the `.proto` file.
    fn field_number(&self) -> u32;

    /// the wire type used to encode this field.
    fn wire_type(&self) -> WireType;

    /// the tag which precedes this field on the wire.
    fn tag(&self) -> u32 {
        wire::tag(self.field_number(), self.wire_type())
    }

    /// serializes the tag and the payload of this field into the buffer.
    ///
    /// nothing is written to the buffer if this fails.
    fn serialize<B: Buffer + ?Sized>(&self, buffer: &mut B) -> Result<(), Error>;

    /// deserializes the payload of this field from the buffer. the tag is expected to already be consumed.
    fn deserialize<B: Buffer + ?Sized>(&mut self, buffer: &mut B) -> Result<(), Error>;

    /// resets this field to its default value.
    fn clear(&mut self);

    /// the size of the payload of this field, excluding the tag.
    fn serialized_data_size(&self) -> usize;

    /// returns `true` if this field holds its default value, in which case it is left out when serializing.
    fn is_default(&self) -> bool;

    /// the amount of bytes [`Field::serialize`] will write, including the tag.
    fn serialized_size(&self) -> usize {
        if self.is_default() {
            0
        } else {
            wire::varint_size(self.tag()) + self.serialized_data_size()
        }
    }
}
