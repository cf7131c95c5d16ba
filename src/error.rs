use thiserror_no_std::Error;

/// an error which can occur while serializing or deserializing fields and messages.
///
/// the fixed width field codec only ever produces [`Error::BufferTooSmall`], the other kinds are produced by
/// tag parsing and message level dispatching.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// there was not enough room left in the buffer to write the value, or not enough bytes left in it to read one.
    #[error("buffer too small")]
    BufferTooSmall,

    /// a tag carried a wire type which is not part of the protocol, or which doesn't match the field it addresses.
    #[error("invalid wire type")]
    InvalidWireType,

    /// a tag carried a field number outside of the valid range.
    #[error("invalid field number")]
    InvalidFieldNumber,

    /// the data is malformed, for example an overlong varint.
    #[error("illegal data")]
    IllegalData,
}
