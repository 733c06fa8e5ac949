//! Serialization of fitted parameters.
//!
//! Fitted transformers never serialize backend tensors directly. They export a
//! plain params struct (host `Vec<f64>` and scalars) and that struct is turned
//! into bytes here, so a model fitted on one backend can be loaded on another.

use std::error::Error;

/// Parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data, not backend tensors
/// or handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// Every serde type round-trips through bincode.
impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
