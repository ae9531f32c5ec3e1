//! Length-bounded containers mirroring XDR's `opaque<N>`, `string<N>` and
//! `T<N>` declarations. The bound is checked on construction and on decode.

use std::{fmt, ops::Deref};

use super::{ReadXdr, WriteXdr, XdrReader, XdrWriter};
use crate::models::CodecError;

fn check_len(len: usize, max: u32) -> Result<(), CodecError> {
    if len > max as usize {
        return Err(CodecError::LengthExceedsMax { declared: len, max });
    }
    Ok(())
}

/// Variable-length opaque data, `opaque<MAX>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct BytesM<const MAX: u32 = { u32::MAX }>(Vec<u8>);

impl<const MAX: u32> BytesM<MAX> {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl<const MAX: u32> Deref for BytesM<MAX> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl<const MAX: u32> AsRef<[u8]> for BytesM<MAX> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const MAX: u32> TryFrom<Vec<u8>> for BytesM<MAX> {
    type Error = CodecError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        check_len(value.len(), MAX)?;
        Ok(Self(value))
    }
}

impl<const MAX: u32> TryFrom<&[u8]> for BytesM<MAX> {
    type Error = CodecError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        value.to_vec().try_into()
    }
}

impl<const MAX: u32> WriteXdr for BytesM<MAX> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_var_opaque(&self.0);
    }
}

impl<const MAX: u32> ReadXdr for BytesM<MAX> {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Self(r.read_var_opaque(MAX)?))
    }
}

/// UTF-8 string, `string<MAX>`. The bound counts bytes, not characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct StringM<const MAX: u32 = { u32::MAX }>(String);

impl<const MAX: u32> StringM<MAX> {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl<const MAX: u32> Deref for StringM<MAX> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: u32> fmt::Display for StringM<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const MAX: u32> TryFrom<String> for StringM<MAX> {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_len(value.len(), MAX)?;
        Ok(Self(value))
    }
}

impl<const MAX: u32> TryFrom<&str> for StringM<MAX> {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl<const MAX: u32> WriteXdr for StringM<MAX> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_string(&self.0);
    }
}

impl<const MAX: u32> ReadXdr for StringM<MAX> {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Self(r.read_string(MAX)?))
    }
}

/// Variable-length array, `T<MAX>`.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct VecM<T, const MAX: u32 = { u32::MAX }>(Vec<T>);

impl<T, const MAX: u32> Default for VecM<T, MAX> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T, const MAX: u32> VecM<T, MAX> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    /// Appends an item, failing once the array is full.
    pub fn try_push(&mut self, item: T) -> Result<(), CodecError> {
        check_len(self.0.len() + 1, MAX)?;
        self.0.push(item);
        Ok(())
    }
}

impl<T, const MAX: u32> Deref for VecM<T, MAX> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T, const MAX: u32> IntoIterator for &'a VecM<T, MAX> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T, const MAX: u32> IntoIterator for VecM<T, MAX> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T, const MAX: u32> TryFrom<Vec<T>> for VecM<T, MAX> {
    type Error = CodecError;

    fn try_from(value: Vec<T>) -> Result<Self, Self::Error> {
        check_len(value.len(), MAX)?;
        Ok(Self(value))
    }
}

impl<T: WriteXdr, const MAX: u32> WriteXdr for VecM<T, MAX> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_slice(&self.0);
    }
}

impl<T: ReadXdr, const MAX: u32> ReadXdr for VecM<T, MAX> {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Self(r.read_vec(MAX)?))
    }
}
