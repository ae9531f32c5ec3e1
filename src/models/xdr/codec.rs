//! Big-endian, 4-byte aligned reader and writer for the Stellar wire format.
//!
//! Every protocol type implements [`WriteXdr`] and [`ReadXdr`] on top of the
//! primitives here. Encoding is infallible and deterministic; decoding checks
//! every declared length against both the remaining input and the type's
//! declared maximum before allocating.

use log::debug;

use crate::{
    models::CodecError,
    utils::{base64_decode, base64_encode},
};

/// Default maximum nesting depth for recursive types (SCVal, claim predicates,
/// authorized invocations). Decoding at this depth fits a 2 MiB thread stack
/// in unoptimized builds.
pub const DEFAULT_DEPTH_LIMIT: u32 = 200;

/// Resource limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of recursive values.
    pub depth: u32,
    /// Maximum number of bytes consumed by a single decode.
    pub len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH_LIMIT,
            len: usize::MAX,
        }
    }
}

impl Limits {
    pub fn none() -> Self {
        Self {
            depth: u32::MAX,
            len: usize::MAX,
        }
    }

    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn len(len: usize) -> Self {
        Self {
            len,
            ..Default::default()
        }
    }
}

fn padding_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(u32::from(value));
    }

    /// Writes bytes followed by zero padding up to the next 4-byte boundary.
    pub fn write_fixed_opaque(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.buf
            .extend(std::iter::repeat_n(0u8, padding_len(bytes.len())));
    }

    /// Writes a u32 length prefix, the bytes, then zero padding.
    ///
    /// Callers hold lengths in bounded containers whose maximum fits in a u32.
    pub fn write_var_opaque(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.write_fixed_opaque(bytes);
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_var_opaque(value.as_bytes());
    }

    pub fn write_optional<T: WriteXdr>(&mut self, value: Option<&T>) {
        match value {
            Some(inner) => {
                self.write_u32(1);
                inner.write_xdr(self);
            }
            None => self.write_u32(0),
        }
    }

    pub fn write_slice<T: WriteXdr>(&mut self, items: &[T]) {
        self.write_u32(items.len() as u32);
        for item in items {
            item.write_xdr(self);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an input buffer. Never reads past the end of the buffer.
#[derive(Debug)]
pub struct XdrReader<'a> {
    buf: &'a [u8],
    pos: usize,
    depth_remaining: u32,
    len_remaining: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, Limits::default())
    }

    pub fn with_limits(buf: &'a [u8], limits: Limits) -> Self {
        Self {
            buf,
            pos: 0,
            depth_remaining: limits.depth,
            len_remaining: limits.len,
        }
    }

    /// Bytes left in the input.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Runs `f` one nesting level deeper, failing once the depth budget is spent.
    pub fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        if self.depth_remaining == 0 {
            return Err(CodecError::DepthLimitExceeded);
        }
        self.depth_remaining -= 1;
        let result = f(self);
        self.depth_remaining += 1;
        result
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::Truncated {
                needed: n,
                remaining,
            });
        }
        if n > self.len_remaining {
            return Err(CodecError::ReadLimitExceeded);
        }
        self.len_remaining -= n;
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    fn read_padding(&mut self, len: usize) -> Result<(), CodecError> {
        let pad = self.take(padding_len(len))?;
        if pad.iter().any(|b| *b != 0) {
            return Err(CodecError::NonZeroPadding);
        }
        Ok(())
    }

    pub fn read_fixed_opaque<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let out = self.take_array::<N>()?;
        self.read_padding(N)?;
        Ok(out)
    }

    /// Reads a u32 length prefix and checks it against `max` and the input
    /// still available, where every element occupies at least `min_item_size`
    /// bytes.
    fn read_len(&mut self, max: u32, min_item_size: usize) -> Result<usize, CodecError> {
        let declared = self.read_u32()?;
        if declared > max {
            return Err(CodecError::LengthExceedsMax {
                declared: declared as usize,
                max,
            });
        }
        let declared = declared as usize;
        let remaining = self.remaining();
        let needed = declared
            .checked_mul(min_item_size)
            .map(|n| n + padding_len(n));
        match needed {
            Some(needed) if needed <= remaining => Ok(declared),
            _ => Err(CodecError::LengthExceedsInput {
                declared,
                remaining,
            }),
        }
    }

    pub fn read_var_opaque(&mut self, max: u32) -> Result<Vec<u8>, CodecError> {
        let len = self.read_len(max, 1)?;
        let bytes = self.take(len)?.to_vec();
        self.read_padding(len)?;
        Ok(bytes)
    }

    pub fn read_string(&mut self, max: u32) -> Result<String, CodecError> {
        let bytes = self.read_var_opaque(max)?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
    }

    pub fn read_optional<T: ReadXdr>(&mut self) -> Result<Option<T>, CodecError> {
        match self.read_u32()? {
            0 => Ok(None),
            1 => Ok(Some(T::read_xdr(self)?)),
            other => Err(CodecError::InvalidOptionalFlag(other)),
        }
    }

    pub fn read_vec<T: ReadXdr>(&mut self, max: u32) -> Result<Vec<T>, CodecError> {
        // every XDR item is at least 4 bytes wide
        let len = self.read_len(max, 4)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::read_xdr(self)?);
        }
        Ok(items)
    }
}

pub trait WriteXdr {
    fn write_xdr(&self, w: &mut XdrWriter);

    fn to_xdr(&self) -> Vec<u8> {
        let mut w = XdrWriter::new();
        self.write_xdr(&mut w);
        w.into_bytes()
    }

    fn to_xdr_base64(&self) -> String {
        base64_encode(&self.to_xdr())
    }
}

pub trait ReadXdr: Sized {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError>;

    /// Decodes a value that must span the whole buffer.
    fn from_xdr(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_xdr_with_limits(bytes, Limits::default())
    }

    fn from_xdr_with_limits(bytes: &[u8], limits: Limits) -> Result<Self, CodecError> {
        let mut r = XdrReader::with_limits(bytes, limits);
        let value = Self::read_xdr(&mut r).inspect_err(|e| {
            debug!(
                "XDR decode failed at byte {} of {}: {e}",
                r.position(),
                bytes.len()
            )
        })?;
        match r.remaining() {
            0 => Ok(value),
            trailing => Err(CodecError::TrailingBytes(trailing)),
        }
    }

    /// Decodes a value from the front of the buffer and reports how many bytes
    /// it consumed.
    fn from_xdr_prefix(bytes: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut r = XdrReader::new(bytes);
        let value = Self::read_xdr(&mut r)?;
        Ok((value, r.position()))
    }

    fn from_xdr_base64(data: &str) -> Result<Self, CodecError> {
        let bytes = base64_decode(data.trim())?;
        Self::from_xdr(&bytes)
    }
}

impl WriteXdr for u32 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_u32(*self);
    }
}

impl ReadXdr for u32 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_u32()
    }
}

impl WriteXdr for i32 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_i32(*self);
    }
}

impl ReadXdr for i32 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_i32()
    }
}

impl WriteXdr for u64 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_u64(*self);
    }
}

impl ReadXdr for u64 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_u64()
    }
}

impl WriteXdr for i64 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_i64(*self);
    }
}

impl ReadXdr for i64 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_i64()
    }
}

impl WriteXdr for bool {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_bool(*self);
    }
}

impl ReadXdr for bool {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_bool()
    }
}

impl<const N: usize> WriteXdr for [u8; N] {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(self);
    }
}

impl<const N: usize> ReadXdr for [u8; N] {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_fixed_opaque::<N>()
    }
}

impl<T: WriteXdr> WriteXdr for Option<T> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_optional(self.as_ref());
    }
}

impl<T: ReadXdr> ReadXdr for Option<T> {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.read_optional()
    }
}

impl<T: WriteXdr> WriteXdr for Box<T> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.as_ref().write_xdr(w);
    }
}

impl<T: ReadXdr> ReadXdr for Box<T> {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.nested(|r| Ok(Box::new(T::read_xdr(r)?)))
    }
}

/// Implements the XDR codec for a `#[repr(i32)]` enum deriving num_enum's
/// `IntoPrimitive` and `TryFromPrimitive`.
macro_rules! xdr_enum_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::models::xdr::WriteXdr for $ty {
            fn write_xdr(&self, w: &mut $crate::models::xdr::XdrWriter) {
                w.write_i32(i32::from(*self));
            }
        }

        impl $crate::models::xdr::ReadXdr for $ty {
            fn read_xdr(
                r: &mut $crate::models::xdr::XdrReader,
            ) -> Result<Self, $crate::models::CodecError> {
                Ok(<$ty>::try_from(r.read_i32()?)?)
            }
        }
    )+};
}
pub(crate) use xdr_enum_codec;

/// Implements the XDR codec for a struct whose fields are encoded one after
/// another in the listed order.
macro_rules! xdr_struct_codec {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::models::xdr::WriteXdr for $ty {
            fn write_xdr(&self, w: &mut $crate::models::xdr::XdrWriter) {
                $($crate::models::xdr::WriteXdr::write_xdr(&self.$field, w);)+
            }
        }

        impl $crate::models::xdr::ReadXdr for $ty {
            fn read_xdr(
                r: &mut $crate::models::xdr::XdrReader,
            ) -> Result<Self, $crate::models::CodecError> {
                Ok($ty {
                    $($field: $crate::models::xdr::ReadXdr::read_xdr(r)?,)+
                })
            }
        }
    };
}
pub(crate) use xdr_struct_codec;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primitives_are_big_endian() {
        assert_eq!(1u32.to_xdr(), vec![0, 0, 0, 1]);
        assert_eq!((-1i32).to_xdr(), vec![0xff; 4]);
        assert_eq!(
            0x0102030405060708u64.to_xdr(),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(true.to_xdr(), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_fixed_opaque_is_padded() {
        let value = [0xaau8; 5];
        assert_eq!(value.to_xdr(), vec![0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0, 0, 0]);
        assert_eq!(<[u8; 5]>::from_xdr(&value.to_xdr()).unwrap(), value);
    }

    #[test]
    fn test_non_zero_padding_is_rejected() {
        let bytes = vec![0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0, 1, 0];
        assert_eq!(
            <[u8; 5]>::from_xdr(&bytes),
            Err(CodecError::NonZeroPadding)
        );

        let mut r = XdrReader::new(&[0, 0, 0, 1, b'a', 0, 0, 7]);
        assert_eq!(r.read_var_opaque(10), Err(CodecError::NonZeroPadding));
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(
            u64::from_xdr(&[0, 0, 0, 1]),
            Err(CodecError::Truncated {
                needed: 8,
                remaining: 4
            })
        );
    }

    #[test]
    fn test_declared_length_exceeding_input() {
        let mut r = XdrReader::new(&[0, 0, 0, 9, 1, 2, 3, 4]);
        assert_eq!(
            r.read_var_opaque(64),
            Err(CodecError::LengthExceedsInput {
                declared: 9,
                remaining: 4
            })
        );

        // a huge element count must fail before any allocation
        let mut r = XdrReader::new(&[0xff, 0xff, 0xff, 0xff]);
        assert!(matches!(
            r.read_vec::<u32>(u32::MAX),
            Err(CodecError::LengthExceedsInput { .. })
        ));
    }

    #[test]
    fn test_declared_length_exceeding_max() {
        let mut r = XdrReader::new(&[0, 0, 0, 5, 1, 2, 3, 4, 5, 0, 0, 0]);
        assert_eq!(
            r.read_var_opaque(4),
            Err(CodecError::LengthExceedsMax {
                declared: 5,
                max: 4
            })
        );
    }

    #[test]
    fn test_invalid_bool_and_optional_flags() {
        assert_eq!(bool::from_xdr(&[0, 0, 0, 2]), Err(CodecError::InvalidBool(2)));
        assert_eq!(
            Option::<u32>::from_xdr(&[0, 0, 0, 3]),
            Err(CodecError::InvalidOptionalFlag(3))
        );
        assert_eq!(Option::<u32>::from_xdr(&[0, 0, 0, 0]), Ok(None));
        assert_eq!(
            Option::<u32>::from_xdr(&[0, 0, 0, 1, 0, 0, 0, 7]),
            Ok(Some(7))
        );
    }

    #[test]
    fn test_invalid_utf8_string() {
        let mut r = XdrReader::new(&[0, 0, 0, 2, 0xc3, 0x28, 0, 0]);
        assert_eq!(r.read_string(10), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn test_trailing_bytes_and_prefix_decode() {
        let bytes = [0, 0, 0, 7, 0, 0, 0, 8];
        assert_eq!(u32::from_xdr(&bytes), Err(CodecError::TrailingBytes(4)));
        assert_eq!(u32::from_xdr_prefix(&bytes), Ok((7, 4)));
    }

    #[test]
    fn test_depth_limit() {
        let bytes = Box::new(Box::new(5u32)).to_xdr();
        let limits = Limits::depth(1);
        assert_eq!(
            Box::<Box<u32>>::from_xdr_with_limits(&bytes, limits),
            Err(CodecError::DepthLimitExceeded)
        );
        assert!(Box::<Box<u32>>::from_xdr_with_limits(&bytes, Limits::depth(2)).is_ok());
    }

    #[test]
    fn test_read_length_limit() {
        let bytes = 5u64.to_xdr();
        assert_eq!(
            u64::from_xdr_with_limits(&bytes, Limits::len(4)),
            Err(CodecError::ReadLimitExceeded)
        );
    }

    #[test]
    fn test_base64_helpers() {
        assert_eq!(7u32.to_xdr_base64(), "AAAABw==");
        assert_eq!(u32::from_xdr_base64("AAAABw=="), Ok(7));
        assert!(matches!(
            u32::from_xdr_base64("not base64!"),
            Err(CodecError::InvalidBase64(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_i64_round_trip(v in any::<i64>()) {
            prop_assert_eq!(i64::from_xdr(&v.to_xdr()).unwrap(), v);
        }

        #[test]
        fn prop_var_opaque_is_aligned(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut w = XdrWriter::new();
            w.write_var_opaque(&bytes);
            let encoded = w.into_bytes();
            prop_assert_eq!(encoded.len() % 4, 0);
            let mut r = XdrReader::new(&encoded);
            prop_assert_eq!(r.read_var_opaque(64).unwrap(), bytes);
            prop_assert_eq!(r.remaining(), 0);
        }
    }
}
