use crate::{
    SnowflakeId,
    base62::{Base62Error, Base62Int, decode, encode, encode_to_buf},
};

/// Base62 encoding and decoding for [`SnowflakeId`].
///
/// Tokens are the variable-length Base62 form of the raw `u64` (at most 11
/// characters), suitable for short links and other URL paths.
///
/// # Example
///
/// ```
/// use snowlink::{Base62Ext, SnowflakeId};
///
/// let id = SnowflakeId::from_raw(2_424_242_424_242_424_242);
/// let token = id.encode();
/// assert_eq!(token, "2T53tlHzFCy");
/// assert_eq!(SnowflakeId::decode(&token).unwrap(), id);
/// ```
pub trait Base62Ext: Sized {
    /// Returns a stack buffer sized for any encoded ID.
    #[must_use]
    fn buf() -> <u64 as Base62Int>::Buf {
        <u64 as Base62Int>::Buf::default()
    }

    /// Encodes this ID as a Base62 string.
    fn encode(&self) -> String;

    /// Encodes this ID into `buf` without allocating.
    fn encode_to_buf<'buf>(&self, buf: &'buf mut <u64 as Base62Int>::Buf) -> &'buf str;

    /// Decodes a Base62 token back into an ID.
    ///
    /// # Errors
    ///
    /// Any [`decode`] error, or [`Base62Error::InvalidId`] if the value sets
    /// the reserved bit. A generator never mints such an ID, so the token is
    /// corrupt or forged.
    fn decode(s: &str) -> Result<Self, Base62Error>;
}

impl Base62Ext for SnowflakeId {
    fn encode(&self) -> String {
        encode(self.to_raw())
    }

    fn encode_to_buf<'buf>(&self, buf: &'buf mut <u64 as Base62Int>::Buf) -> &'buf str {
        encode_to_buf(self.to_raw(), buf)
    }

    fn decode(s: &str) -> Result<Self, Base62Error> {
        let id = Self::from_raw(decode::<u64>(s)?);
        if !id.is_valid() {
            return Err(Base62Error::InvalidId { raw: id.to_raw() });
        }
        Ok(id)
    }
}
