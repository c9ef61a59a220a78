use core::fmt;

/// Unsigned integer widths the Base62 codec can encode and decode.
///
/// Implemented for `u32`, `u64` and `u128`. Every operation is exact integer
/// arithmetic, so the full range of each type round-trips.
pub trait Base62Int: Copy + Sized + PartialEq + fmt::Debug {
    /// Length of the longest encoding (that of `Self::MAX`).
    const MAX_LEN: usize;

    const ZERO: Self;

    /// A stack buffer large enough for any encoding of `Self`.
    type Buf: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + fmt::Debug;

    /// Returns `(self / 62, self % 62)`.
    fn div_rem_62(self) -> (Self, u8);

    /// Returns `self * 62 + digit`, or `None` on overflow.
    fn checked_shift_in(self, digit: u8) -> Option<Self>;

    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_base62_int {
    ($($ty:ty => $max_len:literal),*) => {$(
        impl Base62Int for $ty {
            const MAX_LEN: usize = $max_len;
            const ZERO: Self = 0;

            type Buf = [u8; $max_len];

            #[inline]
            fn div_rem_62(self) -> (Self, u8) {
                (self / 62, (self % 62) as u8)
            }

            #[inline]
            fn checked_shift_in(self, digit: u8) -> Option<Self> {
                self.checked_mul(62)?.checked_add(Self::from(digit))
            }
        }
    )*};
}

// Smallest n with 62^n > MAX.
impl_base62_int!(u32 => 6, u64 => 11, u128 => 22);
