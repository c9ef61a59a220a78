mod codec;
mod error;
mod ext;
mod int;

pub use codec::*;
pub use error::*;
pub use ext::*;
pub use int::*;
