mod error;
mod lock;
mod mutex;
mod retry;
mod status;

pub use error::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use retry::*;
pub use status::*;
