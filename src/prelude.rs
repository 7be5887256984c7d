//! Convenient re-exports for common usage.
//!
//! ## Usage
//!
//! ```rust
//! use errstack::prelude::*;
//!
//! fn inner() -> Result<(), Error> {
//!     Err(errstack::not_found("config"))
//! }
//!
//! fn outer() -> Result<(), Error> {
//!     inner().annotate("starting")?;
//!     Ok(())
//! }
//!
//! let err = outer().unwrap_err();
//! assert!(errstack::is_not_found(&err));
//! ```

pub use crate::Error;
pub use crate::IntoError;
pub use crate::Kind;
pub use crate::ResultExt;
pub use crate::{annotatef, errorf, maskf, wrapf};
