//! Builder API with async results
//!
//! `Jwt::builder()` collects algorithm, keys and options, then `sign`/`verify`
//! run the pipeline on a tokio task and hand back an awaitable result.

pub mod builder;
pub mod result;

pub use builder::{Jwt, JwtBuilder};
pub use result::AsyncJwtResult;
