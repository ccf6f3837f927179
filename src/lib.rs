//! A mock HTTP server driven by a directory of JSON endpoint files.
//!
//! Each `<name>.json` file in the endpoints directory becomes the path
//! `/<name>` and lists the method it answers plus an ordered set of candidate
//! responses. Per request, [`stub::resolver::resolve`] picks one candidate:
//! a forced status from the `x-stub-status` header first, then the first
//! candidate for `GET` or body-less requests, then the first candidate whose
//! `input_body` matches the request body, and finally the last candidate.
//!
//! ```json
//! {
//!   "method": "POST",
//!   "responses": [
//!     {"status": 201, "body": {"message": "Success"}, "input_body": {"name": "A"}},
//!     {"status": 400, "body": {"error": "Invalid"}}
//!   ]
//! }
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod stub;
