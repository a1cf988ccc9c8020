// SPDX-License-Identifier: Apache-2.0

//! mmal-client is a client library for the Meteorological Middleware
//! Application Layer (MMAL), a request/reply service for meteorological
//! observations. Messages are encoded as [CBOR] ([RFC 8949]): compact,
//! self-describing, and friendly to the mixed numeric/text payloads weather
//! data tends to carry.
//!
//! The service answers three kinds of request, all issued through [Client]:
//!
//! - **ping**: liveness/echo
//! - **path**: hierarchical path/metadata lookup
//! - **ts**: time-series data, restricted to a requested set of columns
//!
//! Requests carry a query as a list of filter groups (each a list of terms,
//! interpreted by the service). Replies come back as opaque CBOR payloads;
//! for time-series replies, [parse_reply] converts the payload into one
//! [Table] per series.
//!
//! ```no_run
//! use mmal_client::{parse_reply, Client};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::connect("localhost", 8080)?;
//! let reply = client.ts_request(
//!     vec![vec!["wind".into()]],
//!     vec!["timestamp".into(), "speed".into(), "direction".into()],
//! )?;
//! for table in parse_reply(&reply)? {
//!     println!("{}: {} rows", table.series(), table.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The wire format is versioned; the current version is described in
//! [proto::v0].
//!
//! [RFC 8949]: https://datatracker.ietf.org/doc/html/rfc8949
//! [CBOR]: https://cbor.io/

pub mod error;
pub mod proto;
pub mod table;
pub mod transport;

#[cfg(feature = "serde1")]
pub mod client;

#[cfg(feature = "serde1")]
pub use client::Client;
pub use error::{ClientError, TableError, TransportError};
pub use proto::{Columns, Filters, Method, Reply, Request, RequestID, Value};
pub use table::{parse_reply, Table};
