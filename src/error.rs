// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::proto::{ErrorValue, RequestID};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("incorrect message type")]
    UnexpectedMessage,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Proto(#[from] ProtocolError),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error{}: {msg}",
        .pos.map(|p| format!(" at pos {}", p)).unwrap_or("".into())
    )]
    Decode { msg: String, pos: Option<usize> },
}

/// Errors raised by [`Client`](crate::client::Client) operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("reply id {got:?} does not match request id {sent:?}")]
    IdMismatch { sent: RequestID, got: RequestID },
}

/// Errors raised by [`parse_reply`](crate::table::parse_reply).
#[derive(Error, Debug)]
pub enum TableError {
    #[error("service error {}: {}", .0.code(), .0.message())]
    Service(ErrorValue),

    #[error("malformed time-series payload: {0}")]
    Shape(&'static str),
}

impl<E> From<ciborium::ser::Error<E>> for TransportError
where TransportError: From<E>
{
    fn from(err: ciborium::ser::Error<E>) -> Self {
        use ciborium::ser::Error::*;
        match err {
            Io(e) => e.into(),
            Value(s) => TransportError::Encode(s),
        }
    }
}

impl <E> From<ciborium::de::Error<E>> for TransportError
where TransportError: From<E>
{
    fn from(err: ciborium::de::Error<E>) -> Self {
        use ciborium::de::Error::*;
        match err {
            Io(e) => TransportError::from(e),
            Semantic(pos, msg) => TransportError::Decode { msg, pos },
            Syntax(pos) => TransportError::Decode {
                msg: "syntax error".into(), pos: Some(pos)
            },
            RecursionLimitExceeded => TransportError::Decode {
                msg: "recursion limit exceeded".into(), pos: None
            }
        }
    }
}
