// SPDX-License-Identifier: Apache-2.0

/// Defines the MMAL message types and their contents.

#[cfg(feature = "serde1")]
use serde::{Serialize, Deserialize};

#[cfg(feature = "serde1")]
pub mod v0;

// ----- Value ----------------------------------------------------------------

// Our basic dynamic type - an arbitrary CBOR value. Reply payloads are
// carried as one of these; their shape is a service-side contract.
pub use ciborium::value::Value;

// ----- Query arguments ------------------------------------------------------

/// A query is a list of filter groups, each group a list of terms.
/// The terms themselves are passed through to the service uninterpreted;
/// `[[]]` (one empty group) and `[]` are both legal.
pub type Filters = Vec<Vec<String>>;

/// Column names requested for a time-series query.
pub type Columns = Vec<String>;

// ----- Message Types --------------------------------------------------------

/// The three request operations the MMAL service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "lowercase"))]
pub enum Method {
    Ping,
    Path,
    #[cfg_attr(feature = "serde1", serde(rename = "ts"))]
    TimeSeries,
}

impl Method {
    /// Wire name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ping => "ping",
            Method::Path => "path",
            Method::TimeSeries => "ts",
        }
    }
}

/// A Request names an operation ([Method]), carries the query [Filters],
/// an optional column restriction (time-series only), and an optional
/// RequestID. Usually built by [Client](crate::client::Client), which
/// assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    filters: Filters,
    cols: Option<Columns>,
    req_id: Option<RequestID>,
}

/// A Reply has two variants: Ok and Err.
/// An Ok reply contains a service-defined CBOR Value, and an Err contains
/// an [ErrorValue] describing what went wrong on the service side.
/// Both must include the RequestID that was in the Request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    result: Result<Value, ErrorValue>,
    req_id: RequestID,
}

// ----- Data Structures ------------------------------------------------------

/// A RequestID is a value that is used to identify a request so that it can
/// be matched up with its corresponding Reply.
#[derive(Debug, Clone, PartialEq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(untagged))]
pub enum RequestID {
    Number(u64),
    String(String),
    Binary(Vec<u8>),
}

/// An ErrorValue is returned by the service when a Request does not complete
/// successfully.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ErrorValue {
    code: i64,
    message: String,
    #[cfg_attr(feature = "serde1", serde(skip_serializing_if="Option::is_none"))]
    data: Option<Value>,
}

// ----- Useful methods for the above items -----------------------------------

macro_rules! impl_getters {
    ($(
        $type:ty { $($field:ident: $fieldtype:ty),+ $(,)? }
    ),+ $(,)?) => {
        $(
        impl $type {
            $(
            pub fn $field(&self) -> &$fieldtype {
                &self.$field
            }
            )+
        }
        )+
    };
}

impl_getters! {
    ErrorValue { code: i64, message: String, data: Option<Value> },
    Request { method: Method, filters: Filters, cols: Option<Columns>, req_id: Option<RequestID> },
    Reply { result: Result<Value, ErrorValue>, req_id: RequestID }
}

impl Request {
    pub fn new(method: Method, filters: Filters) -> Self {
        Request { method, filters, cols: None, req_id: None }
    }

    /// Restrict a time-series request to the named columns. An empty list
    /// means "no restriction" and is omitted from the wire.
    pub fn with_cols(mut self, cols: Columns) -> Self {
        self.cols = if cols.is_empty() { None } else { Some(cols) };
        self
    }

    pub fn with_id(mut self, id: impl Into<RequestID>) -> Self {
        self.req_id = Some(id.into());
        self
    }
}

impl Reply {
    pub fn ok(value: Value, req_id: impl Into<RequestID>) -> Self {
        Reply { result: Ok(value), req_id: req_id.into() }
    }

    pub fn err(error: ErrorValue, req_id: impl Into<RequestID>) -> Self {
        Reply { result: Err(error), req_id: req_id.into() }
    }

    /// Consume the reply, yielding its payload or the service error.
    pub fn into_result(self) -> Result<Value, ErrorValue> {
        self.result
    }
}

impl ErrorValue {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        ErrorValue { code, message: message.into(), data: None }
    }
}

// ----- Conversion impls for RequestID ---------------------------------------

macro_rules! implfrom {
    ($($enum:ident::$variant:ident <= $fromtype:ty),+ $(,)?) => {
        implfrom! { $( $fromtype => $enum::$variant, )+ }
    };
    ($($fromtype:ty => $enum:ident::$variant:ident),+ $(,)?) => {
        $(
            impl From<$fromtype> for $enum {
                #[inline]
                fn from(value: $fromtype) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

implfrom! {
    u64 => RequestID::Number,
    u32 => RequestID::Number,
    u16 => RequestID::Number,
    u8 => RequestID::Number,

    String => RequestID::String,
    &str => RequestID::String,

    Vec<u8> => RequestID::Binary,
}
