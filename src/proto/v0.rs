// SPDX-License-Identifier: Apache-2.0

//! Version 0 of the MMAL wire format.
//!
//! The v0 message format works like this:
//!
//! 1. Every MMAL message is tagged with a magic number ([TAG_ID_MMALV0]) that
//!    identifies it as an MMAL v0 message.
//!
//! 2. Each message is either a Request or a Reply. Both are represented as
//!    CBOR Maps with Text keys.
//!
//! 3. A Request has the following keys and values:
//!     ```json
//!     {"op": Method, "q": Filters, "cols": Columns, "id": RequestID}
//!     ```
//!     The `cols` and `id` items may be omitted.
//!
//! 4. A Reply is a Map with one of two forms:
//!     ```json
//!     {"ok": Value, "id": RequestID}
//!     ```
//!     ```json
//!     {"err": ErrorValue, "id": RequestID}
//!     ```
//!     The `id` item MUST be present, and MUST contain the same value as the
//!     `id` of the corresponding Request.
//!
//! 5. An ErrorValue is a Map with the form:
//!     ```json
//!     {"code": i64, "message": String, "data": Value}
//!     ```
//!     The `data` item is optional and may be omitted.
//!
//! 6. For a time-series (`"ts"`) request, the `ok` payload is by convention a
//!    Map from series name (Text) to a columns Map, itself Text keys to
//!    Arrays of values. [parse_reply](crate::table::parse_reply) consumes
//!    that shape; everything else in this module treats payloads as opaque.

use ciborium::tag::Required;
use std::convert::{TryFrom, TryInto};

use super::{Columns, ErrorValue, Filters, Method, Reply, Request, RequestID, Value};
use crate::error::{ProtocolError, TransportError};
use crate::transport::simple::{ClientTransport, ServerTransport};
use crate::transport::{Buf, BufMut, Read, Write};
use crate::transport::{BufTransport, Transport};

/// Magic number / tag ID to identify MMAL v0 messages ("MMAL" in ASCII).
pub const TAG_ID_MMALV0: u64 = 0x4D4D_414C;

// Here's our serde-based implementation of the v0 format.
//
// We define a single MmalMsg type, which implements Serialize and
// Deserialize, and then we implement ClientTransport/ServerTransport in
// terms of serializing/deserializing to/from MmalMsg.
mod serde_v0 {
    use super::*;
    use serde::{Deserialize, Serialize};
    // ----- Message format / framing -----------------------------------------

    /// MmalMsg is the toplevel type for this version of the format.
    ///
    /// Every message is tagged with CBOR tag [TAG_ID_MMALV0] so we can
    /// identify it as an MMAL message. It then contains either a Request or
    /// a Reply.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MmalMsg(Required<Msg, TAG_ID_MMALV0>);

    /// The Msg enum encapsulates all well-formatted MMAL message contents.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    enum Msg {
        Request(#[serde(with = "RequestMsg")] crate::proto::Request),
        Reply(#[serde(with = "ReplyMsg")] crate::proto::Reply),
    }

    /// This defines how we serialize/deserialize the Request struct.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(remote = "crate::proto::Request")]
    struct RequestMsg {
        #[serde(rename = "op")]
        method: Method,
        #[serde(rename = "q")]
        filters: Filters,
        #[serde(skip_serializing_if = "Option::is_none")]
        cols: Option<Columns>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "id")]
        req_id: Option<RequestID>,
    }

    /// This defines how we serialize/deserialize the Result inside a Reply.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(remote = "core::result::Result")]
    enum ResultMsg<T, E> {
        #[serde(rename = "ok")]
        Ok(T),
        #[serde(rename = "err")]
        Err(E),
    }

    /// This is how we serialize/deserialize the Reply struct.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(remote = "crate::proto::Reply")]
    struct ReplyMsg {
        #[serde(flatten, with = "ResultMsg")]
        result: Result<Value, ErrorValue>,
        #[serde(rename = "id")]
        req_id: RequestID,
    }

    // ----- Conversions to/from MmalMsg --------------------------------------

    impl From<Request> for MmalMsg {
        fn from(r: Request) -> Self {
            MmalMsg(Required(Msg::Request(r)))
        }
    }

    impl From<Reply> for MmalMsg {
        fn from(r: Reply) -> Self {
            MmalMsg(Required(Msg::Reply(r)))
        }
    }

    impl TryFrom<MmalMsg> for Request {
        type Error = ProtocolError;
        fn try_from(msg: MmalMsg) -> Result<Self, Self::Error> {
            match msg.0 .0 {
                Msg::Request(r) => Ok(r),
                Msg::Reply(_) => Err(ProtocolError::UnexpectedMessage),
            }
        }
    }

    impl TryFrom<MmalMsg> for Reply {
        type Error = ProtocolError;
        fn try_from(msg: MmalMsg) -> Result<Self, Self::Error> {
            match msg.0 .0 {
                Msg::Request(_) => Err(ProtocolError::UnexpectedMessage),
                Msg::Reply(r) => Ok(r),
            }
        }
    }
}

use serde_v0::MmalMsg;

impl MmalMsg {
    fn from_reader(reader: &mut impl Read) -> Result<Self, TransportError> {
        Ok(ciborium::de::from_reader(reader)?)
    }
    fn into_writer(&self, writer: &mut impl Write) -> Result<(), TransportError> {
        Ok(ciborium::ser::into_writer(self, writer)?)
    }
    fn from_buf(buf: &mut impl Buf) -> Result<Self, TransportError> {
        Self::from_reader(&mut buf.reader())
    }
    fn into_buf_mut(&self, buf_mut: &mut impl BufMut) -> Result<(), TransportError> {
        self.into_writer(&mut buf_mut.writer())
    }
}

// Now we implement ClientTransport/ServerTransport so Transport<C> and
// BufTransport<B> can transport MMAL messages.

impl<C: Read + Write> ClientTransport for Transport<C> {
    type Error = TransportError;
    type SendResult = ();
    fn read_reply(&mut self) -> Result<Reply, Self::Error> {
        Ok(MmalMsg::from_reader(&mut self.channel)?.try_into()?)
    }
    fn send_request(&mut self, request: Request) -> Result<Self::SendResult, Self::Error> {
        Ok(MmalMsg::from(request).into_writer(&mut self.channel)?)
    }
}

impl<C: Read + Write> ServerTransport for Transport<C> {
    type Error = TransportError;
    type SendResult = ();
    fn read_request(&mut self) -> Result<Request, Self::Error> {
        Ok(MmalMsg::from_reader(&mut self.channel)?.try_into()?)
    }
    fn send_reply(&mut self, reply: Reply) -> Result<Self::SendResult, Self::Error> {
        Ok(MmalMsg::from(reply).into_writer(&mut self.channel)?)
    }
}

impl<B: Buf + BufMut> ClientTransport for BufTransport<B> {
    type Error = TransportError;
    type SendResult = ();
    fn read_reply(&mut self) -> Result<Reply, Self::Error> {
        Ok(MmalMsg::from_buf(&mut self.buffer)?.try_into()?)
    }
    fn send_request(&mut self, request: Request) -> Result<Self::SendResult, Self::Error> {
        Ok(MmalMsg::from(request).into_buf_mut(&mut self.buffer)?)
    }
}

impl<B: Buf + BufMut> ServerTransport for BufTransport<B> {
    type Error = TransportError;
    type SendResult = ();
    fn read_request(&mut self) -> Result<Request, Self::Error> {
        Ok(MmalMsg::from_buf(&mut self.buffer)?.try_into()?)
    }
    fn send_reply(&mut self, reply: Reply) -> Result<Self::SendResult, Self::Error> {
        Ok(MmalMsg::from(reply).into_buf_mut(&mut self.buffer)?)
    }
}
