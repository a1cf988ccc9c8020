// SPDX-License-Identifier: Apache-2.0

//! Transport carriers for MMAL messages.
//!
//! [Transport] wraps any blocking byte channel (a `TcpStream`, a
//! `UnixStream`, a pipe); [BufTransport] wraps an in-memory buffer, which is
//! mostly useful for tests and for staging messages. The wire format itself
//! lives in [proto::v0](crate::proto::v0), which implements the
//! [simple::ClientTransport] and [simple::ServerTransport] traits for both
//! carriers.

pub use bytes::{Buf, BufMut};
pub use std::io::{Read, Write};

pub struct Transport<C: Read + Write> {
    pub channel: C,
}

impl<C> Transport<C>
where
    C: Read + Write,
{
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

pub struct BufTransport<B: Buf + BufMut> {
    pub buffer: B,
}

impl<B> BufTransport<B>
where
    B: Buf + BufMut,
{
    pub fn new(buffer: B) -> Self {
        Self { buffer }
    }
}

pub mod cbor {
    //! Untyped CBOR access to a carrier, below the MMAL message framing.
    //! Useful for inspecting exactly what went over the wire.

    use super::{Buf, BufMut, BufTransport, Read, Transport, Write};
    use crate::error::TransportError;
    use crate::proto::Value;
    use std::error::Error;

    pub trait CborTransport {
        type Error: Error;
        type SendResult;
        fn send_cbor(&mut self, value: Value) -> Result<Self::SendResult, Self::Error>;
        fn read_cbor(&mut self) -> Result<Value, Self::Error>;
    }

    impl<C: Read + Write> CborTransport for Transport<C> {
        type Error = TransportError;
        type SendResult = ();
        fn send_cbor(&mut self, value: Value) -> Result<Self::SendResult, Self::Error> {
            Ok(ciborium::ser::into_writer(&value, &mut self.channel)?)
        }
        fn read_cbor(&mut self) -> Result<Value, Self::Error> {
            Ok(ciborium::de::from_reader(&mut self.channel)?)
        }
    }
    impl<B: Buf + BufMut> CborTransport for BufTransport<B> {
        type Error = TransportError;
        type SendResult = ();
        fn send_cbor(&mut self, value: Value) -> Result<Self::SendResult, Self::Error> {
            Ok(ciborium::ser::into_writer(
                &value,
                (&mut self.buffer).writer(),
            )?)
        }
        fn read_cbor(&mut self) -> Result<Value, Self::Error> {
            Ok(ciborium::de::from_reader((&mut self.buffer).reader())?)
        }
    }
}

pub mod simple {
    use crate::proto::{Reply, Request};
    use std::error::Error;

    pub trait ClientTransport {
        type Error: Error;
        type SendResult;
        fn send_request(&mut self, request: Request) -> Result<Self::SendResult, Self::Error>;
        fn read_reply(&mut self) -> Result<Reply, Self::Error>;
    }

    pub trait ServerTransport {
        type Error: Error;
        type SendResult;
        fn send_reply(&mut self, reply: Reply) -> Result<Self::SendResult, Self::Error>;
        fn read_request(&mut self) -> Result<Request, Self::Error>;
    }
}
