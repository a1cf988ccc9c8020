// SPDX-License-Identifier: Apache-2.0

//! The MMAL client.
//!
//! A [Client] is built from a host and port ([Client::connect]) or from any
//! [ClientTransport] ([Client::over]). It offers the three MMAL request
//! operations, each of which is a single blocking write-then-read exchange:
//!
//! - [ping_request](Client::ping_request): liveness/echo query
//! - [path_request](Client::path_request): hierarchical path/metadata lookup
//! - [ts_request](Client::ts_request): time-series query, restricted to the
//!   named columns
//!
//! The client owns nothing but the transport and a request id counter; there
//! are no retries, timeouts, or reconnects here.

use std::net::TcpStream;

use log::{debug, trace};

use crate::error::ClientError;
use crate::proto::{Columns, Filters, Method, Reply, Request, RequestID};
use crate::transport::simple::ClientTransport;
use crate::transport::Transport;

pub struct Client<T: ClientTransport> {
    transport: T,
    next_id: u64,
}

impl Client<Transport<TcpStream>> {
    /// Connect to an MMAL service over TCP.
    pub fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((host, port)).map_err(ClientError::Connect)?;
        debug!("connected to {}:{}", host, port);
        Ok(Self::over(Transport::new(stream)))
    }
}

impl<T> Client<T>
where
    T: ClientTransport,
    ClientError: From<T::Error>,
{
    /// Build a client on top of an already-established transport.
    pub fn over(transport: T) -> Self {
        Client { transport, next_id: 0 }
    }

    /// Liveness/echo query. The filters are passed through to the service
    /// uninterpreted; `[[]]` is the conventional "just pong me" form.
    pub fn ping_request(&mut self, filters: Filters) -> Result<Reply, ClientError> {
        self.roundtrip(Method::Ping, filters, None)
    }

    /// Look up hierarchical path/metadata entries matching the filters.
    pub fn path_request(&mut self, filters: Filters) -> Result<Reply, ClientError> {
        self.roundtrip(Method::Path, filters, None)
    }

    /// Query time-series data matching the filters, restricted to the named
    /// columns. An empty `cols` list leaves the column set up to the service.
    pub fn ts_request(&mut self, filters: Filters, cols: Columns) -> Result<Reply, ClientError> {
        self.roundtrip(Method::TimeSeries, filters, Some(cols))
    }

    // One request, one reply, in order. The reply must echo our request id.
    fn roundtrip(
        &mut self,
        method: Method,
        filters: Filters,
        cols: Option<Columns>,
    ) -> Result<Reply, ClientError> {
        let id = self.next_id;
        self.next_id += 1;

        let mut request = Request::new(method, filters).with_id(id);
        if let Some(cols) = cols {
            request = request.with_cols(cols);
        }
        trace!("sending {} request id={}", method.as_str(), id);
        self.transport.send_request(request)?;

        let reply = self.transport.read_reply()?;
        trace!("got reply for id={:?}", reply.req_id());
        let sent = RequestID::from(id);
        if *reply.req_id() != sent {
            return Err(ClientError::IdMismatch {
                sent,
                got: reply.req_id().clone(),
            });
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::Client;
    use crate::error::{ClientError, TransportError};
    use crate::proto::{Reply, Request, Value};
    use crate::transport::simple::{ClientTransport, ServerTransport};
    use crate::transport::BufTransport;
    use bytes::BytesMut;
    use std::collections::VecDeque;

    // A transport whose replies are scripted up front. Records what the
    // client sent so tests can assert on it.
    struct Scripted {
        sent: Vec<Request>,
        replies: VecDeque<Reply>,
    }

    impl Scripted {
        fn new(replies: Vec<Reply>) -> Self {
            Scripted { sent: Vec::new(), replies: replies.into() }
        }
    }

    impl ClientTransport for Scripted {
        type Error = TransportError;
        type SendResult = ();
        fn send_request(&mut self, request: Request) -> Result<(), Self::Error> {
            self.sent.push(request);
            Ok(())
        }
        fn read_reply(&mut self) -> Result<Reply, Self::Error> {
            self.replies
                .pop_front()
                .ok_or_else(|| TransportError::Decode { msg: "script exhausted".into(), pos: None })
        }
    }

    // builds a real Array column; a bare Vec<u8> would encode as Bytes
    fn column(values: Vec<i64>) -> Value {
        Value::Array(values.into_iter().map(Value::from).collect())
    }

    fn wind_payload() -> Value {
        let columns = vec![
            (Value::Text("timestamp".into()), column(vec![1, 2, 3])),
            (Value::Text("speed".into()), column(vec![7, 9, 12])),
            (Value::Text("direction".into()), column(vec![180, 190, 185])),
        ];
        Value::Map(vec![(
            Value::Text("wind".into()),
            Value::Map(columns),
        )])
    }

    #[test]
    fn sequential_requests() {
        let script = vec![
            Reply::ok(Value::Text("pong".into()), 0u32),
            Reply::ok(Value::from(vec![Value::Text("example/site".into())]), 1u32),
            Reply::ok(wind_payload(), 2u32),
        ];
        let mut client = Client::over(Scripted::new(script));

        let pong = client.ping_request(vec![vec![]]).unwrap();
        assert_eq!(pong.into_result().unwrap(), Value::Text("pong".into()));

        let paths = client.path_request(vec![vec!["example".into()]]).unwrap();
        assert!(paths.result().is_ok());

        let ts = client
            .ts_request(
                vec![vec!["wind".into()]],
                vec!["timestamp".into(), "speed".into(), "direction".into()],
            )
            .unwrap();

        // the ts reply tabulates: one wind table with the requested columns
        let tables = crate::table::parse_reply(&ts).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].series(), "wind");
        assert_eq!(
            tables[0].column_names().collect::<Vec<_>>(),
            vec!["timestamp", "speed", "direction"]
        );
        assert_eq!(ts.into_result().unwrap(), wind_payload());

        // ids were assigned in order, cols only went out on the ts request
        let transport = client.transport;
        assert_eq!(transport.sent.len(), 3);
        assert_eq!(*transport.sent[0].req_id(), Some(0u64.into()));
        assert_eq!(*transport.sent[1].req_id(), Some(1u64.into()));
        assert_eq!(*transport.sent[2].req_id(), Some(2u64.into()));
        assert!(transport.sent[0].cols().is_none());
        assert!(transport.sent[1].cols().is_none());
        assert_eq!(
            transport.sent[2].cols().as_deref(),
            Some(&["timestamp".to_string(), "speed".into(), "direction".into()][..])
        );
    }

    #[test]
    fn mismatched_reply_id() {
        // pre-stage a reply with the wrong id; the buffered carrier hands it
        // back before the client's own request bytes
        let mut tr = BufTransport::new(BytesMut::with_capacity(4096));
        tr.send_reply(Reply::ok(Value::Null, 999u32)).unwrap();
        let mut client = Client::over(tr);
        match client.ping_request(vec![vec![]]) {
            Err(ClientError::IdMismatch { .. }) => (),
            other => panic!("expected IdMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[cfg(unix)]
    #[test]
    fn socket_roundtrip() {
        use crate::transport::Transport;
        use std::os::unix::net::UnixStream;
        use std::thread;

        let (c, s) = UnixStream::pair().unwrap();
        // fake service: answer a ping and a ts query, echoing request ids
        let service = thread::spawn(move || {
            let mut tr = Transport::new(s);
            for _ in 0..2 {
                let request = tr.read_request().unwrap();
                let id = request.req_id().clone().unwrap();
                let payload = match request.method().as_str() {
                    "ping" => Value::Text("pong".into()),
                    _ => wind_payload(),
                };
                tr.send_reply(Reply::ok(payload, id)).unwrap();
            }
        });

        let mut client = Client::over(Transport::new(c));
        let pong = client.ping_request(vec![vec![]]).unwrap();
        assert_eq!(pong.into_result().unwrap(), Value::Text("pong".into()));

        let ts = client
            .ts_request(
                vec![vec!["wind".into()]],
                vec!["timestamp".into(), "speed".into(), "direction".into()],
            )
            .unwrap();
        let tables = crate::table::parse_reply(&ts).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].series(), "wind");
        assert_eq!(
            tables[0].column_names().collect::<Vec<_>>(),
            vec!["timestamp", "speed", "direction"]
        );

        service.join().unwrap();
    }
}
