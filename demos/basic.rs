// SPDX-License-Identifier: Apache-2.0

//! The canonical MMAL client flow: ping the service, look up a path, pull a
//! time-series, and tabulate the result. Expects an MMAL service listening
//! on localhost:8080.

use mmal_client::{parse_reply, Client};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = Client::connect("localhost", 8080)?;

    // ping request example
    let pong_reply = client.ping_request(vec![vec![]])?;
    println!("{:?}", pong_reply);

    // path request example
    let path_reply = client.path_request(vec![vec!["example".into()]])?;
    println!("{:?}", path_reply);

    // time series request example
    let ts_reply = client.ts_request(
        vec![vec!["wind".into()]],
        vec!["timestamp".into(), "speed".into(), "direction".into()],
    )?;
    println!("{:?}", ts_reply);

    for table in parse_reply(&ts_reply)? {
        println!("{:?}", table);
    }

    Ok(())
}
