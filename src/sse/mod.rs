//! Server-Sent Events endpoint whose only job is to be counted.
//!
//! # Endpoint
//!
//! `GET /sse`
//!
//! The response is `200 OK` with `Content-Type: text/event-stream`. No
//! application events are ever written: the stream is held open until the
//! client goes away or the service shuts down. When `sse.keep_alive_secs`
//! is configured, SSE comment frames are interleaved to keep idle-closing
//! proxies from dropping the connection.
//!
//! Every open stream holds one registration in the
//! [`ConnectionTracker`](crate::connection_tracker::ConnectionTracker),
//! released on whichever exit path ends the stream.

mod handler;

pub use handler::sse_handler;
