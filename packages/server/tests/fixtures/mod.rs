//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use std::{
    net::TcpStream,
    thread,
    time::{Duration, Instant},
};

use roomcast_server::domain::RoomSet;

/// A server running on its own thread and runtime for the whole test binary.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start a server on `port` with `lobby` as the default room and wait
    /// until it accepts connections.
    pub fn start(port: u16) -> Self {
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to build test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                    .await
                    .expect("Failed to bind test port");
                let rooms = RoomSet::parse_list("lobby").expect("Invalid default room");
                roomcast_server::serve(listener, rooms)
                    .await
                    .expect("Test server failed");
            });
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while TcpStream::connect(("127.0.0.1", port)).is_err() {
            assert!(Instant::now() < deadline, "Test server did not start");
            thread::sleep(Duration::from_millis(20));
        }

        Self { port }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?{}", self.port, query)
    }
}
