// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the TCP transport against an in-process fake miner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use avalon_mini::command::{DisplayCommand, StatusCommand, WorkModeCommand};
use avalon_mini::protocol::{Protocol, TcpConfig};
use avalon_mini::state::ManualClock;
use avalon_mini::subscription::Subscribable;
use avalon_mini::types::{PowerState, WorkLevel, WorkMode};
use avalon_mini::{Device, Error, ProtocolError, StateChange, TcpClient};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SUMMARY: &str = "STATUS=S,When=1700000000,Code=11,Msg=Summary,Description=cgminer 4.11.1|SUMMARY,Elapsed=558,MHS av=32581844.99,MHS 5s=36807196.51,MHS 1m=35216325.26|\0";
const ESTATS_IDLE: &str = "STATUS=S,When=1700000000,Code=70,Msg=CGMiner stats|STATS=0,ID=AVA100,Elapsed=558,MM ID0=Ver[Mini3-UD-25011601_7ba4e5c] WORKMODE[0] WORKLEVEL[-1] SoftOFF[1] LcdOnoff[1] TA[21] TarT[80] PS[0 1215 2034 37 0 2032 808] SYSTEMSTATU[Work: In Idle, Hash Board: 1]|\0";
const ESTATS_WORKING: &str = "STATUS=S,When=1700000000,Code=70,Msg=CGMiner stats|STATS=0,ID=AVA100,Elapsed=558,MM ID0=Ver[Mini3-UD-25011601_7ba4e5c] WORKMODE[1] WORKLEVEL[0] SoftOFF[0] LcdOnoff[0] TA[24] TarT[90] PS[0 1215 2034 37 756 2032 808] SYSTEMSTATU[Work: In Work, Hash Board: 1]|\0";

// ============================================================================
// Fake miner
// ============================================================================

/// How the fake miner answers one connection.
#[derive(Clone)]
enum Reply {
    /// Write the bytes in one go, then close.
    Body(Vec<u8>),
    /// Write each chunk with a short pause in between, then close.
    Chunks(Vec<Vec<u8>>),
    /// Keep the connection open without answering.
    Silent,
}

impl Reply {
    fn text(body: &str) -> Self {
        Self::Body(body.as_bytes().to_vec())
    }
}

/// A listener that answers each connection with the next scripted reply
/// and records every request it received.
struct FakeMiner {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeMiner {
    async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();

        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = listener.accept().await.unwrap();

                // The request ends when the client half-closes.
                let mut request = Vec::new();
                socket.read_to_end(&mut request).await.unwrap();
                log.lock().push(String::from_utf8(request).unwrap());

                match reply {
                    Reply::Body(bytes) => {
                        socket.write_all(&bytes).await.unwrap();
                    }
                    Reply::Chunks(chunks) => {
                        for chunk in chunks {
                            socket.write_all(&chunk).await.unwrap();
                            socket.flush().await.unwrap();
                            tokio::time::sleep(Duration::from_millis(20)).await;
                        }
                    }
                    Reply::Silent => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                }
            }
        });

        Self { addr, requests }
    }

    fn config(&self) -> TcpConfig {
        TcpConfig::new(self.addr.ip().to_string()).with_port(self.addr.port())
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

fn device_with_clock(miner: &FakeMiner) -> (Device<TcpClient>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let device = Device::tcp_config(miner.config())
        .with_name("Fake miner")
        .with_clock(clock.clone())
        .build()
        .unwrap();
    (device, clock)
}

// ============================================================================
// TcpClient
// ============================================================================

mod tcp_client {
    use super::*;

    #[tokio::test]
    async fn request_is_framed_by_half_close() {
        let miner = FakeMiner::start(vec![Reply::text(SUMMARY)]).await;
        let client = miner.config().into_client().unwrap();

        let response = client.send_command(&StatusCommand::Summary).await.unwrap();

        assert_eq!(miner.requests(), vec!["summary"]);
        assert!(response.body().contains("MHS 5s=36807196.51"));
    }

    #[tokio::test]
    async fn ascset_command_on_the_wire() {
        let miner = FakeMiner::start(vec![Reply::text("STATUS=S"), Reply::text("STATUS=S")]).await;
        let client = miner.config().into_client().unwrap();

        client
            .send_command(&WorkModeCommand::new(WorkMode::Night))
            .await
            .unwrap();
        client
            .send_command(&DisplayCommand::new(PowerState::Off))
            .await
            .unwrap();

        assert_eq!(
            miner.requests(),
            vec!["ascset|0,workmode,set,2", "ascset|0,display,set,0"]
        );
    }

    #[tokio::test]
    async fn multi_chunk_response_is_joined() {
        let chunks = ESTATS_WORKING
            .as_bytes()
            .chunks(40)
            .map(<[u8]>::to_vec)
            .collect();
        let miner = FakeMiner::start(vec![Reply::Chunks(chunks)]).await;
        let client = miner.config().into_client().unwrap();

        let response = client.send_raw("estats").await.unwrap();

        assert_eq!(response.body(), ESTATS_WORKING);
    }

    #[tokio::test]
    async fn non_ascii_bytes_are_dropped() {
        let mut body = b"STATUS=S|TA[2".to_vec();
        body.extend_from_slice(&[0xC2, 0xB0, 0xFF]);
        body.extend_from_slice(b"4]");
        let miner = FakeMiner::start(vec![Reply::Body(body)]).await;
        let client = miner.config().into_client().unwrap();

        let response = client.send_raw("estats").await.unwrap();

        assert_eq!(response.body(), "STATUS=S|TA[24]");
    }

    #[tokio::test]
    async fn empty_reply_is_not_an_error() {
        let miner = FakeMiner::start(vec![Reply::Body(Vec::new())]).await;
        let client = miner.config().into_client().unwrap();

        let response = client.send_raw("summary").await.unwrap();

        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = TcpConfig::new("127.0.0.1")
            .with_port(port)
            .into_client()
            .unwrap();
        let err = client.send_raw("summary").await.unwrap_err();

        assert!(matches!(err, ProtocolError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn silent_miner_times_out() {
        let miner = FakeMiner::start(vec![Reply::Silent]).await;
        let client = miner
            .config()
            .with_timeout(Duration::from_millis(200))
            .into_client()
            .unwrap();

        let err = client.send_raw("estats").await.unwrap_err();

        assert!(matches!(err, ProtocolError::Timeout(200)));
    }
}

// ============================================================================
// Device
// ============================================================================

mod device {
    use super::*;

    #[tokio::test]
    async fn poll_reads_summary_and_estats() {
        let miner =
            FakeMiner::start(vec![Reply::text(SUMMARY), Reply::text(ESTATS_WORKING)]).await;
        let (device, _) = device_with_clock(&miner);

        let changes = device.poll().await.unwrap();

        assert_eq!(miner.requests(), vec!["summary", "estats"]);
        assert!(changes.contains(&StateChange::Hashrate(36_807_196.51)));
        let state = device.state();
        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.display(), PowerState::Off);
        assert_eq!(state.work_mode(), WorkMode::Mining);
        assert_eq!(state.work_level(), WorkLevel::Super);
        assert_eq!(state.ambient_temperature(), Some(24.0));
        assert_eq!(state.target_temperature(), Some(90.0));
        assert_eq!(state.power_draw(), Some(756.0));
    }

    #[tokio::test]
    async fn power_command_survives_stale_poll() {
        let miner = FakeMiner::start(vec![
            Reply::text("STATUS=S,Code=118,Msg=ASC 0 set OK|\0"),
            Reply::text(SUMMARY),
            Reply::text(ESTATS_IDLE),
            Reply::text(SUMMARY),
            Reply::text(ESTATS_IDLE),
        ])
        .await;
        let (device, clock) = device_with_clock(&miner);
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        device.on_power_changed(move |state| events_clone.lock().push(state));

        device.power_on().await.unwrap();
        assert_eq!(miner.requests()[0], "ascset|0,softon,1:1700000000");

        clock.advance(Duration::from_secs(3));
        device.poll().await.unwrap();
        assert_eq!(device.state().power(), PowerState::On);

        clock.advance(Duration::from_secs(6));
        device.poll().await.unwrap();
        assert_eq!(device.state().power(), PowerState::Off);

        assert_eq!(*events.lock(), vec![PowerState::On, PowerState::Off]);
    }

    #[tokio::test]
    async fn power_off_uses_soft_off() {
        let miner = FakeMiner::start(vec![Reply::text("STATUS=S")]).await;
        let (device, clock) = device_with_clock(&miner);
        clock.advance(Duration::from_secs(10));

        device.power_off().await.unwrap();

        assert_eq!(miner.requests(), vec!["ascset|0,softoff,1:1700000010"]);
    }

    #[tokio::test]
    async fn failed_poll_keeps_state() {
        // Summary answers, estats never does.
        let miner = FakeMiner::start(vec![Reply::text(SUMMARY), Reply::Silent]).await;
        let device = Device::tcp_config(miner.config().with_timeout(Duration::from_millis(200)))
            .build()
            .unwrap();

        let err = device.poll().await.unwrap_err();

        assert!(matches!(err, Error::Protocol(ProtocolError::Timeout(_))));
        assert_eq!(device.state().hashrate_mhs(), None);
    }

    #[tokio::test]
    async fn failed_command_is_not_applied() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let device = Device::tcp("127.0.0.1").with_port(port).build().unwrap();

        assert!(device.set_work_mode(WorkMode::Night).await.is_err());
        assert_eq!(device.state().work_mode(), WorkMode::Heating);
    }
}
