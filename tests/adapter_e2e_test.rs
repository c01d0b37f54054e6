use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use tetris_harness::adapter::server::{run_server, ServerConfig};

struct TestServer {
    addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn start_server() -> TestServer {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };

    let (ready_tx, ready_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(run_server(config, Some(ready_tx), shutdown_rx));

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    TestServer {
        addr,
        shutdown_tx,
        handle,
    }
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write_half: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, write_half) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            write_half,
        }
    }

    async fn send(&mut self, line: &str) {
        self.write_half.write_all(line.as_bytes()).await.unwrap();
        self.write_half.write_all(b"\n").await.unwrap();
        self.write_half.flush().await.unwrap();
    }

    async fn recv(&mut self) -> serde_json::Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }
}

#[tokio::test]
async fn adapter_observe_command_ack_and_observation() {
    let server = start_server().await;
    let mut client = Client::connect(server.addr).await;

    client.send(r#"{"type":"observe","seq":1}"#).await;
    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 1);
    assert_eq!(obs["width"], 10);
    assert_eq!(obs["height"], 20);
    assert_eq!(obs["cells"].as_array().unwrap().len(), 20);
    assert_eq!(obs["active"]["y"], 0);
    assert_eq!(obs["active"]["cells"].as_array().unwrap().len(), 4);
    assert_eq!(obs["topped_out"], false);

    client
        .send(r#"{"type":"command","seq":2,"actions":["left","up","space"]}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["locks"], 1);
    assert_eq!(ack["topped_out"], false);

    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 2);
    assert_eq!(obs["pieces_locked"], 1);
    let filled: usize = obs["cells"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|c| c.as_u64() != Some(0))
        .count();
    assert_eq!(filled, 4);

    server.handle.abort();
}

#[tokio::test]
async fn adapter_auto_hard_drop_locks_without_explicit_drop() {
    let server = start_server().await;
    let mut client = Client::connect(server.addr).await;

    client
        .send(r#"{"type":"command","seq":1,"actions":["right"],"auto_hard_drop":true}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["locks"], 1);
    let _obs = client.recv().await;

    server.handle.abort();
}

#[tokio::test]
async fn adapter_rejects_stale_seq_and_bad_messages() {
    let server = start_server().await;
    let mut client = Client::connect(server.addr).await;

    client.send(r#"{"type":"observe","seq":5}"#).await;
    let _ = client.recv().await;

    client.send(r#"{"type":"observe","seq":5}"#).await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 5);
    assert_eq!(err["code"], "invalid_seq");

    client
        .send(r#"{"type":"command","seq":6,"actions":["hold"]}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_message");
    assert_eq!(err["seq"], 6);

    client.send("not json at all").await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_message");
    assert_eq!(err["seq"], 0);

    // Bad messages never touch the session.
    client.send(r#"{"type":"observe","seq":7}"#).await;
    let obs = client.recv().await;
    assert_eq!(obs["pieces_locked"], 0);

    server.handle.abort();
}

#[tokio::test]
async fn adapter_topped_out_until_reset() {
    let server = start_server().await;
    let mut client = Client::connect(server.addr).await;

    let drops = vec!["\"hard_drop\""; 32].join(",");
    let mut seq = 0u64;
    loop {
        seq += 1;
        client
            .send(&format!(
                r#"{{"type":"command","seq":{seq},"actions":[{drops}]}}"#
            ))
            .await;
        let ack = client.recv().await;
        assert_eq!(ack["type"], "ack");
        let obs = client.recv().await;
        if ack["topped_out"] == true {
            assert_eq!(obs["topped_out"], true);
            assert!(obs.get("active").is_none());
            break;
        }
        assert!(seq < 10, "never topped out");
    }

    seq += 1;
    client
        .send(&format!(
            r#"{{"type":"command","seq":{seq},"actions":["left"]}}"#
        ))
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "topped_out");

    seq += 1;
    client
        .send(&format!(
            r#"{{"type":"reset","seq":{seq},"seed":11,"randomizer":"bag","width":12,"height":22}}"#
        ))
        .await;
    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["topped_out"], false);
    assert_eq!(obs["width"], 12);
    assert_eq!(obs["cells"].as_array().unwrap().len(), 22);
    assert_eq!(obs["pieces_locked"], 0);

    server.handle.abort();
}

#[tokio::test]
async fn adapter_connections_are_independent() {
    let server = start_server().await;
    let mut a = Client::connect(server.addr).await;
    let mut b = Client::connect(server.addr).await;

    a.send(r#"{"type":"command","seq":1,"actions":["hard_drop"]}"#)
        .await;
    let _ack = a.recv().await;
    let _obs = a.recv().await;

    // Same seq on another connection is fine, and its board is still empty.
    b.send(r#"{"type":"observe","seq":1}"#).await;
    let obs = b.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["pieces_locked"], 0);

    server.handle.abort();
}

#[tokio::test]
async fn adapter_stops_on_shutdown_signal() {
    let server = start_server().await;
    server.shutdown_tx.send(true).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), server.handle)
        .await
        .expect("server did not stop")
        .expect("server task panicked");
    assert!(result.is_ok());
}
