use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use roster_core::memory::MemoryUserStore;
use roster_core::{fake_users, NewUser, StoreResult, User, UserStore};
use roster_server::app::AppState;
use roster_server::bootstrap;
use roster_server::config::MetricsConfig;
use roster_server::runtime::{serve_until, ShutdownOutcome};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Notify};

/// Memory store whose reads stall long enough to be caught mid-request.
struct SlowStore {
    inner: MemoryUserStore,
    delay: Duration,
    entered: Arc<Notify>,
}

impl SlowStore {
    async fn stall(&self) {
        self.entered.notify_one();
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl UserStore for SlowStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        self.inner.ensure_schema().await
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.stall().await;
        self.inner.find_by_name(name).await
    }

    async fn insert_many(&self, users: &[NewUser]) -> StoreResult<u64> {
        self.inner.insert_many(users).await
    }

    async fn count(&self) -> StoreResult<u64> {
        self.stall().await;
        self.inner.count().await
    }
}

struct RunningServer {
    addr: SocketAddr,
    entered: Arc<Notify>,
    stop: oneshot::Sender<()>,
    server: tokio::task::JoinHandle<std::io::Result<ShutdownOutcome>>,
}

async fn start(users: Vec<NewUser>, delay: Duration, drain_timeout: Duration) -> RunningServer {
    let entered = Arc::new(Notify::new());
    let store = Arc::new(SlowStore {
        inner: MemoryUserStore::with_users(users),
        delay,
        entered: entered.clone(),
    });
    let app = bootstrap::build_app(&MetricsConfig::default(), AppState::new(store));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (stop, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve_until(
        listener,
        app,
        async move {
            let _ = stop_rx.await;
        },
        drain_timeout,
    ));
    RunningServer {
        addr,
        entered,
        stop,
        server,
    }
}

async fn send_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn in_flight_count_completes_during_shutdown() {
    let running = start(
        fake_users(3),
        Duration::from_millis(200),
        Duration::from_secs(5),
    )
    .await;

    let client = tokio::spawn(send_get(running.addr, "/user/count"));
    running.entered.notified().await;
    running.stop.send(()).expect("signal shutdown");

    let response = client.await.expect("client task");
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("{count of user: 3}"), "{response}");
    let outcome = running
        .server
        .await
        .expect("server task")
        .expect("serve");
    assert_eq!(outcome, ShutdownOutcome::Drained);
}

#[tokio::test]
async fn in_flight_random_lookup_completes_during_shutdown() {
    let running = start(
        Vec::new(),
        Duration::from_millis(200),
        Duration::from_secs(5),
    )
    .await;

    let client = tokio::spawn(send_get(running.addr, "/user/random"));
    running.entered.notified().await;
    running.stop.send(()).expect("signal shutdown");

    let response = client.await.expect("client task");
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");
    let outcome = running
        .server
        .await
        .expect("server task")
        .expect("serve");
    assert_eq!(outcome, ShutdownOutcome::Drained);
}

#[tokio::test]
async fn stalled_lookup_is_abandoned_at_drain_timeout() {
    let running = start(
        fake_users(3),
        Duration::from_secs(60),
        Duration::from_millis(100),
    )
    .await;

    let client = tokio::spawn(send_get(running.addr, "/user/random"));
    running.entered.notified().await;
    running.stop.send(()).expect("signal shutdown");

    let outcome = tokio::time::timeout(Duration::from_secs(5), running.server)
        .await
        .expect("shutdown bounded by drain timeout")
        .expect("server task")
        .expect("serve");
    assert_eq!(outcome, ShutdownOutcome::TimedOut);
    client.abort();
}
