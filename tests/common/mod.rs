#![allow(dead_code)]

use std::{
    net::SocketAddr,
    str::FromStr,
    sync::Arc,
};

use tokio::{
    net::UdpSocket,
    sync::mpsc,
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{
    fmt::format::FmtSpan,
    EnvFilter,
};

use stationrelay::{
    net::DatagramOps,
    serve,
    Config,
    Decision,
    Receiver,
    Report,
};

pub fn trace_init() {
    let level_filter = EnvFilter::from_str("debug").unwrap();

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(level_filter)
        .pretty()
        .try_init();
}

/// A receiver serving a loopback UDP socket on a background task.
pub struct Harness {
    pub address:  SocketAddr,
    pub receiver: Arc<Receiver>,
    pub reports:  mpsc::Receiver<Report<SocketAddr>>,
    pub shutdown: CancellationToken,
    pub task:     JoinHandle<std::io::Result<()>>,
}

impl Harness {
    pub async fn start(config: Config) -> eyre::Result<Self> {
        let socket = <UdpSocket as DatagramOps>::bind(&"127.0.0.1:0".parse()?).await?;
        let address = socket.local_addr()?;

        let receiver = Arc::new(Receiver::new(config));
        let (report_tx, reports) = mpsc::channel(64);
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(serve(receiver.clone(), socket, report_tx, shutdown.clone()));

        Ok(Self {
            address,
            receiver,
            reports,
            shutdown,
            task,
        })
    }

    pub async fn station_socket(&self) -> eyre::Result<UdpSocket> {
        Ok(<UdpSocket as DatagramOps>::connect(&self.address).await?)
    }

    pub async fn next_report(&mut self) -> eyre::Result<Report<SocketAddr>> {
        let report = tokio::time::timeout(std::time::Duration::from_secs(5), self.reports.recv())
            .await?
            .ok_or_else(|| eyre::eyre!("report channel closed"))?;

        Ok(report)
    }

    pub async fn next_decisions(&mut self, count: usize) -> eyre::Result<Vec<Decision>> {
        let mut result = Vec::with_capacity(count);

        for _ in 0..count {
            let report = self.next_report().await?;
            let (_, decision) = report.outcome?;
            result.push(decision);
        }

        Ok(result)
    }

    pub async fn stop(self) -> eyre::Result<Arc<Receiver>> {
        self.shutdown.cancel();
        self.task.await??;

        Ok(self.receiver)
    }
}
