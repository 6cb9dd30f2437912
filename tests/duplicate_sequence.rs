use std::time::Instant;

use tokio::net::UdpSocket;

use stationrelay::{
    Config,
    Decision::*,
    Packet,
    Transmitter,
};

use common::Harness;

mod common;

#[tokio::test]
async fn replayed_and_repeated_packets() -> eyre::Result<()> {
    common::trace_init();

    let mut harness = Harness::start(Config::default()).await?;
    let station = Transmitter::new(1, harness.station_socket().await?);
    let d = [1; 4];

    // one packet, the same again, three newer ones, then the first once more
    for n in [1, 1, 2, 3, 4, 1] {
        station.send_numbered(n, d).await?;
    }

    assert_eq!(harness.next_decisions(6).await?, vec![
        Accept,
        RejectDuplicate,
        Accept,
        Accept,
        Accept,
        RejectStale
    ]);

    // a jump ahead followed by the same number six more times
    for _ in 0..7 {
        station.send_numbered(101, d).await?;
    }

    let decisions = harness.next_decisions(7).await?;
    assert_eq!(decisions[0], Accept);
    assert!(decisions[1..].iter().all(|&d| d == RejectDuplicate));

    let receiver = harness.stop().await?;
    let record = receiver.station(1).ok_or_else(|| eyre::eyre!("station 1 unknown"))?;

    assert_eq!(record.stats.accepted, 5);
    assert_eq!(record.stats.duplicates, 7);
    assert_eq!(record.stats.stale, 1);
    assert_eq!(record.history.len(), 20);
    assert_eq!(receiver.validator().last_accepted(1), Some(101));

    Ok(())
}

#[tokio::test]
async fn counter_wraps_without_rejects() -> eyre::Result<()> {
    common::trace_init();

    let mut harness = Harness::start(Config::default()).await?;
    let station = Transmitter::starting_at(7, harness.station_socket().await?, 252);

    let mut sent = vec![];
    for i in 0..6u16 {
        sent.push(station.send([i, 1023, 512, 0]).await?.sequence_number);
    }

    assert_eq!(sent, vec![252, 253, 254, 0, 1, 2]);
    assert_eq!(harness.next_decisions(6).await?, vec![Accept; 6]);

    station.send_numbered(254, [0; 4]).await?;
    assert_eq!(harness.next_decisions(1).await?, vec![RejectStale]);

    let receiver = harness.stop().await?;
    let record = receiver.station(7).ok_or_else(|| eyre::eyre!("station 7 unknown"))?;

    assert_eq!(record.history.len(), 24);
    assert_eq!(record.stats.stale, 1);
    assert!(record.history.last_nonzero().is_some());
    assert!(receiver.has_recent_values(7, record.history.latest().map_or_else(Instant::now, |p| p.at)));

    Ok(())
}

#[tokio::test]
async fn stations_do_not_interfere() -> eyre::Result<()> {
    common::trace_init();

    let mut harness = Harness::start(Config::default()).await?;
    let a = Transmitter::new(1, harness.station_socket().await?);
    let b = Transmitter::new(2, harness.station_socket().await?);

    a.send_numbered(10, [0; 4]).await?;
    b.send_numbered(10, [0; 4]).await?;
    a.send_numbered(10, [0; 4]).await?;
    b.send_numbered(200, [0; 4]).await?;

    let mut outcomes = vec![];
    for _ in 0..4 {
        let report = harness.next_report().await?;
        let (packet, decision) = report.outcome?;
        outcomes.push((packet.station_id, decision));
    }

    assert_eq!(outcomes, vec![(1, Accept), (2, Accept), (1, RejectDuplicate), (2, RejectStale)]);

    let receiver = harness.stop().await?;
    assert_eq!(receiver.stations(), vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn malformed_datagrams_are_reported() -> eyre::Result<()> {
    common::trace_init();

    let mut harness = Harness::start(Config::default()).await?;
    let socket: UdpSocket = harness.station_socket().await?;
    let frame = Packet::new(3, 1, [4, 5, 6, 7]).encode();

    socket.send(&frame[..6]).await?;
    socket.send(&[&frame[..], &[0u8][..]].concat()).await?;
    socket.send(&frame).await?;

    for _ in 0..2 {
        let report = harness.next_report().await?;
        let err = report.outcome.err().ok_or_else(|| eyre::eyre!("expected malformed frame"))?;
        assert!(err.is_malformed());
        assert_eq!(report.source.port(), socket.local_addr()?.port());
    }

    let report = harness.next_report().await?;
    let (packet, decision) = report.outcome?;

    assert_eq!(packet, Packet::new(3, 1, [4, 5, 6, 7]));
    assert_eq!(decision, Accept);

    harness.stop().await?;

    Ok(())
}
