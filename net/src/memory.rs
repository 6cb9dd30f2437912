use std::io;

use tokio::sync::{
    mpsc,
    Mutex,
};

use crate::{
    DatagramReceiver,
    DatagramSender,
};

type Datagram<A> = (A, Vec<u8>);

/// In-process datagram pipe. Every datagram is tagged with the sender's
/// source address, standing in for a socket's peer address.
pub fn channel<A>(source: A, capacity: usize) -> (ChannelSender<A>, ChannelReceiver<A>) {
    let (tx, rx) = mpsc::channel(capacity);

    (
        ChannelSender {
            source,
            tx,
        },
        ChannelReceiver(Mutex::new(rx)),
    )
}

#[derive(Debug, Clone)]
pub struct ChannelSender<A> {
    source: A,
    tx:     mpsc::Sender<Datagram<A>>,
}

impl<A> ChannelSender<A> {
    /// Another sender into the same pipe, reporting a different source.
    pub fn with_source(&self, source: A) -> Self {
        Self {
            source,
            tx: self.tx.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ChannelReceiver<A>(Mutex<mpsc::Receiver<Datagram<A>>>);

#[async_trait::async_trait]
impl<A> DatagramSender for ChannelSender<A>
where
    A: Clone + Send + Sync + 'static,
{
    async fn send(&self, packet: &[u8]) -> io::Result<usize> {
        self.tx
            .send((self.source.clone(), packet.to_vec()))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::ConnectionAborted, "receiving end of channel closed"))?;

        Ok(packet.len())
    }
}

#[async_trait::async_trait]
impl<A> DatagramReceiver for ChannelReceiver<A>
where
    A: Send + 'static,
{
    type Address = A;

    async fn recv_from(&self, packet: &mut [u8]) -> io::Result<(usize, A)> {
        let (source, datagram) = {
            let mut lck = self.0.lock().await;
            lck.recv().await
        }
        .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionAborted, "remote end of channel closed"))?;

        let len = datagram.len().min(packet.len());
        packet[..len].copy_from_slice(&datagram[..len]);

        Ok((len, source))
    }
}
