use std::{
    io,
    net::SocketAddr,
};

use tokio::net::UdpSocket;

#[async_trait::async_trait]
pub trait DatagramOps: Sized {
    type Address;

    async fn connect(address: &Self::Address) -> io::Result<Self>;
    async fn bind(address: &Self::Address) -> io::Result<Self>;
    fn display_addr(addr: &Self::Address) -> String;
}

#[async_trait::async_trait]
pub trait DatagramReceiver {
    type Address: Send;

    /// Receive one datagram into `packet`. Datagrams longer than the buffer
    /// are truncated to its length.
    async fn recv_from(&self, packet: &mut [u8]) -> io::Result<(usize, Self::Address)>;
}

#[async_trait::async_trait]
pub trait DatagramSender {
    async fn send(&self, packet: &[u8]) -> io::Result<usize>;
}

#[async_trait::async_trait]
impl DatagramOps for UdpSocket {
    type Address = SocketAddr;

    #[tracing::instrument(err, fields(address = Self::display_addr(address).as_str()))]
    #[inline]
    async fn connect(address: &SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if address.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };

        let sock = UdpSocket::bind(local).await?;
        sock.connect(address).await?;

        Ok(sock)
    }

    #[tracing::instrument(err, fields(address = Self::display_addr(address).as_str()))]
    #[inline]
    async fn bind(address: &Self::Address) -> io::Result<Self> {
        UdpSocket::bind(address).await
    }

    #[inline]
    fn display_addr(addr: &SocketAddr) -> String {
        addr.to_string()
    }
}

#[async_trait::async_trait]
impl DatagramSender for UdpSocket {
    #[tracing::instrument(level = "trace", err, fields(packet.len = packet.len(), self.addr = ?self.local_addr().ok()), skip(packet, self))]
    #[inline]
    async fn send(&self, packet: &[u8]) -> io::Result<usize> {
        UdpSocket::send(self, packet).await
    }
}

#[async_trait::async_trait]
impl DatagramReceiver for UdpSocket {
    type Address = SocketAddr;

    #[tracing::instrument(level = "trace", err, fields(buf.len = buf.len(), self.addr = ?self.local_addr().ok()), skip(self, buf))]
    #[inline]
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn udp_loopback() -> eyre::Result<()> {
        let server = <UdpSocket as DatagramOps>::bind(&"127.0.0.1:0".parse()?).await?;
        let client = <UdpSocket as DatagramOps>::connect(&server.local_addr()?).await?;

        let sent = DatagramSender::send(&client, &[1, 2, 3]).await?;
        assert_eq!(sent, 3);

        let mut buf = [0u8; 16];
        let (len, source) = DatagramReceiver::recv_from(&server, &mut buf).await?;

        assert_eq!(&buf[..len], &[1, 2, 3]);
        assert_eq!(source.port(), client.local_addr()?.port());

        Ok(())
    }
}
