//! Wake-on-LAN magic packet sender.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::info;

use super::WakeSender;
use crate::error::{CoreError, DeviceError};
use crate::types::MacAddress;

/// Default wake target: limited broadcast, discard port.
pub const DEFAULT_WAKE_TARGET: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::BROADCAST, 9);

/// Six 0xFF bytes followed by the address repeated sixteen times.
pub fn magic_packet(mac: MacAddress) -> [u8; 102] {
    let mut packet = [0xFFu8; 102];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac.octets());
    }
    packet
}

/// Create a UDP socket allowed to send to broadcast addresses.
fn create_broadcast_socket() -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_broadcast(true)?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Broadcasts magic packets on the local network.
#[derive(Debug, Clone)]
pub struct WolSender {
    target: SocketAddr,
}

impl WolSender {
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }
}

impl Default for WolSender {
    fn default() -> Self {
        Self::new(SocketAddr::V4(DEFAULT_WAKE_TARGET))
    }
}

impl WakeSender for WolSender {
    async fn broadcast_wake(&self, mac: MacAddress) -> Result<(), CoreError> {
        let wake_error = |e: std::io::Error| {
            CoreError::from(DeviceError::Wake {
                mac: mac.to_string(),
                message: e.to_string(),
            })
        };

        let socket = create_broadcast_socket()
            .and_then(UdpSocket::from_std)
            .map_err(wake_error)?;

        socket
            .send_to(&magic_packet(mac), self.target)
            .await
            .map_err(wake_error)?;

        info!(%mac, target = %self.target, "wake packet sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_packet_layout() {
        let mac: MacAddress = "01:23:45:67:89:AB".parse().unwrap();
        let packet = magic_packet(mac);

        assert_eq!(&packet[..6], &[0xFF; 6]);
        for i in 0..16 {
            let start = 6 + i * 6;
            assert_eq!(&packet[start..start + 6], &[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
        }
    }

    #[tokio::test]
    async fn test_broadcast_wake_reaches_target() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let sender = WolSender::new(receiver.local_addr().unwrap());
        let mac: MacAddress = "70:2A:D5:01:B2:FF".parse().unwrap();

        sender.broadcast_wake(mac).await.unwrap();

        let mut buf = [0u8; 256];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &magic_packet(mac)[..]);
    }
}
