use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::error::TimeQueryError;
use crate::time_source::QueryTime;

pub const DEFAULT_SERVER: &str = "pool.ntp.org:123";
pub const QUERY_TIMEOUT: Duration = Duration::from_millis(1000);

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970).
pub const NTP_EPOCH_OFFSET: i64 = 2_208_988_800;

pub const PACKET_LEN: usize = 48;

// LI = 0 (no warning), VN = 3, Mode = 3 (client)
const CLIENT_REQUEST_SETTINGS: u8 = 0x1b;

/// NTP timestamp: seconds since 1900 plus a 32-bit binary fraction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NtpTimestamp {
    pub seconds: u32,
    pub fraction: u32,
}

impl NtpTimestamp {
    fn read(bytes: &[u8]) -> Self {
        Self {
            seconds: read_u32(&bytes[0..4]),
            fraction: read_u32(&bytes[4..8]),
        }
    }

    fn write(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.seconds.to_be_bytes());
        out[4..8].copy_from_slice(&self.fraction.to_be_bytes());
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }

    pub fn unix_seconds(&self) -> i64 {
        i64::from(self.seconds) - NTP_EPOCH_OFFSET
    }

    /// The fraction scaled to nanoseconds through a 64-bit intermediate.
    pub fn nanoseconds(&self) -> u32 {
        ((u64::from(self.fraction) * 1_000_000_000) >> 32) as u32
    }

    pub fn to_system_time(&self) -> SystemTime {
        let seconds = self.unix_seconds();
        let nanos = Duration::from_nanos(u64::from(self.nanoseconds()));

        if seconds >= 0 {
            UNIX_EPOCH + Duration::from_secs(seconds.unsigned_abs()) + nanos
        } else {
            UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs()) + nanos
        }
    }
}

// NTP packet format (v3)
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |LI | VN  |Mode |    Stratum    |     Poll      |   Precision   |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          Root Delay                           |
// |                        Root Dispersion                        |
// |                         Reference ID                          |
// |                   Reference Timestamp (64)                    |
// |                     Origin Timestamp (64)                     |
// |                    Receive Timestamp (64)                     |
// |                    Transmit Timestamp (64)                    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NtpPacket {
    pub settings: u8,
    pub stratum: u8,
    pub poll: i8,
    pub precision: i8,
    pub root_delay: u32,
    pub root_dispersion: u32,
    pub reference_id: u32,
    pub reference_time: NtpTimestamp,
    pub origin_time: NtpTimestamp,
    pub receive_time: NtpTimestamp,
    pub transmit_time: NtpTimestamp,
}

impl NtpPacket {
    pub fn client_request() -> Self {
        Self {
            settings: CLIENT_REQUEST_SETTINGS,
            ..Self::default()
        }
    }

    pub fn encode(&self) -> [u8; PACKET_LEN] {
        let mut out = [0u8; PACKET_LEN];
        out[0] = self.settings;
        out[1] = self.stratum;
        out[2] = self.poll.to_be_bytes()[0];
        out[3] = self.precision.to_be_bytes()[0];
        out[4..8].copy_from_slice(&self.root_delay.to_be_bytes());
        out[8..12].copy_from_slice(&self.root_dispersion.to_be_bytes());
        out[12..16].copy_from_slice(&self.reference_id.to_be_bytes());
        self.reference_time.write(&mut out[16..24]);
        self.origin_time.write(&mut out[24..32]);
        self.receive_time.write(&mut out[32..40]);
        self.transmit_time.write(&mut out[40..48]);
        out
    }

    /// Decodes a response. Anything shorter than a full packet is rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, TimeQueryError> {
        if bytes.len() < PACKET_LEN {
            return Err(TimeQueryError::ShortResponse(bytes.len()));
        }

        Ok(Self {
            settings: bytes[0],
            stratum: bytes[1],
            poll: i8::from_be_bytes([bytes[2]]),
            precision: i8::from_be_bytes([bytes[3]]),
            root_delay: read_u32(&bytes[4..8]),
            root_dispersion: read_u32(&bytes[8..12]),
            reference_id: read_u32(&bytes[12..16]),
            reference_time: NtpTimestamp::read(&bytes[16..24]),
            origin_time: NtpTimestamp::read(&bytes[24..32]),
            receive_time: NtpTimestamp::read(&bytes[32..40]),
            transmit_time: NtpTimestamp::read(&bytes[40..48]),
        })
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Single-shot SNTP client: one request, one response, no retries.
#[derive(Debug, Clone)]
pub struct NtpClient {
    server: String,
    timeout: Duration,
}

impl NtpClient {
    pub fn new(server: &str, timeout: Duration) -> Self {
        NtpClient {
            server: server.to_string(),
            timeout,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn resolve(&self) -> Result<SocketAddr, TimeQueryError> {
        self.server
            .to_socket_addrs()
            .map_err(|_| TimeQueryError::Resolve(self.server.clone()))?
            .next()
            .ok_or_else(|| TimeQueryError::Resolve(self.server.clone()))
    }

    /// Sends one client request and returns the server's transmit time.
    pub fn query(&self) -> Result<SystemTime, TimeQueryError> {
        let server = self.resolve()?;
        let local = if server.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };

        // Dropped, and so closed, on every return path.
        let socket = UdpSocket::bind(local)?;
        socket.connect(server)?;
        socket.set_write_timeout(Some(self.timeout))?;
        socket.set_read_timeout(Some(self.timeout))?;

        socket.send(&NtpPacket::client_request().encode())?;
        debug!(%server, "sent time request");

        let mut buf = [0u8; PACKET_LEN];
        let received = socket.recv(&mut buf)?;
        let response = NtpPacket::decode(&buf[..received])?;

        if response.transmit_time.is_zero() {
            return Err(TimeQueryError::MissingTransmitTimestamp);
        }

        info!(
            %server,
            stratum = response.stratum,
            seconds = response.transmit_time.seconds,
            fraction = response.transmit_time.fraction,
            "received network time"
        );

        Ok(response.transmit_time.to_system_time())
    }
}

impl QueryTime for NtpClient {
    fn query_time(&self) -> Result<SystemTime, TimeQueryError> {
        self.query()
    }
}
