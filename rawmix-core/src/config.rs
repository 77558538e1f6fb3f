//! Run configuration
//!
//! A [`Config`] is populated once (normally by the command line front end),
//! checked with [`Config::validate`], then shared read-only between all
//! workers. Header fields left at their type's zero value are replaced with a
//! fresh random value every time a packet is built.

use crate::{Error, Result};
use std::net::Ipv4Addr;
use tracing::warn;

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 1024;

/// Threshold used when none is given.
pub const DEFAULT_THRESHOLD: u64 = 1000;

/// Acronym of the module used when none is selected.
pub const DEFAULT_PROTOCOL: &str = "TCP";

/// IP precedence "immediate".
pub const IPTOS_PREC_IMMEDIATE: u8 = 0x40;

/// Which protocol module(s) the workers build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolSelection {
    /// One module, looked up by acronym in the registry
    Single(String),
    /// Every registered module in turn
    Mixed,
}

impl ProtocolSelection {
    pub fn is_mixed(&self) -> bool {
        matches!(self, ProtocolSelection::Mixed)
    }
}

impl Default for ProtocolSelection {
    fn default() -> Self {
        ProtocolSelection::Single(DEFAULT_PROTOCOL.to_string())
    }
}

/// Optional GRE header words
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreFlags {
    bits: u8,
}

impl GreFlags {
    pub const CHECKSUM: u8 = 0x01;
    pub const KEY: u8 = 0x02;
    pub const SEQUENCE: u8 = 0x04;

    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & (Self::CHECKSUM | Self::KEY | Self::SEQUENCE),
        }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.bits & flag == flag
    }

    pub fn insert(&mut self, flag: u8) {
        self.bits |= flag;
    }

    /// Number of optional 32-bit words present.
    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

/// TCP options to append after the fixed header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpOptionSet {
    bits: u16,
}

impl TcpOptionSet {
    pub const MSS: u16 = 0x0001;
    pub const WSOPT: u16 = 0x0002;
    pub const TSOPT: u16 = 0x0004;
    pub const SACK_OK: u16 = 0x0008;
    pub const CC: u16 = 0x0010;
    pub const CC_NEW: u16 = 0x0020;
    pub const CC_ECHO: u16 = 0x0040;
    pub const SACK_EDGE: u16 = 0x0080;

    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn contains(&self, option: u16) -> bool {
        self.bits & option == option
    }

    pub fn insert(&mut self, option: u16) {
        self.bits |= option;
    }
}

/// TCP control bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpFlags {
    pub fin: bool,
    pub syn: bool,
    pub rst: bool,
    pub psh: bool,
    pub ack: bool,
    pub urg: bool,
    pub ece: bool,
    pub cwr: bool,
}

impl TcpFlags {
    /// Flags byte as laid out in the header (CWR is the high bit)
    pub fn to_u8(self) -> u8 {
        [
            self.fin, self.syn, self.rst, self.psh, self.ack, self.urg, self.ece, self.cwr,
        ]
        .iter()
        .enumerate()
        .fold(0u8, |acc, (bit, set)| if *set { acc | (1 << bit) } else { acc })
    }
}

/// Outer IPv4 header fields
#[derive(Debug, Clone)]
pub struct IpOptions {
    pub tos: u8,
    pub id: u16,
    /// Fragment offset in bytes; zero sends with DF set
    pub frag_offset: u16,
    pub ttl: u8,
    pub source: Ipv4Addr,
}

impl Default for IpOptions {
    fn default() -> Self {
        Self {
            tos: IPTOS_PREC_IMMEDIATE,
            id: 0,
            frag_offset: 0,
            ttl: 255,
            source: Ipv4Addr::UNSPECIFIED,
        }
    }
}

/// GRE encapsulation fields
#[derive(Debug, Clone)]
pub struct GreOptions {
    pub flags: GreFlags,
    pub key: u32,
    pub sequence: u32,
    /// Inner header source; unspecified copies the outer source
    pub source: Ipv4Addr,
    /// Inner header destination; unspecified copies the outer destination
    pub destination: Ipv4Addr,
}

impl Default for GreOptions {
    fn default() -> Self {
        Self {
            flags: GreFlags::default(),
            key: 0,
            sequence: 0,
            source: Ipv4Addr::UNSPECIFIED,
            destination: Ipv4Addr::UNSPECIFIED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IcmpOptions {
    pub icmp_type: u8,
    pub code: u8,
    pub id: u16,
    pub sequence: u16,
    pub gateway: Ipv4Addr,
}

impl Default for IcmpOptions {
    fn default() -> Self {
        Self {
            icmp_type: 8,
            code: 0,
            id: 0,
            sequence: 0,
            gateway: Ipv4Addr::UNSPECIFIED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IgmpOptions {
    pub igmp_type: u8,
    pub code: u8,
    pub group: Ipv4Addr,
    pub qrv: u8,
    pub suppress: bool,
    pub qqic: u8,
    pub grec_type: u8,
    /// Number of source addresses carried by v3 messages
    pub sources: u8,
    pub grec_multicast: Ipv4Addr,
    /// Explicit source addresses; missing entries are random
    pub addresses: Vec<Ipv4Addr>,
}

impl Default for IgmpOptions {
    fn default() -> Self {
        Self {
            igmp_type: 0x11,
            code: 0,
            group: Ipv4Addr::UNSPECIFIED,
            qrv: 0,
            suppress: false,
            qqic: 0,
            grec_type: 1,
            sources: 2,
            grec_multicast: Ipv4Addr::UNSPECIFIED,
            addresses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TcpOptions {
    pub sequence: u32,
    pub acknowledge: u32,
    /// Data offset override in 32-bit words; zero computes it
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window: u16,
    pub urgent_pointer: u16,
    pub options: TcpOptionSet,
    pub mss: u16,
    pub wscale: u8,
    pub tsval: u32,
    pub tsecr: u32,
    pub cc: u32,
    pub cc_new: u32,
    pub cc_echo: u32,
    pub sack_left: u32,
    pub sack_right: u32,
    /// RFC 2385 signature option
    pub md5: bool,
    /// RFC 5925 authentication option
    pub auth: bool,
    pub key_id: u8,
    pub next_key: u8,
    /// Pad options with NOP instead of EOL
    pub nop: bool,
}

impl Default for TcpOptions {
    fn default() -> Self {
        Self {
            sequence: 0,
            acknowledge: 0,
            data_offset: 0,
            flags: TcpFlags::default(),
            window: 0,
            urgent_pointer: 0,
            options: TcpOptionSet::empty(),
            mss: 0,
            wscale: 0,
            tsval: 0,
            tsecr: 0,
            cc: 0,
            cc_new: 0,
            cc_echo: 0,
            sack_left: 0,
            sack_right: 0,
            md5: false,
            auth: false,
            key_id: 1,
            next_key: 1,
            nop: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EgpOptions {
    pub egp_type: u8,
    pub code: u8,
    pub status: u8,
    pub autonomous_system: u16,
    pub sequence: u16,
    pub hello: u16,
    pub poll: u16,
}

impl Default for EgpOptions {
    fn default() -> Self {
        Self {
            egp_type: 3,
            code: 3,
            status: 1,
            autonomous_system: 0,
            sequence: 0,
            hello: 0,
            poll: 0,
        }
    }
}

/// Shared by the RIPv1 and RIPv2 modules
#[derive(Debug, Clone)]
pub struct RipOptions {
    pub command: u8,
    pub family: u16,
    pub address: Ipv4Addr,
    pub metric: u32,
    pub domain: u16,
    pub tag: u16,
    pub netmask: Ipv4Addr,
    pub next_hop: Ipv4Addr,
    /// RFC 2082 keyed MD5 authentication (RIPv2 only)
    pub auth: bool,
    pub key_id: u8,
    pub sequence: u32,
}

impl Default for RipOptions {
    fn default() -> Self {
        Self {
            command: 2,
            family: 2,
            address: Ipv4Addr::UNSPECIFIED,
            metric: 0,
            domain: 0,
            tag: 0,
            netmask: Ipv4Addr::UNSPECIFIED,
            next_hop: Ipv4Addr::UNSPECIFIED,
            auth: false,
            key_id: 1,
            sequence: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DccpOptions {
    /// Data offset override in 32-bit words; zero computes it
    pub data_offset: u8,
    pub cscov: u8,
    pub ccval: u8,
    /// Packet type, 0 is DCCP-Request
    pub packet_type: u8,
    /// Use 48-bit sequence numbers
    pub extended: bool,
    pub sequence: u64,
    pub service: u32,
    pub acknowledge: u64,
    pub reset_code: u8,
}

#[derive(Debug, Clone)]
pub struct RsvpOptions {
    pub flags: u8,
    pub message_type: u8,
    pub ttl: u8,
    pub session_addr: Ipv4Addr,
    pub session_proto: u8,
    pub session_flags: u8,
    pub session_port: u16,
    pub hop_addr: Ipv4Addr,
    pub hop_iface: u32,
    pub time_refresh: u32,
    pub error_addr: Ipv4Addr,
    pub error_flags: u8,
    pub error_code: u8,
    pub error_value: u16,
    /// Number of SCOPE addresses
    pub scope: u8,
    pub scope_addresses: Vec<Ipv4Addr>,
    pub style_opt: u32,
    pub sender_addr: Ipv4Addr,
    pub sender_port: u16,
    /// SENDER_TSPEC service header number
    pub tspec: u8,
    pub tspec_r: u32,
    pub tspec_b: u32,
    pub tspec_p: u32,
    pub tspec_m: u32,
    pub tspec_max: u32,
    pub adspec_hop: u32,
    pub adspec_path: u32,
    pub adspec_minimum: u32,
    pub adspec_mtu: u32,
    /// ADSPEC per-service fragment: 0 none, 2 guaranteed, 5 controlled load
    pub adspec: u8,
    pub adspec_ctot: u32,
    pub adspec_dtot: u32,
    pub adspec_csum: u32,
    pub adspec_dsum: u32,
    pub confirm_addr: Ipv4Addr,
}

impl Default for RsvpOptions {
    fn default() -> Self {
        Self {
            flags: 1,
            message_type: 1,
            ttl: 254,
            session_addr: Ipv4Addr::UNSPECIFIED,
            session_proto: 1,
            session_flags: 1,
            session_port: 0,
            hop_addr: Ipv4Addr::UNSPECIFIED,
            hop_iface: 0,
            time_refresh: 360,
            error_addr: Ipv4Addr::UNSPECIFIED,
            error_flags: 2,
            error_code: 2,
            error_value: 8,
            scope: 1,
            scope_addresses: Vec::new(),
            style_opt: 18,
            sender_addr: Ipv4Addr::UNSPECIFIED,
            sender_port: 0,
            tspec: 1,
            tspec_r: 0,
            tspec_b: 0,
            tspec_p: 0,
            tspec_m: 0,
            tspec_max: 0,
            adspec_hop: 0,
            adspec_path: 0,
            adspec_minimum: 0,
            adspec_mtu: 0,
            adspec: 0,
            adspec_ctot: 0,
            adspec_dtot: 0,
            adspec_csum: 0,
            adspec_dsum: 0,
            confirm_addr: Ipv4Addr::UNSPECIFIED,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IpsecOptions {
    /// AH payload length override; zero computes it
    pub ah_length: u8,
    pub ah_spi: u32,
    pub ah_sequence: u32,
    pub esp_spi: u32,
    pub esp_sequence: u32,
}

#[derive(Debug, Clone)]
pub struct EigrpOptions {
    pub opcode: u8,
    pub flags: u32,
    pub sequence: u32,
    pub acknowledge: u32,
    pub autonomous_system: u16,
    /// Route TLV type: 0x0102 internal or 0x0103 external
    pub route_type: u16,
    /// TLV length override; zero computes it
    pub length: u16,
    pub k1: u8,
    pub k2: u8,
    pub k3: u8,
    pub k4: u8,
    pub k5: u8,
    pub hold: u16,
    pub ios_major: u8,
    pub ios_minor: u8,
    pub ver_major: u8,
    pub ver_minor: u8,
    pub next_hop: Ipv4Addr,
    pub delay: u32,
    pub bandwidth: u32,
    /// 24-bit MTU
    pub mtu: u32,
    pub hop_count: u8,
    pub load: u8,
    pub reliability: u8,
    /// Destination prefix length, zero picks one at random
    pub prefix: u8,
    pub destination: Ipv4Addr,
    pub src_router: Ipv4Addr,
    pub src_as: u32,
    pub tag: u32,
    pub proto_metric: u32,
    pub proto_id: u8,
    pub ext_flags: u8,
    pub auth: bool,
    pub key_id: u32,
}

impl Default for EigrpOptions {
    fn default() -> Self {
        Self {
            opcode: 1,
            flags: 0,
            sequence: 0,
            acknowledge: 0,
            autonomous_system: 0,
            route_type: 0x0102,
            length: 0,
            k1: 1,
            k2: 0,
            k3: 1,
            k4: 0,
            k5: 0,
            hold: 360,
            ios_major: 12,
            ios_minor: 4,
            ver_major: 1,
            ver_minor: 2,
            next_hop: Ipv4Addr::UNSPECIFIED,
            delay: 0,
            bandwidth: 0,
            mtu: 1500,
            hop_count: 0,
            load: 0,
            reliability: 0,
            prefix: 0,
            destination: Ipv4Addr::UNSPECIFIED,
            src_router: Ipv4Addr::UNSPECIFIED,
            src_as: 0,
            tag: 0,
            proto_metric: 0,
            proto_id: 2,
            ext_flags: 0,
            auth: false,
            key_id: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OspfOptions {
    pub packet_type: u8,
    /// Packet length override; zero computes it
    pub length: u16,
    pub router_id: Ipv4Addr,
    /// `None` draws a random area; `Some(0.0.0.0)` is the backbone
    pub area_id: Option<Ipv4Addr>,
    /// Options byte (MT, E, MC, NP, L, DC, O, DN)
    pub options: u8,
    pub netmask: Ipv4Addr,
    pub hello_interval: u16,
    pub hello_priority: u8,
    pub hello_dead: u32,
    pub hello_design: Ipv4Addr,
    pub hello_backup: Ipv4Addr,
    /// Number of neighbors listed in HELLO
    pub neighbors: u8,
    pub neighbor_addresses: Vec<Ipv4Addr>,
    pub dd_mtu: u16,
    /// DD flags (MS, M, I, R)
    pub dd_dbdesc: u8,
    pub dd_sequence: u32,
    pub dd_include_lsa: bool,
    pub lsa_age: u16,
    pub lsa_do_not_age: bool,
    pub lsa_type: u8,
    pub lsa_id: Ipv4Addr,
    pub lsa_router: Ipv4Addr,
    pub lsa_sequence: u32,
    pub lsa_metric: u32,
    /// Router-LSA flags (B, E, V, W, NT)
    pub lsa_flags: u8,
    pub lsa_link_id: Ipv4Addr,
    pub lsa_link_data: Ipv4Addr,
    pub lsa_link_type: u8,
    pub lsa_attached: Ipv4Addr,
    pub lsa_larger: bool,
    pub lsa_forward: Ipv4Addr,
    pub lsa_external: Ipv4Addr,
    pub vertex_type: u32,
    pub vertex_id: Ipv4Addr,
    /// LLS Extended Options bits (LR, RS)
    pub lls_options: u32,
    pub auth: bool,
    pub key_id: u8,
    pub sequence: u32,
}

impl OspfOptions {
    pub const OPTION_MT: u8 = 0x01;
    pub const OPTION_E: u8 = 0x02;
    pub const OPTION_MC: u8 = 0x04;
    pub const OPTION_NP: u8 = 0x08;
    pub const OPTION_L: u8 = 0x10;
    pub const OPTION_DC: u8 = 0x20;
    pub const OPTION_O: u8 = 0x40;
    pub const OPTION_DN: u8 = 0x80;
}

impl Default for OspfOptions {
    fn default() -> Self {
        Self {
            packet_type: 1,
            length: 0,
            router_id: Ipv4Addr::UNSPECIFIED,
            area_id: None,
            options: 0,
            netmask: Ipv4Addr::UNSPECIFIED,
            hello_interval: 0,
            hello_priority: 1,
            hello_dead: 360,
            hello_design: Ipv4Addr::UNSPECIFIED,
            hello_backup: Ipv4Addr::UNSPECIFIED,
            neighbors: 0,
            neighbor_addresses: Vec::new(),
            dd_mtu: 1500,
            dd_dbdesc: 0,
            dd_sequence: 0,
            dd_include_lsa: false,
            lsa_age: 360,
            lsa_do_not_age: false,
            lsa_type: 1,
            lsa_id: Ipv4Addr::UNSPECIFIED,
            lsa_router: Ipv4Addr::UNSPECIFIED,
            lsa_sequence: 0,
            lsa_metric: 0,
            lsa_flags: 0,
            lsa_link_id: Ipv4Addr::UNSPECIFIED,
            lsa_link_data: Ipv4Addr::UNSPECIFIED,
            lsa_link_type: 1,
            lsa_attached: Ipv4Addr::UNSPECIFIED,
            lsa_larger: false,
            lsa_forward: Ipv4Addr::UNSPECIFIED,
            lsa_external: Ipv4Addr::UNSPECIFIED,
            vertex_type: 0,
            vertex_id: Ipv4Addr::UNSPECIFIED,
            lls_options: 0,
            auth: false,
            key_id: 1,
            sequence: 0,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination address, the network base when `bits` < 32
    pub target: Ipv4Addr,
    /// CIDR prefix length of the destination range
    pub bits: u8,
    /// Total number of packets to send across all workers
    pub threshold: u64,
    /// Ignore the threshold and send until interrupted
    pub flood: bool,
    pub threads: usize,
    /// Write random values into every checksum field
    pub bogus_checksum: bool,
    /// Wrap every packet in GRE
    pub encapsulated: bool,
    pub selection: ProtocolSelection,
    /// Source port shared by TCP, UDP and DCCP
    pub source_port: u16,
    /// Destination port shared by TCP, UDP and DCCP
    pub dest_port: u16,
    pub ip: IpOptions,
    pub gre: GreOptions,
    pub icmp: IcmpOptions,
    pub igmp: IgmpOptions,
    pub tcp: TcpOptions,
    pub egp: EgpOptions,
    pub rip: RipOptions,
    pub dccp: DccpOptions,
    pub rsvp: RsvpOptions,
    pub ipsec: IpsecOptions,
    pub eigrp: EigrpOptions,
    pub ospf: OspfOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: Ipv4Addr::UNSPECIFIED,
            bits: 32,
            threshold: DEFAULT_THRESHOLD,
            flood: false,
            threads: 1,
            bogus_checksum: false,
            encapsulated: false,
            selection: ProtocolSelection::default(),
            source_port: 0,
            dest_port: 0,
            ip: IpOptions::default(),
            gre: GreOptions::default(),
            icmp: IcmpOptions::default(),
            igmp: IgmpOptions::default(),
            tcp: TcpOptions::default(),
            egp: EgpOptions::default(),
            rip: RipOptions::default(),
            dccp: DccpOptions::default(),
            rsvp: RsvpOptions::default(),
            ipsec: IpsecOptions::default(),
            eigrp: EigrpOptions::default(),
            ospf: OspfOptions::default(),
        }
    }
}

impl Config {
    /// Reject combinations the builders and the pool cannot honor.
    ///
    /// `module_count` is the number of registered modules, which bounds the
    /// threshold from below in mixed mode.
    pub fn validate(&self, module_count: usize) -> Result<()> {
        if self.target.is_unspecified() {
            return Err(Error::invalid_config("target", "need a target address"));
        }

        if self.bits > 32 {
            return Err(Error::invalid_config(
                "bits",
                "CIDR must be between 0 and 32",
            ));
        }

        let tcp_options = self.tcp.options;
        if tcp_options.contains(TcpOptionSet::SACK_OK) && tcp_options.contains(TcpOptionSet::SACK_EDGE)
        {
            return Err(Error::invalid_config(
                "tcp.options",
                "SACK-Permitted and SACK edges are mutually exclusive",
            ));
        }
        if tcp_options.contains(TcpOptionSet::CC) && tcp_options.contains(TcpOptionSet::CC_ECHO) {
            return Err(Error::invalid_config(
                "tcp.options",
                "T/TCP CC and CC.ECHO are mutually exclusive",
            ));
        }
        if self.tcp.md5 && self.tcp.auth {
            return Err(Error::invalid_config(
                "tcp.options",
                "MD5 signature and TCP-AO are mutually exclusive",
            ));
        }

        if !self.flood {
            let minimum = if self.selection.is_mixed() {
                module_count as u64
            } else {
                1
            };
            if self.threshold < minimum {
                return Err(Error::invalid_config(
                    "threshold",
                    format!("cannot be smaller than {}", minimum),
                ));
            }
        }

        if self.threads == 0 {
            return Err(Error::invalid_config("threads", "need at least one thread"));
        }
        if !self.flood && self.threads as u64 > self.threshold {
            return Err(Error::invalid_config(
                "threads",
                "cannot be greater than the threshold",
            ));
        }
        if self.threads > MAX_THREADS {
            return Err(Error::invalid_config(
                "threads",
                format!("cannot be greater than {}", MAX_THREADS),
            ));
        }

        if let Ok(online) = std::thread::available_parallelism() {
            if self.threads > online.get() {
                warn!(
                    threads = self.threads,
                    online = online.get(),
                    "Number of threads is greater than number of processors online"
                );
            }
        }

        Ok(())
    }
}
