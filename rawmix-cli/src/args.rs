//! CLI argument parsing
//!
//! Every header field of every module can be set from the command line.
//! Flags that are not given leave the [`Config`] default in place, and a
//! default of zero means "random per packet".

use clap::{Args, Parser};
use rawmix_core::config::{GreFlags, OspfOptions, ProtocolSelection, TcpOptionSet};
use rawmix_core::{Config, Error, Result};
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

/// Protocol name selecting every module in turn
pub const MIXED_PROTOCOL: &str = "T50";

#[derive(Parser, Debug)]
#[command(name = "rawmix")]
#[command(version, about = "Multi-protocol raw packet generator", long_about = None)]
pub struct Cli {
    /// Destination host or network, optionally with a CIDR prefix
    #[arg(value_name = "TARGET[/BITS]", required_unless_present = "list_protocols")]
    pub target: Option<String>,

    /// Number of packets to send across all threads
    #[arg(long, value_name = "NUM")]
    pub threshold: Option<u64>,

    /// Send until interrupted, ignoring the threshold
    #[arg(long)]
    pub flood: bool,

    /// Number of worker threads
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    pub threads: usize,

    /// Wrap every packet in GRE
    #[arg(long)]
    pub encapsulated: bool,

    /// Write random values into every checksum field
    #[arg(short = 'B', long = "bogus-csum")]
    pub bogus_checksum: bool,

    /// Protocol acronym, or T50 to cycle through all of them
    #[arg(long, value_name = "PROTO")]
    pub protocol: Option<String>,

    /// List the available protocols and exit
    #[arg(short = 'l', long)]
    pub list_protocols: bool,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Source port for TCP, UDP and DCCP
    #[arg(long = "sport", value_name = "PORT")]
    pub source_port: Option<u16>,

    /// Destination port for TCP, UDP and DCCP
    #[arg(long = "dport", value_name = "PORT")]
    pub dest_port: Option<u16>,

    #[command(flatten)]
    pub ip: IpArgs,

    #[command(flatten)]
    pub gre: GreArgs,

    #[command(flatten)]
    pub icmp: IcmpArgs,

    #[command(flatten)]
    pub igmp: IgmpArgs,

    #[command(flatten)]
    pub tcp: TcpArgs,

    #[command(flatten)]
    pub egp: EgpArgs,

    #[command(flatten)]
    pub rip: RipArgs,

    #[command(flatten)]
    pub dccp: DccpArgs,

    #[command(flatten)]
    pub rsvp: RsvpArgs,

    #[command(flatten)]
    pub ipsec: IpsecArgs,

    #[command(flatten)]
    pub eigrp: EigrpArgs,

    #[command(flatten)]
    pub ospf: OspfArgs,
}

/// Accepts decimal or `0x`-prefixed hexadecimal, for bitfield options.
fn number<T: TryFrom<u64>>(value: &str) -> std::result::Result<T, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    }
    .map_err(|e| e.to_string())?;
    T::try_from(parsed).map_err(|_| format!("{value} is out of range"))
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn set_list(slot: &mut Vec<Ipv4Addr>, values: &[Ipv4Addr]) {
    if !values.is_empty() {
        *slot = values.to_vec();
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "IP options")]
pub struct IpArgs {
    /// Type of service
    #[arg(long = "tos", value_parser = number::<u8>)]
    pub ip_tos: Option<u8>,

    /// Identification
    #[arg(long = "id")]
    pub ip_id: Option<u16>,

    /// Fragment offset in bytes
    #[arg(long = "frag-offset")]
    pub ip_frag_offset: Option<u16>,

    /// Time to live
    #[arg(long = "ttl")]
    pub ip_ttl: Option<u8>,

    /// Source address
    #[arg(short = 's', long = "saddr", value_name = "ADDR")]
    pub ip_source: Option<Ipv4Addr>,
}

impl IpArgs {
    fn apply(&self, config: &mut Config) {
        let ip = &mut config.ip;
        set(&mut ip.tos, self.ip_tos);
        set(&mut ip.id, self.ip_id);
        set(&mut ip.frag_offset, self.ip_frag_offset);
        set(&mut ip.ttl, self.ip_ttl);
        set(&mut ip.source, self.ip_source);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "GRE options")]
pub struct GreArgs {
    /// Include the sequence number word
    #[arg(long = "gre-seq-present")]
    pub gre_sequence_present: bool,

    /// Include the key word
    #[arg(long = "gre-key-present")]
    pub gre_key_present: bool,

    /// Include the checksum word
    #[arg(long = "gre-sum-present")]
    pub gre_checksum_present: bool,

    #[arg(long = "gre-key")]
    pub gre_key: Option<u32>,

    #[arg(long = "gre-sequence")]
    pub gre_sequence: Option<u32>,

    /// Inner header source address
    #[arg(long = "gre-saddr", value_name = "ADDR")]
    pub gre_source: Option<Ipv4Addr>,

    /// Inner header destination address
    #[arg(long = "gre-daddr", value_name = "ADDR")]
    pub gre_destination: Option<Ipv4Addr>,
}

impl GreArgs {
    fn apply(&self, config: &mut Config) {
        let gre = &mut config.gre;
        if self.gre_checksum_present {
            gre.flags.insert(GreFlags::CHECKSUM);
        }
        if self.gre_key_present {
            gre.flags.insert(GreFlags::KEY);
        }
        if self.gre_sequence_present {
            gre.flags.insert(GreFlags::SEQUENCE);
        }
        set(&mut gre.key, self.gre_key);
        set(&mut gre.sequence, self.gre_sequence);
        set(&mut gre.source, self.gre_source);
        set(&mut gre.destination, self.gre_destination);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "ICMP options")]
pub struct IcmpArgs {
    #[arg(long = "icmp-type")]
    pub icmp_type: Option<u8>,

    #[arg(long = "icmp-code")]
    pub icmp_code: Option<u8>,

    #[arg(long = "icmp-id")]
    pub icmp_id: Option<u16>,

    #[arg(long = "icmp-sequence")]
    pub icmp_sequence: Option<u16>,

    /// Gateway for redirect messages
    #[arg(long = "icmp-gateway", value_name = "ADDR")]
    pub icmp_gateway: Option<Ipv4Addr>,
}

impl IcmpArgs {
    fn apply(&self, config: &mut Config) {
        let icmp = &mut config.icmp;
        set(&mut icmp.icmp_type, self.icmp_type);
        set(&mut icmp.code, self.icmp_code);
        set(&mut icmp.id, self.icmp_id);
        set(&mut icmp.sequence, self.icmp_sequence);
        set(&mut icmp.gateway, self.icmp_gateway);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "IGMP options")]
pub struct IgmpArgs {
    #[arg(long = "igmp-type", value_parser = number::<u8>)]
    pub igmp_type: Option<u8>,

    /// Code, or maximum response code for v3 queries
    #[arg(long = "igmp-code")]
    pub igmp_code: Option<u8>,

    #[arg(long = "igmp-group", value_name = "ADDR")]
    pub igmp_group: Option<Ipv4Addr>,

    /// Querier robustness variable
    #[arg(long = "igmp-qrv")]
    pub igmp_qrv: Option<u8>,

    /// Suppress router-side processing
    #[arg(long = "igmp-suppress")]
    pub igmp_suppress: bool,

    /// Querier query interval code
    #[arg(long = "igmp-qqic")]
    pub igmp_qqic: Option<u8>,

    /// Group record type for v3 reports
    #[arg(long = "igmp-grec-type")]
    pub igmp_grec_type: Option<u8>,

    /// Number of source addresses
    #[arg(long = "igmp-sources")]
    pub igmp_sources: Option<u8>,

    /// Group record multicast address
    #[arg(long = "igmp-multicast", value_name = "ADDR")]
    pub igmp_grec_multicast: Option<Ipv4Addr>,

    /// Source addresses, comma separated
    #[arg(long = "igmp-address", value_name = "ADDR", value_delimiter = ',')]
    pub igmp_addresses: Vec<Ipv4Addr>,
}

impl IgmpArgs {
    fn apply(&self, config: &mut Config) {
        let igmp = &mut config.igmp;
        set(&mut igmp.igmp_type, self.igmp_type);
        set(&mut igmp.code, self.igmp_code);
        set(&mut igmp.group, self.igmp_group);
        set(&mut igmp.qrv, self.igmp_qrv);
        igmp.suppress |= self.igmp_suppress;
        set(&mut igmp.qqic, self.igmp_qqic);
        set(&mut igmp.grec_type, self.igmp_grec_type);
        set(&mut igmp.sources, self.igmp_sources);
        set(&mut igmp.grec_multicast, self.igmp_grec_multicast);
        set_list(&mut igmp.addresses, &self.igmp_addresses);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "TCP options")]
pub struct TcpArgs {
    #[arg(long = "sequence")]
    pub tcp_sequence: Option<u32>,

    #[arg(long = "acknowledge")]
    pub tcp_acknowledge: Option<u32>,

    /// Data offset in 32-bit words
    #[arg(long = "data-offset")]
    pub tcp_data_offset: Option<u8>,

    #[arg(short = 'F', long = "fin")]
    pub tcp_fin: bool,

    #[arg(short = 'S', long = "syn")]
    pub tcp_syn: bool,

    #[arg(short = 'R', long = "rst")]
    pub tcp_rst: bool,

    #[arg(short = 'P', long = "psh")]
    pub tcp_psh: bool,

    #[arg(short = 'A', long = "ack")]
    pub tcp_ack: bool,

    #[arg(short = 'U', long = "urg")]
    pub tcp_urg: bool,

    #[arg(short = 'E', long = "ece")]
    pub tcp_ece: bool,

    #[arg(short = 'C', long = "cwr")]
    pub tcp_cwr: bool,

    #[arg(short = 'W', long = "window")]
    pub tcp_window: Option<u16>,

    #[arg(long = "urg-pointer")]
    pub tcp_urgent_pointer: Option<u16>,

    /// Maximum segment size option
    #[arg(long = "mss")]
    pub tcp_mss: Option<u16>,

    /// Window scale option
    #[arg(long = "wscale")]
    pub tcp_wscale: Option<u8>,

    /// Timestamp option value
    #[arg(long = "tsval")]
    pub tcp_tsval: Option<u32>,

    /// Timestamp option echo reply
    #[arg(long = "tsecr")]
    pub tcp_tsecr: Option<u32>,

    /// SACK-Permitted option
    #[arg(long = "sack-ok", conflicts_with_all = ["tcp_sack_left", "tcp_sack_right"])]
    pub tcp_sack_ok: bool,

    /// T/TCP connection count
    #[arg(long = "cc", conflicts_with = "tcp_cc_echo")]
    pub tcp_cc: Option<u32>,

    #[arg(long = "ccnew")]
    pub tcp_cc_new: Option<u32>,

    #[arg(long = "ccecho")]
    pub tcp_cc_echo: Option<u32>,

    /// SACK block left edge
    #[arg(long = "sack-left")]
    pub tcp_sack_left: Option<u32>,

    /// SACK block right edge
    #[arg(long = "sack-right")]
    pub tcp_sack_right: Option<u32>,

    /// TCP MD5 signature option
    #[arg(long = "md5-signature", conflicts_with = "tcp_authentication")]
    pub tcp_md5: bool,

    /// TCP authentication option
    #[arg(long = "authentication")]
    pub tcp_authentication: bool,

    #[arg(long = "auth-key-id")]
    pub tcp_key_id: Option<u8>,

    #[arg(long = "auth-next-key")]
    pub tcp_next_key: Option<u8>,

    /// Pad options with NOP instead of EOL
    #[arg(long = "nop")]
    pub tcp_nop: bool,
}

impl TcpArgs {
    fn apply(&self, config: &mut Config) {
        let tcp = &mut config.tcp;
        set(&mut tcp.sequence, self.tcp_sequence);
        set(&mut tcp.acknowledge, self.tcp_acknowledge);
        set(&mut tcp.data_offset, self.tcp_data_offset);

        let flags = &mut tcp.flags;
        flags.fin |= self.tcp_fin;
        flags.syn |= self.tcp_syn;
        flags.rst |= self.tcp_rst;
        flags.psh |= self.tcp_psh;
        flags.ack |= self.tcp_ack;
        flags.urg |= self.tcp_urg;
        flags.ece |= self.tcp_ece;
        flags.cwr |= self.tcp_cwr;

        set(&mut tcp.window, self.tcp_window);
        set(&mut tcp.urgent_pointer, self.tcp_urgent_pointer);

        if let Some(mss) = self.tcp_mss {
            tcp.options.insert(TcpOptionSet::MSS);
            tcp.mss = mss;
        }
        if let Some(wscale) = self.tcp_wscale {
            tcp.options.insert(TcpOptionSet::WSOPT);
            tcp.wscale = wscale;
        }
        if self.tcp_tsval.is_some() || self.tcp_tsecr.is_some() {
            tcp.options.insert(TcpOptionSet::TSOPT);
            set(&mut tcp.tsval, self.tcp_tsval);
            set(&mut tcp.tsecr, self.tcp_tsecr);
        }
        if self.tcp_sack_ok {
            tcp.options.insert(TcpOptionSet::SACK_OK);
        }
        if let Some(cc) = self.tcp_cc {
            tcp.options.insert(TcpOptionSet::CC);
            tcp.cc = cc;
        }
        if let Some(cc_new) = self.tcp_cc_new {
            tcp.options.insert(TcpOptionSet::CC_NEW);
            tcp.cc_new = cc_new;
        }
        if let Some(cc_echo) = self.tcp_cc_echo {
            tcp.options.insert(TcpOptionSet::CC_ECHO);
            tcp.cc_echo = cc_echo;
        }
        if self.tcp_sack_left.is_some() || self.tcp_sack_right.is_some() {
            tcp.options.insert(TcpOptionSet::SACK_EDGE);
            set(&mut tcp.sack_left, self.tcp_sack_left);
            set(&mut tcp.sack_right, self.tcp_sack_right);
        }

        tcp.md5 |= self.tcp_md5;
        tcp.auth |= self.tcp_authentication;
        set(&mut tcp.key_id, self.tcp_key_id);
        set(&mut tcp.next_key, self.tcp_next_key);
        tcp.nop |= self.tcp_nop;
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "EGP options")]
pub struct EgpArgs {
    #[arg(long = "egp-type")]
    pub egp_type: Option<u8>,

    #[arg(long = "egp-code")]
    pub egp_code: Option<u8>,

    #[arg(long = "egp-status")]
    pub egp_status: Option<u8>,

    #[arg(long = "egp-as")]
    pub egp_autonomous_system: Option<u16>,

    #[arg(long = "egp-sequence")]
    pub egp_sequence: Option<u16>,

    #[arg(long = "egp-hello")]
    pub egp_hello: Option<u16>,

    #[arg(long = "egp-poll")]
    pub egp_poll: Option<u16>,
}

impl EgpArgs {
    fn apply(&self, config: &mut Config) {
        let egp = &mut config.egp;
        set(&mut egp.egp_type, self.egp_type);
        set(&mut egp.code, self.egp_code);
        set(&mut egp.status, self.egp_status);
        set(&mut egp.autonomous_system, self.egp_autonomous_system);
        set(&mut egp.sequence, self.egp_sequence);
        set(&mut egp.hello, self.egp_hello);
        set(&mut egp.poll, self.egp_poll);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "RIP options")]
pub struct RipArgs {
    #[arg(long = "rip-command")]
    pub rip_command: Option<u8>,

    /// Address family identifier
    #[arg(long = "rip-family")]
    pub rip_family: Option<u16>,

    #[arg(long = "rip-address", value_name = "ADDR")]
    pub rip_address: Option<Ipv4Addr>,

    #[arg(long = "rip-metric")]
    pub rip_metric: Option<u32>,

    /// Routing domain (RIPv2)
    #[arg(long = "rip-domain")]
    pub rip_domain: Option<u16>,

    /// Route tag (RIPv2)
    #[arg(long = "rip-tag")]
    pub rip_tag: Option<u16>,

    #[arg(long = "rip-netmask", value_name = "ADDR")]
    pub rip_netmask: Option<Ipv4Addr>,

    #[arg(long = "rip-next-hop", value_name = "ADDR")]
    pub rip_next_hop: Option<Ipv4Addr>,

    /// Keyed MD5 authentication (RIPv2)
    #[arg(long = "rip-authentication")]
    pub rip_auth: bool,

    #[arg(long = "rip-key-id")]
    pub rip_key_id: Option<u8>,

    #[arg(long = "rip-sequence")]
    pub rip_sequence: Option<u32>,
}

impl RipArgs {
    fn apply(&self, config: &mut Config) {
        let rip = &mut config.rip;
        set(&mut rip.command, self.rip_command);
        set(&mut rip.family, self.rip_family);
        set(&mut rip.address, self.rip_address);
        set(&mut rip.metric, self.rip_metric);
        set(&mut rip.domain, self.rip_domain);
        set(&mut rip.tag, self.rip_tag);
        set(&mut rip.netmask, self.rip_netmask);
        set(&mut rip.next_hop, self.rip_next_hop);
        rip.auth |= self.rip_auth;
        set(&mut rip.key_id, self.rip_key_id);
        set(&mut rip.sequence, self.rip_sequence);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "DCCP options")]
pub struct DccpArgs {
    /// Data offset in 32-bit words
    #[arg(long = "dccp-data-offset")]
    pub dccp_data_offset: Option<u8>,

    /// Checksum coverage
    #[arg(long = "dccp-cscov")]
    pub dccp_cscov: Option<u8>,

    /// CCID-specific value
    #[arg(long = "dccp-ccval")]
    pub dccp_ccval: Option<u8>,

    #[arg(long = "dccp-type")]
    pub dccp_packet_type: Option<u8>,

    /// Use 48-bit sequence numbers
    #[arg(long = "dccp-extended")]
    pub dccp_extended: bool,

    #[arg(long = "dccp-sequence")]
    pub dccp_sequence: Option<u64>,

    #[arg(long = "dccp-service")]
    pub dccp_service: Option<u32>,

    #[arg(long = "dccp-acknowledge")]
    pub dccp_acknowledge: Option<u64>,

    #[arg(long = "dccp-reset-code")]
    pub dccp_reset_code: Option<u8>,
}

impl DccpArgs {
    fn apply(&self, config: &mut Config) {
        let dccp = &mut config.dccp;
        set(&mut dccp.data_offset, self.dccp_data_offset);
        set(&mut dccp.cscov, self.dccp_cscov);
        set(&mut dccp.ccval, self.dccp_ccval);
        set(&mut dccp.packet_type, self.dccp_packet_type);
        dccp.extended |= self.dccp_extended;
        set(&mut dccp.sequence, self.dccp_sequence);
        set(&mut dccp.service, self.dccp_service);
        set(&mut dccp.acknowledge, self.dccp_acknowledge);
        set(&mut dccp.reset_code, self.dccp_reset_code);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "RSVP options")]
pub struct RsvpArgs {
    #[arg(long = "rsvp-flags", value_parser = number::<u8>)]
    pub rsvp_flags: Option<u8>,

    #[arg(long = "rsvp-type")]
    pub rsvp_message_type: Option<u8>,

    #[arg(long = "rsvp-ttl")]
    pub rsvp_ttl: Option<u8>,

    #[arg(long = "rsvp-session-addr", value_name = "ADDR")]
    pub rsvp_session_addr: Option<Ipv4Addr>,

    #[arg(long = "rsvp-session-proto")]
    pub rsvp_session_proto: Option<u8>,

    #[arg(long = "rsvp-session-flags")]
    pub rsvp_session_flags: Option<u8>,

    #[arg(long = "rsvp-session-port")]
    pub rsvp_session_port: Option<u16>,

    #[arg(long = "rsvp-hop-addr", value_name = "ADDR")]
    pub rsvp_hop_addr: Option<Ipv4Addr>,

    /// Logical interface handle
    #[arg(long = "rsvp-hop-iface")]
    pub rsvp_hop_iface: Option<u32>,

    #[arg(long = "rsvp-time-refresh")]
    pub rsvp_time_refresh: Option<u32>,

    #[arg(long = "rsvp-error-addr", value_name = "ADDR")]
    pub rsvp_error_addr: Option<Ipv4Addr>,

    #[arg(long = "rsvp-error-flags")]
    pub rsvp_error_flags: Option<u8>,

    #[arg(long = "rsvp-error-code")]
    pub rsvp_error_code: Option<u8>,

    #[arg(long = "rsvp-error-value")]
    pub rsvp_error_value: Option<u16>,

    /// Number of SCOPE addresses
    #[arg(long = "rsvp-scope")]
    pub rsvp_scope: Option<u8>,

    /// SCOPE addresses, comma separated
    #[arg(long = "rsvp-scope-address", value_name = "ADDR", value_delimiter = ',')]
    pub rsvp_scope_addresses: Vec<Ipv4Addr>,

    #[arg(long = "rsvp-style-option", value_parser = number::<u32>)]
    pub rsvp_style_opt: Option<u32>,

    #[arg(long = "rsvp-sender-addr", value_name = "ADDR")]
    pub rsvp_sender_addr: Option<Ipv4Addr>,

    #[arg(long = "rsvp-sender-port")]
    pub rsvp_sender_port: Option<u16>,

    /// SENDER_TSPEC service number
    #[arg(long = "rsvp-tspec-traffic")]
    pub rsvp_tspec: Option<u8>,

    /// Token bucket rate
    #[arg(long = "rsvp-tspec-r")]
    pub rsvp_tspec_r: Option<u32>,

    /// Token bucket size
    #[arg(long = "rsvp-tspec-b")]
    pub rsvp_tspec_b: Option<u32>,

    /// Peak data rate
    #[arg(long = "rsvp-tspec-p")]
    pub rsvp_tspec_p: Option<u32>,

    /// Minimum policed unit
    #[arg(long = "rsvp-tspec-m")]
    pub rsvp_tspec_m: Option<u32>,

    /// Maximum packet size
    #[arg(long = "rsvp-tspec-max")]
    pub rsvp_tspec_max: Option<u32>,

    #[arg(long = "rsvp-adspec-hop")]
    pub rsvp_adspec_hop: Option<u32>,

    #[arg(long = "rsvp-adspec-path")]
    pub rsvp_adspec_path: Option<u32>,

    #[arg(long = "rsvp-adspec-minimum")]
    pub rsvp_adspec_minimum: Option<u32>,

    #[arg(long = "rsvp-adspec-mtu")]
    pub rsvp_adspec_mtu: Option<u32>,

    /// ADSPEC service: 2 guaranteed, 5 controlled load
    #[arg(long = "rsvp-adspec-type")]
    pub rsvp_adspec: Option<u8>,

    #[arg(long = "rsvp-adspec-ctot")]
    pub rsvp_adspec_ctot: Option<u32>,

    #[arg(long = "rsvp-adspec-dtot")]
    pub rsvp_adspec_dtot: Option<u32>,

    #[arg(long = "rsvp-adspec-csum")]
    pub rsvp_adspec_csum: Option<u32>,

    #[arg(long = "rsvp-adspec-dsum")]
    pub rsvp_adspec_dsum: Option<u32>,

    #[arg(long = "rsvp-confirm-addr", value_name = "ADDR")]
    pub rsvp_confirm_addr: Option<Ipv4Addr>,
}

impl RsvpArgs {
    fn apply(&self, config: &mut Config) {
        let rsvp = &mut config.rsvp;
        set(&mut rsvp.flags, self.rsvp_flags);
        set(&mut rsvp.message_type, self.rsvp_message_type);
        set(&mut rsvp.ttl, self.rsvp_ttl);
        set(&mut rsvp.session_addr, self.rsvp_session_addr);
        set(&mut rsvp.session_proto, self.rsvp_session_proto);
        set(&mut rsvp.session_flags, self.rsvp_session_flags);
        set(&mut rsvp.session_port, self.rsvp_session_port);
        set(&mut rsvp.hop_addr, self.rsvp_hop_addr);
        set(&mut rsvp.hop_iface, self.rsvp_hop_iface);
        set(&mut rsvp.time_refresh, self.rsvp_time_refresh);
        set(&mut rsvp.error_addr, self.rsvp_error_addr);
        set(&mut rsvp.error_flags, self.rsvp_error_flags);
        set(&mut rsvp.error_code, self.rsvp_error_code);
        set(&mut rsvp.error_value, self.rsvp_error_value);
        set(&mut rsvp.scope, self.rsvp_scope);
        set_list(&mut rsvp.scope_addresses, &self.rsvp_scope_addresses);
        set(&mut rsvp.style_opt, self.rsvp_style_opt);
        set(&mut rsvp.sender_addr, self.rsvp_sender_addr);
        set(&mut rsvp.sender_port, self.rsvp_sender_port);
        set(&mut rsvp.tspec, self.rsvp_tspec);
        set(&mut rsvp.tspec_r, self.rsvp_tspec_r);
        set(&mut rsvp.tspec_b, self.rsvp_tspec_b);
        set(&mut rsvp.tspec_p, self.rsvp_tspec_p);
        set(&mut rsvp.tspec_m, self.rsvp_tspec_m);
        set(&mut rsvp.tspec_max, self.rsvp_tspec_max);
        set(&mut rsvp.adspec_hop, self.rsvp_adspec_hop);
        set(&mut rsvp.adspec_path, self.rsvp_adspec_path);
        set(&mut rsvp.adspec_minimum, self.rsvp_adspec_minimum);
        set(&mut rsvp.adspec_mtu, self.rsvp_adspec_mtu);
        set(&mut rsvp.adspec, self.rsvp_adspec);
        set(&mut rsvp.adspec_ctot, self.rsvp_adspec_ctot);
        set(&mut rsvp.adspec_dtot, self.rsvp_adspec_dtot);
        set(&mut rsvp.adspec_csum, self.rsvp_adspec_csum);
        set(&mut rsvp.adspec_dsum, self.rsvp_adspec_dsum);
        set(&mut rsvp.confirm_addr, self.rsvp_confirm_addr);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "IPSEC options")]
pub struct IpsecArgs {
    /// AH payload length in 32-bit words
    #[arg(long = "ah-length")]
    pub ah_length: Option<u8>,

    #[arg(long = "ah-spi")]
    pub ah_spi: Option<u32>,

    #[arg(long = "ah-sequence")]
    pub ah_sequence: Option<u32>,

    #[arg(long = "esp-spi")]
    pub esp_spi: Option<u32>,

    #[arg(long = "esp-sequence")]
    pub esp_sequence: Option<u32>,
}

impl IpsecArgs {
    fn apply(&self, config: &mut Config) {
        let ipsec = &mut config.ipsec;
        set(&mut ipsec.ah_length, self.ah_length);
        set(&mut ipsec.ah_spi, self.ah_spi);
        set(&mut ipsec.ah_sequence, self.ah_sequence);
        set(&mut ipsec.esp_spi, self.esp_spi);
        set(&mut ipsec.esp_sequence, self.esp_sequence);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "EIGRP options")]
pub struct EigrpArgs {
    #[arg(long = "eigrp-opcode")]
    pub eigrp_opcode: Option<u8>,

    #[arg(long = "eigrp-flags", value_parser = number::<u32>)]
    pub eigrp_flags: Option<u32>,

    #[arg(long = "eigrp-sequence")]
    pub eigrp_sequence: Option<u32>,

    #[arg(long = "eigrp-acknowledge")]
    pub eigrp_acknowledge: Option<u32>,

    #[arg(long = "eigrp-as")]
    pub eigrp_autonomous_system: Option<u16>,

    /// Route TLV type (0x0102 internal, 0x0103 external)
    #[arg(long = "eigrp-type", value_parser = number::<u16>)]
    pub eigrp_route_type: Option<u16>,

    /// TLV length override
    #[arg(long = "eigrp-length")]
    pub eigrp_length: Option<u16>,

    #[arg(long = "eigrp-k1")]
    pub eigrp_k1: Option<u8>,

    #[arg(long = "eigrp-k2")]
    pub eigrp_k2: Option<u8>,

    #[arg(long = "eigrp-k3")]
    pub eigrp_k3: Option<u8>,

    #[arg(long = "eigrp-k4")]
    pub eigrp_k4: Option<u8>,

    #[arg(long = "eigrp-k5")]
    pub eigrp_k5: Option<u8>,

    #[arg(long = "eigrp-hold")]
    pub eigrp_hold: Option<u16>,

    #[arg(long = "eigrp-ios-ver-major")]
    pub eigrp_ios_major: Option<u8>,

    #[arg(long = "eigrp-ios-ver-minor")]
    pub eigrp_ios_minor: Option<u8>,

    #[arg(long = "eigrp-rel-ver-major")]
    pub eigrp_ver_major: Option<u8>,

    #[arg(long = "eigrp-rel-ver-minor")]
    pub eigrp_ver_minor: Option<u8>,

    #[arg(long = "eigrp-next-hop", value_name = "ADDR")]
    pub eigrp_next_hop: Option<Ipv4Addr>,

    #[arg(long = "eigrp-delay")]
    pub eigrp_delay: Option<u32>,

    #[arg(long = "eigrp-bandwidth")]
    pub eigrp_bandwidth: Option<u32>,

    #[arg(long = "eigrp-mtu")]
    pub eigrp_mtu: Option<u32>,

    #[arg(long = "eigrp-hop-count")]
    pub eigrp_hop_count: Option<u8>,

    #[arg(long = "eigrp-load")]
    pub eigrp_load: Option<u8>,

    #[arg(long = "eigrp-reliability")]
    pub eigrp_reliability: Option<u8>,

    /// Destination prefix length
    #[arg(long = "eigrp-prefix")]
    pub eigrp_prefix: Option<u8>,

    #[arg(long = "eigrp-destination", value_name = "ADDR")]
    pub eigrp_destination: Option<Ipv4Addr>,

    #[arg(long = "eigrp-source-router", value_name = "ADDR")]
    pub eigrp_src_router: Option<Ipv4Addr>,

    #[arg(long = "eigrp-source-as")]
    pub eigrp_src_as: Option<u32>,

    #[arg(long = "eigrp-tag")]
    pub eigrp_tag: Option<u32>,

    #[arg(long = "eigrp-proto-metric")]
    pub eigrp_proto_metric: Option<u32>,

    #[arg(long = "eigrp-proto-id")]
    pub eigrp_proto_id: Option<u8>,

    #[arg(long = "eigrp-ext-flags", value_parser = number::<u8>)]
    pub eigrp_ext_flags: Option<u8>,

    /// MD5 authentication TLV
    #[arg(long = "eigrp-authentication")]
    pub eigrp_auth: bool,

    #[arg(long = "eigrp-key-id")]
    pub eigrp_key_id: Option<u32>,
}

impl EigrpArgs {
    fn apply(&self, config: &mut Config) {
        let eigrp = &mut config.eigrp;
        set(&mut eigrp.opcode, self.eigrp_opcode);
        set(&mut eigrp.flags, self.eigrp_flags);
        set(&mut eigrp.sequence, self.eigrp_sequence);
        set(&mut eigrp.acknowledge, self.eigrp_acknowledge);
        set(&mut eigrp.autonomous_system, self.eigrp_autonomous_system);
        set(&mut eigrp.route_type, self.eigrp_route_type);
        set(&mut eigrp.length, self.eigrp_length);
        set(&mut eigrp.k1, self.eigrp_k1);
        set(&mut eigrp.k2, self.eigrp_k2);
        set(&mut eigrp.k3, self.eigrp_k3);
        set(&mut eigrp.k4, self.eigrp_k4);
        set(&mut eigrp.k5, self.eigrp_k5);
        set(&mut eigrp.hold, self.eigrp_hold);
        set(&mut eigrp.ios_major, self.eigrp_ios_major);
        set(&mut eigrp.ios_minor, self.eigrp_ios_minor);
        set(&mut eigrp.ver_major, self.eigrp_ver_major);
        set(&mut eigrp.ver_minor, self.eigrp_ver_minor);
        set(&mut eigrp.next_hop, self.eigrp_next_hop);
        set(&mut eigrp.delay, self.eigrp_delay);
        set(&mut eigrp.bandwidth, self.eigrp_bandwidth);
        set(&mut eigrp.mtu, self.eigrp_mtu);
        set(&mut eigrp.hop_count, self.eigrp_hop_count);
        set(&mut eigrp.load, self.eigrp_load);
        set(&mut eigrp.reliability, self.eigrp_reliability);
        set(&mut eigrp.prefix, self.eigrp_prefix);
        set(&mut eigrp.destination, self.eigrp_destination);
        set(&mut eigrp.src_router, self.eigrp_src_router);
        set(&mut eigrp.src_as, self.eigrp_src_as);
        set(&mut eigrp.tag, self.eigrp_tag);
        set(&mut eigrp.proto_metric, self.eigrp_proto_metric);
        set(&mut eigrp.proto_id, self.eigrp_proto_id);
        set(&mut eigrp.ext_flags, self.eigrp_ext_flags);
        eigrp.auth |= self.eigrp_auth;
        set(&mut eigrp.key_id, self.eigrp_key_id);
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "OSPF options")]
pub struct OspfArgs {
    #[arg(long = "ospf-type")]
    pub ospf_packet_type: Option<u8>,

    /// Packet length override
    #[arg(long = "ospf-length")]
    pub ospf_length: Option<u16>,

    #[arg(long = "ospf-router-id", value_name = "ADDR")]
    pub ospf_router_id: Option<Ipv4Addr>,

    #[arg(long = "ospf-area-id", value_name = "ADDR", conflicts_with = "ospf_backbone")]
    pub ospf_area_id: Option<Ipv4Addr>,

    /// Use the backbone area 0.0.0.0
    #[arg(long = "ospf-backbone")]
    pub ospf_backbone: bool,

    /// Options byte (MT, E, MC, NP, L, DC, O, DN)
    #[arg(long = "ospf-options", value_parser = number::<u8>)]
    pub ospf_options: Option<u8>,

    /// Append an LLS data block (sets the L option)
    #[arg(long = "ospf-lls")]
    pub ospf_lls: bool,

    #[arg(long = "ospf-netmask", value_name = "ADDR")]
    pub ospf_netmask: Option<Ipv4Addr>,

    #[arg(long = "ospf-hello-interval")]
    pub ospf_hello_interval: Option<u16>,

    #[arg(long = "ospf-hello-priority")]
    pub ospf_hello_priority: Option<u8>,

    #[arg(long = "ospf-hello-dead")]
    pub ospf_hello_dead: Option<u32>,

    #[arg(long = "ospf-hello-design", value_name = "ADDR")]
    pub ospf_hello_design: Option<Ipv4Addr>,

    #[arg(long = "ospf-hello-backup", value_name = "ADDR")]
    pub ospf_hello_backup: Option<Ipv4Addr>,

    /// Number of HELLO neighbors
    #[arg(long = "ospf-neighbor")]
    pub ospf_neighbors: Option<u8>,

    /// Neighbor addresses, comma separated
    #[arg(long = "ospf-address", value_name = "ADDR", value_delimiter = ',')]
    pub ospf_neighbor_addresses: Vec<Ipv4Addr>,

    #[arg(long = "ospf-dd-mtu")]
    pub ospf_dd_mtu: Option<u16>,

    /// DD flags (MS, M, I, R)
    #[arg(long = "ospf-dd-dbdesc", value_parser = number::<u8>)]
    pub ospf_dd_dbdesc: Option<u8>,

    #[arg(long = "ospf-dd-sequence")]
    pub ospf_dd_sequence: Option<u32>,

    /// Include an LSA header in DD packets
    #[arg(long = "ospf-dd-include-lsa")]
    pub ospf_dd_include_lsa: bool,

    #[arg(long = "ospf-lsa-age")]
    pub ospf_lsa_age: Option<u16>,

    #[arg(long = "ospf-lsa-do-not-age")]
    pub ospf_lsa_do_not_age: bool,

    #[arg(long = "ospf-lsa-type")]
    pub ospf_lsa_type: Option<u8>,

    #[arg(long = "ospf-lsa-id", value_name = "ADDR")]
    pub ospf_lsa_id: Option<Ipv4Addr>,

    #[arg(long = "ospf-lsa-router", value_name = "ADDR")]
    pub ospf_lsa_router: Option<Ipv4Addr>,

    #[arg(long = "ospf-lsa-sequence")]
    pub ospf_lsa_sequence: Option<u32>,

    #[arg(long = "ospf-lsa-metric")]
    pub ospf_lsa_metric: Option<u32>,

    /// Router-LSA flags (B, E, V, W, NT)
    #[arg(long = "ospf-lsa-flags", value_parser = number::<u8>)]
    pub ospf_lsa_flags: Option<u8>,

    #[arg(long = "ospf-lsa-link-id", value_name = "ADDR")]
    pub ospf_lsa_link_id: Option<Ipv4Addr>,

    #[arg(long = "ospf-lsa-link-data", value_name = "ADDR")]
    pub ospf_lsa_link_data: Option<Ipv4Addr>,

    #[arg(long = "ospf-lsa-link-type")]
    pub ospf_lsa_link_type: Option<u8>,

    #[arg(long = "ospf-lsa-attached", value_name = "ADDR")]
    pub ospf_lsa_attached: Option<Ipv4Addr>,

    /// External metric type 2
    #[arg(long = "ospf-lsa-larger")]
    pub ospf_lsa_larger: bool,

    #[arg(long = "ospf-lsa-forward", value_name = "ADDR")]
    pub ospf_lsa_forward: Option<Ipv4Addr>,

    #[arg(long = "ospf-lsa-external", value_name = "ADDR")]
    pub ospf_lsa_external: Option<Ipv4Addr>,

    #[arg(long = "ospf-vertex-type")]
    pub ospf_vertex_type: Option<u32>,

    #[arg(long = "ospf-vertex-id", value_name = "ADDR")]
    pub ospf_vertex_id: Option<Ipv4Addr>,

    /// LLS Extended Options bits (LR, RS)
    #[arg(long = "ospf-lls-options", value_parser = number::<u32>)]
    pub ospf_lls_options: Option<u32>,

    /// Cryptographic authentication
    #[arg(long = "ospf-authentication")]
    pub ospf_auth: bool,

    #[arg(long = "ospf-key-id")]
    pub ospf_key_id: Option<u8>,

    #[arg(long = "ospf-sequence")]
    pub ospf_sequence: Option<u32>,
}

impl OspfArgs {
    fn apply(&self, config: &mut Config) {
        let ospf = &mut config.ospf;
        set(&mut ospf.packet_type, self.ospf_packet_type);
        set(&mut ospf.length, self.ospf_length);
        set(&mut ospf.router_id, self.ospf_router_id);
        if self.ospf_backbone {
            ospf.area_id = Some(Ipv4Addr::UNSPECIFIED);
        } else if self.ospf_area_id.is_some() {
            ospf.area_id = self.ospf_area_id;
        }
        set(&mut ospf.options, self.ospf_options);
        if self.ospf_lls {
            ospf.options |= OspfOptions::OPTION_L;
        }
        set(&mut ospf.netmask, self.ospf_netmask);
        set(&mut ospf.hello_interval, self.ospf_hello_interval);
        set(&mut ospf.hello_priority, self.ospf_hello_priority);
        set(&mut ospf.hello_dead, self.ospf_hello_dead);
        set(&mut ospf.hello_design, self.ospf_hello_design);
        set(&mut ospf.hello_backup, self.ospf_hello_backup);
        set(&mut ospf.neighbors, self.ospf_neighbors);
        set_list(&mut ospf.neighbor_addresses, &self.ospf_neighbor_addresses);
        set(&mut ospf.dd_mtu, self.ospf_dd_mtu);
        set(&mut ospf.dd_dbdesc, self.ospf_dd_dbdesc);
        set(&mut ospf.dd_sequence, self.ospf_dd_sequence);
        ospf.dd_include_lsa |= self.ospf_dd_include_lsa;
        set(&mut ospf.lsa_age, self.ospf_lsa_age);
        ospf.lsa_do_not_age |= self.ospf_lsa_do_not_age;
        set(&mut ospf.lsa_type, self.ospf_lsa_type);
        set(&mut ospf.lsa_id, self.ospf_lsa_id);
        set(&mut ospf.lsa_router, self.ospf_lsa_router);
        set(&mut ospf.lsa_sequence, self.ospf_lsa_sequence);
        set(&mut ospf.lsa_metric, self.ospf_lsa_metric);
        set(&mut ospf.lsa_flags, self.ospf_lsa_flags);
        set(&mut ospf.lsa_link_id, self.ospf_lsa_link_id);
        set(&mut ospf.lsa_link_data, self.ospf_lsa_link_data);
        set(&mut ospf.lsa_link_type, self.ospf_lsa_link_type);
        set(&mut ospf.lsa_attached, self.ospf_lsa_attached);
        ospf.lsa_larger |= self.ospf_lsa_larger;
        set(&mut ospf.lsa_forward, self.ospf_lsa_forward);
        set(&mut ospf.lsa_external, self.ospf_lsa_external);
        set(&mut ospf.vertex_type, self.ospf_vertex_type);
        set(&mut ospf.vertex_id, self.ospf_vertex_id);
        set(&mut ospf.lls_options, self.ospf_lls_options);
        ospf.auth |= self.ospf_auth;
        set(&mut ospf.key_id, self.ospf_key_id);
        set(&mut ospf.sequence, self.ospf_sequence);
    }
}

/// Split `host[/bits]`; the prefix defaults to 32.
pub fn parse_target(target: &str) -> Result<(&str, u8)> {
    match target.split_once('/') {
        None => Ok((target, 32)),
        Some((host, bits)) => {
            let bits = bits
                .parse::<u8>()
                .ok()
                .filter(|bits| *bits <= 32)
                .ok_or_else(|| {
                    Error::invalid_config("bits", format!("'{bits}' is not a prefix length 0-32"))
                })?;
            Ok((host, bits))
        }
    }
}

/// Resolve a dotted quad or host name to its first IPv4 address.
pub fn resolve_ipv4(host: &str) -> Result<Ipv4Addr> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    (host, 0)
        .to_socket_addrs()
        .map_err(|_| Error::Resolve(host.to_string()))?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| Error::Resolve(host.to_string()))
}

/// Map a protocol name to a selection; `T50` (any case) means mixed mode.
pub fn parse_selection(name: Option<&str>) -> ProtocolSelection {
    match name {
        Some(name) if name.eq_ignore_ascii_case(MIXED_PROTOCOL) => ProtocolSelection::Mixed,
        Some(name) => ProtocolSelection::Single(name.to_string()),
        None => ProtocolSelection::default(),
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the run configuration, resolving the target.
    ///
    /// The result still has to pass [`Config::validate`].
    pub fn into_config(self) -> Result<Config> {
        let target = self
            .target
            .as_deref()
            .ok_or_else(|| Error::invalid_config("target", "need a target address"))?;
        let (host, bits) = parse_target(target)?;

        let mut config = Config {
            target: resolve_ipv4(host)?,
            bits,
            flood: self.flood,
            threads: self.threads,
            bogus_checksum: self.bogus_checksum,
            encapsulated: self.encapsulated,
            selection: parse_selection(self.protocol.as_deref()),
            ..Config::default()
        };
        set(&mut config.threshold, self.threshold);
        set(&mut config.source_port, self.source_port);
        set(&mut config.dest_port, self.dest_port);

        self.ip.apply(&mut config);
        self.gre.apply(&mut config);
        self.icmp.apply(&mut config);
        self.igmp.apply(&mut config);
        self.tcp.apply(&mut config);
        self.egp.apply(&mut config);
        self.rip.apply(&mut config);
        self.dccp.apply(&mut config);
        self.rsvp.apply(&mut config);
        self.ipsec.apply(&mut config);
        self.eigrp.apply(&mut config);
        self.ospf.apply(&mut config);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["rawmix"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into_config().unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("192.0.2.1").unwrap(), ("192.0.2.1", 32));
        assert_eq!(parse_target("10.0.0.0/8").unwrap(), ("10.0.0.0", 8));
        assert_eq!(parse_target("10.0.0.0/0").unwrap(), ("10.0.0.0", 0));
        assert!(parse_target("10.0.0.0/33").is_err());
        assert!(parse_target("10.0.0.0/x").is_err());
    }

    #[test]
    fn test_resolve_literal() {
        assert_eq!(
            resolve_ipv4("198.51.100.4").unwrap(),
            Ipv4Addr::new(198, 51, 100, 4)
        );
        assert!(matches!(
            resolve_ipv4("no-such-host.invalid"),
            Err(Error::Resolve(_))
        ));
    }

    #[test]
    fn test_number_parser() {
        assert_eq!(number::<u8>("0x12"), Ok(0x12));
        assert_eq!(number::<u8>("18"), Ok(18));
        assert!(number::<u8>("0x100").is_err());
        assert!(number::<u16>("nope").is_err());
    }

    #[test]
    fn test_defaults_survive() {
        let config = config(&["192.0.2.1"]);
        assert_eq!(config.target, Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(config.bits, 32);
        assert_eq!(config.threshold, 1000);
        assert_eq!(config.ip.ttl, 255);
        assert_eq!(config.selection, ProtocolSelection::Single("TCP".into()));
        assert_eq!(config.rsvp.time_refresh, 360);
    }

    #[test]
    fn test_common_flags() {
        let config = config(&[
            "10.1.0.0/16",
            "--threshold",
            "50",
            "--threads",
            "5",
            "--protocol",
            "t50",
            "-B",
            "--encapsulated",
            "--gre-key-present",
            "--gre-key",
            "7",
            "--saddr",
            "10.9.9.9",
            "--ttl",
            "64",
            "--dport",
            "80",
        ]);
        assert_eq!(config.bits, 16);
        assert_eq!(config.threshold, 50);
        assert_eq!(config.threads, 5);
        assert_eq!(config.selection, ProtocolSelection::Mixed);
        assert!(config.bogus_checksum);
        assert!(config.encapsulated);
        assert!(config.gre.flags.contains(GreFlags::KEY));
        assert_eq!(config.gre.key, 7);
        assert_eq!(config.ip.source, Ipv4Addr::new(10, 9, 9, 9));
        assert_eq!(config.ip.ttl, 64);
        assert_eq!(config.dest_port, 80);
    }

    #[test]
    fn test_tcp_options_enable_themselves() {
        let config = config(&["192.0.2.1", "-S", "-A", "--mss", "1460", "--tsval", "5", "--nop"]);
        let tcp = &config.tcp;
        assert!(tcp.flags.syn && tcp.flags.ack && !tcp.flags.fin);
        assert!(tcp.options.contains(TcpOptionSet::MSS));
        assert!(tcp.options.contains(TcpOptionSet::TSOPT));
        assert!(!tcp.options.contains(TcpOptionSet::WSOPT));
        assert_eq!(tcp.mss, 1460);
        assert_eq!(tcp.tsval, 5);
        assert!(tcp.nop);
    }

    #[test]
    fn test_conflicting_tcp_options_rejected() {
        assert!(Cli::try_parse_from([
            "rawmix",
            "192.0.2.1",
            "--sack-ok",
            "--sack-left",
            "1"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "rawmix",
            "192.0.2.1",
            "--md5-signature",
            "--authentication"
        ])
        .is_err());
    }

    #[test]
    fn test_protocol_specific_flags() {
        let config = config(&[
            "192.0.2.1",
            "--ospf-backbone",
            "--ospf-lls",
            "--ospf-address",
            "10.0.0.1,10.0.0.2",
            "--igmp-address",
            "10.1.1.1",
            "--eigrp-type",
            "0x0103",
            "--rip-authentication",
        ]);
        assert_eq!(config.ospf.area_id, Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.ospf.options & OspfOptions::OPTION_L, OspfOptions::OPTION_L);
        assert_eq!(config.ospf.neighbor_addresses.len(), 2);
        assert_eq!(config.igmp.addresses, vec![Ipv4Addr::new(10, 1, 1, 1)]);
        assert_eq!(config.eigrp.route_type, 0x0103);
        assert!(config.rip.auth);
    }

    #[test]
    fn test_list_protocols_needs_no_target() {
        let cli = Cli::try_parse_from(["rawmix", "--list-protocols"]).unwrap();
        assert!(cli.list_protocols);
        assert!(cli.target.is_none());
        assert!(Cli::try_parse_from(["rawmix"]).is_err());
    }
}
