//! Module registry
//!
//! A fixed, ordered table of protocol modules. Order matters: mixed mode
//! cycles through the table front to back, and the table index doubles as
//! the module's identity.

use crate::builder::BuildFn;
use crate::{dccp, egp, eigrp, icmp, igmp, ipsec, ospf, rip, rsvp, tcp, udp};
use rawmix_core::config::{ProtocolSelection, DEFAULT_PROTOCOL};
use rawmix_core::{Error, Result};
use rawmix_packet::IpProtocol;
use std::fmt;
use tracing::debug;

/// One registered protocol module
pub struct ModuleDescriptor {
    /// Protocol number written into the (inner) IP header
    pub protocol: IpProtocol,
    /// Short name used on the command line
    pub acronym: &'static str,
    pub description: &'static str,
    pub build: BuildFn,
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("protocol", &self.protocol)
            .field("acronym", &self.acronym)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Built-in modules in mixed-mode order
pub static MODULES: [ModuleDescriptor; 13] = [
    ModuleDescriptor {
        protocol: IpProtocol::ICMP,
        acronym: "ICMP",
        description: "Internet Control Message Protocol",
        build: icmp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::IGMP,
        acronym: "IGMPv1",
        description: "Internet Group Message Protocol v1",
        build: igmp::build_v1,
    },
    ModuleDescriptor {
        protocol: IpProtocol::IGMP,
        acronym: "IGMPv3",
        description: "Internet Group Message Protocol v3",
        build: igmp::build_v3,
    },
    ModuleDescriptor {
        protocol: IpProtocol::TCP,
        acronym: "TCP",
        description: "Transmission Control Protocol",
        build: tcp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::EGP,
        acronym: "EGP",
        description: "Exterior Gateway Protocol",
        build: egp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::UDP,
        acronym: "UDP",
        description: "User Datagram Protocol",
        build: udp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::UDP,
        acronym: "RIPv1",
        description: "Routing Information Protocol v1",
        build: rip::build_v1,
    },
    ModuleDescriptor {
        protocol: IpProtocol::UDP,
        acronym: "RIPv2",
        description: "Routing Information Protocol v2",
        build: rip::build_v2,
    },
    ModuleDescriptor {
        protocol: IpProtocol::DCCP,
        acronym: "DCCP",
        description: "Datagram Congestion Control Protocol",
        build: dccp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::RSVP,
        acronym: "RSVP",
        description: "Resource ReSerVation Protocol",
        build: rsvp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::AH,
        acronym: "IPSEC",
        description: "Internet Protocol Security (AH/ESP)",
        build: ipsec::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::EIGRP,
        acronym: "EIGRP",
        description: "Enhanced Interior Gateway Routing Protocol",
        build: eigrp::build,
    },
    ModuleDescriptor {
        protocol: IpProtocol::OSPF,
        acronym: "OSPF",
        description: "Open Shortest Path First",
        build: ospf::build,
    },
];

/// Which modules a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveModules {
    /// One module, by registry index
    Single(usize),
    /// Every module in registry order
    All,
}

/// Read-only view over a module table
#[derive(Debug, Clone, Copy)]
pub struct ModuleRegistry {
    modules: &'static [ModuleDescriptor],
}

impl ModuleRegistry {
    pub const fn new(modules: &'static [ModuleDescriptor]) -> Self {
        Self { modules }
    }

    /// The built-in thirteen modules
    pub fn builtin() -> Self {
        Self::new(&MODULES)
    }

    pub fn count(&self) -> usize {
        self.modules.len()
    }

    pub fn lookup(&self, index: usize) -> Option<&'static ModuleDescriptor> {
        self.modules.get(index)
    }

    /// Case-insensitive lookup by acronym
    pub fn lookup_by_acronym(&self, name: &str) -> Option<(usize, &'static ModuleDescriptor)> {
        self.modules
            .iter()
            .enumerate()
            .find(|(_, module)| module.acronym.eq_ignore_ascii_case(name))
    }

    /// The module used when no protocol is selected
    pub fn default_module(&self) -> Option<(usize, &'static ModuleDescriptor)> {
        self.lookup_by_acronym(DEFAULT_PROTOCOL)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ModuleDescriptor> {
        self.modules.iter()
    }

    /// Turn a protocol selection into registry indices.
    pub fn resolve(&self, selection: &ProtocolSelection) -> Result<ActiveModules> {
        match selection {
            ProtocolSelection::Mixed => {
                debug!(modules = self.count(), "mixed mode selected");
                Ok(ActiveModules::All)
            }
            ProtocolSelection::Single(name) => {
                let (index, module) = self
                    .lookup_by_acronym(name)
                    .ok_or_else(|| Error::UnknownModule(name.clone()))?;
                debug!(index, acronym = module.acronym, "module selected");
                Ok(ActiveModules::Single(index))
            }
        }
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = ModuleRegistry::builtin();
        let acronyms: Vec<_> = registry.iter().map(|module| module.acronym).collect();
        assert_eq!(
            acronyms,
            [
                "ICMP", "IGMPv1", "IGMPv3", "TCP", "EGP", "UDP", "RIPv1", "RIPv2", "DCCP", "RSVP",
                "IPSEC", "EIGRP", "OSPF"
            ]
        );
        assert_eq!(registry.count(), 13);
    }

    #[test]
    fn test_lookup_by_acronym_ignores_case() {
        let registry = ModuleRegistry::builtin();
        let (index, module) = registry.lookup_by_acronym("ripv2").unwrap();
        assert_eq!(index, 7);
        assert_eq!(module.protocol, IpProtocol::UDP);
        assert!(registry.lookup_by_acronym("HTTP").is_none());
    }

    #[test]
    fn test_default_module_is_tcp() {
        let registry = ModuleRegistry::builtin();
        let (index, module) = registry.default_module().unwrap();
        assert_eq!(index, 3);
        assert_eq!(module.protocol, IpProtocol::TCP);
    }

    #[test]
    fn test_lookup_out_of_range() {
        assert!(ModuleRegistry::builtin().lookup(13).is_none());
    }

    #[test]
    fn test_resolve() {
        let registry = ModuleRegistry::builtin();
        assert_eq!(
            registry.resolve(&ProtocolSelection::Mixed).unwrap(),
            ActiveModules::All
        );
        assert_eq!(
            registry
                .resolve(&ProtocolSelection::Single("eigrp".into()))
                .unwrap(),
            ActiveModules::Single(11)
        );
        assert!(matches!(
            registry.resolve(&ProtocolSelection::Single("XYZ".into())),
            Err(Error::UnknownModule(name)) if name == "XYZ"
        ));
    }

    #[test]
    fn test_every_module_builds() {
        use crate::builder::testing::{build_checked, config};

        let config = config();
        for module in ModuleRegistry::builtin().iter() {
            let packet = build_checked(module.build, &config, module.protocol);
            assert!(packet.len() > 20, "{}", module.acronym);
        }
    }
}
