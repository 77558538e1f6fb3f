//! Example: Building one packet per module without sending anything
//!
//! Runs every builder in the registry against a documentation address and
//! prints the bytes, so header layouts can be inspected (or fed to a packet
//! decoder) without raw-socket privileges.
//!
//! ```text
//! cargo run -p rawmix-protocols --example dump_packet [ACRONYM]
//! ```

use rawmix_core::Config;
use rawmix_packet::PacketBuffer;
use rawmix_protocols::{BuildContext, ModuleRegistry};
use std::net::Ipv4Addr;

fn main() {
    let destination = Ipv4Addr::new(192, 0, 2, 1);
    let config = Config {
        target: destination,
        ..Config::default()
    };
    let registry = ModuleRegistry::builtin();
    let only = std::env::args().nth(1);

    let mut buffer = PacketBuffer::new();
    for module in registry.iter() {
        if let Some(name) = &only {
            if !module.acronym.eq_ignore_ascii_case(name) {
                continue;
            }
        }

        let ctx = BuildContext::new(&config, module.protocol, destination);
        let len = (module.build)(&ctx, &mut buffer);

        println!("{} ({} bytes)", module.acronym, len);
        for line in buffer.as_slice().chunks(16) {
            println!("  {:02X?}", line);
        }
    }
}
