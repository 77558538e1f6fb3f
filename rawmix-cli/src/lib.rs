//! CLI interface for rawmix
//!
//! This crate provides the command-line interface for rawmix: argument
//! parsing, target resolution and the protocol listing.

pub mod args;

pub use args::{parse_selection, parse_target, resolve_ipv4, Cli, MIXED_PROTOCOL};

use rawmix_protocols::ModuleRegistry;
use std::fmt::Write;

/// Registry listing printed by `--list-protocols`
pub fn protocol_listing(registry: &ModuleRegistry) -> String {
    let mut out = String::new();
    for (index, module) in registry.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:2} {:<8} {}",
            index, module.acronym, module.description
        );
    }
    let _ = writeln!(out, "     {:<8} all of the above, in order", MIXED_PROTOCOL);
    out
}
