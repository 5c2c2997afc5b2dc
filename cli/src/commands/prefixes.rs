use colored::*;
use sshsweep_common::config::Config;
use sshsweep_common::network::interface::{PrefixSuggestion, local_prefixes};
use sshsweep_common::warn;

use crate::terminal::{colors, print};

pub fn prefixes(cfg: &Config) {
    print::header("local networks", cfg.quiet);

    let suggestions = local_prefixes();
    if suggestions.is_empty() {
        warn!("No usable IPv4 address found on any interface");
        return;
    }

    for (idx, suggestion) in suggestions.iter().enumerate() {
        print::print(&format_suggestion(idx + 1, suggestion, cfg.quiet));
    }
}

fn format_suggestion(idx: usize, suggestion: &PrefixSuggestion, q_level: u8) -> String {
    if q_level > 1 {
        return suggestion.prefix.to_string();
    }
    format!(
        "{} {} {}",
        format!("[{}]", idx.to_string().color(colors::ACCENT)).color(colors::SEPARATOR),
        suggestion.prefix.cidr().color(colors::IPV4_ADDR),
        format!("({})", suggestion.interface).color(colors::TEXT_DEFAULT)
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
