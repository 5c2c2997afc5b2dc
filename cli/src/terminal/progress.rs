use colored::*;
use indicatif::ProgressStyle;
use sshsweep_common::network::prefix::SubnetPrefix;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Span whose progress bar tracks how many candidates of `prefix` have been resolved.
///
/// The bar is drawn by the indicatif layer while the span is entered.
pub fn scan_span(prefix: SubnetPrefix, total: usize) -> anyhow::Result<Span> {
    let span = info_span!("scan", network = %prefix.cidr());

    let style = ProgressStyle::with_template(
        "{spinner:.blue} {span_fields} {wide_bar:.green/white} {pos}/{len} {msg}",
    )?
    .tick_strings(TICKS)
    .progress_chars("█▉▊▋▌▍▎▏ ");

    span.pb_set_style(&style);
    span.pb_set_length(total as u64);
    span.pb_set_message(&format!("{}", "Ctrl-C stops early".italic().white()));
    Ok(span)
}

/// Moves the bar of `span` to `done` resolved candidates.
pub fn advance(span: &Span, done: usize) {
    span.pb_set_position(done as u64);
}
