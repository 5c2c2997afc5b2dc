//! Result file and the live sink feeding it.

use std::fs::File;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Local};
use sshsweep_common::network::prefix::SubnetPrefix;
use sshsweep_common::{success, warn};
use sshsweep_core::HostSink;
use tracing::Span;

use crate::terminal::print::TIME_FORMAT;
use crate::terminal::progress;

const RULE: &str = "=================================";

/// `ssh_available_A_B_C.txt`
pub fn file_name(prefix: SubnetPrefix) -> String {
    format!("ssh_available_{}.txt", prefix.file_stem())
}

pub fn write_header<W: Write>(
    out: &mut W,
    prefix: SubnetPrefix,
    started: &DateTime<Local>,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "        SSH available hosts")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Scan started : {}", started.format(TIME_FORMAT))?;
    writeln!(out, "Network      : {}", prefix.cidr())?;
    writeln!(out, "{RULE}")?;
    writeln!(out)
}

pub fn write_footer<W: Write>(
    out: &mut W,
    found: usize,
    finished: &DateTime<Local>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Scan finished: {}", finished.format(TIME_FORMAT))?;
    writeln!(out, "Hosts found  : {found}")?;
    writeln!(out, "{RULE}")
}

/// Text file listing responsive hosts, one per line, as they are found.
pub struct ResultFile {
    path: PathBuf,
    file: Mutex<File>,
}

impl ResultFile {
    /// Creates (or truncates) the file for `prefix` inside `dir` and writes the header.
    pub fn create(
        dir: &Path,
        prefix: SubnetPrefix,
        started: &DateTime<Local>,
    ) -> anyhow::Result<Self> {
        let path = dir.join(file_name(prefix));
        let mut file = File::create(&path)
            .with_context(|| format!("failed to create result file {}", path.display()))?;
        write_header(&mut file, prefix, started)
            .with_context(|| format!("failed to write to {}", path.display()))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one host line and flushes it so the file is readable mid-scan.
    pub fn append(&self, addr: Ipv4Addr) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("result file lock poisoned"))?;
        writeln!(file, "{addr}")?;
        file.flush()
    }

    /// Writes the footer and closes the file.
    pub fn finish(self, found: usize, finished: &DateTime<Local>) -> anyhow::Result<PathBuf> {
        let mut file = self
            .file
            .into_inner()
            .map_err(|_| anyhow::anyhow!("result file lock poisoned"))?;
        write_footer(&mut file, found, finished)
            .and_then(|_| file.flush())
            .with_context(|| format!("failed to finish {}", self.path.display()))?;
        Ok(self.path)
    }
}

/// Reports hosts as they are found: console line, result file and progress bar.
pub struct LiveReport<'a> {
    file: Option<&'a ResultFile>,
    span: Span,
}

impl<'a> LiveReport<'a> {
    pub fn new(file: Option<&'a ResultFile>, span: Span) -> Self {
        Self { file, span }
    }
}

impl HostSink for LiveReport<'_> {
    fn host_found(&self, addr: Ipv4Addr) {
        success!("SSH service: {addr}");

        if let Some(file) = self.file {
            if let Err(e) = file.append(addr) {
                warn!("Could not record {addr} in {}: {e}", file.path().display());
            }
        }
    }

    fn probe_finished(&self, done: usize, _total: usize) {
        progress::advance(&self.span, done);
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, h, m, s).unwrap()
    }

    #[test]
    fn file_name_uses_underscores() {
        assert_eq!(file_name(SubnetPrefix::new(192, 168, 1)), "ssh_available_192_168_1.txt");
    }

    #[test]
    fn header_layout() {
        let mut out = Vec::new();
        write_header(&mut out, SubnetPrefix::new(10, 0, 0), &at(8, 5, 0)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1].trim(), "SSH available hosts");
        assert_eq!(lines[3], "Scan started : 2024-03-09 08:05:00");
        assert_eq!(lines[4], "Network      : 10.0.0.0/24");
        assert_eq!(lines[5], RULE);
        assert_eq!(lines[6], "");
    }

    #[test]
    fn result_file_should_hold_header_hosts_and_footer() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = SubnetPrefix::new(10, 0, 0);

        let file = ResultFile::create(dir.path(), prefix, &at(9, 0, 0)).unwrap();
        file.append(Ipv4Addr::new(10, 0, 0, 5)).unwrap();
        file.append(Ipv4Addr::new(10, 0, 0, 77)).unwrap();
        let path = file.finish(2, &at(9, 0, 3)).unwrap();

        assert_eq!(path, dir.path().join("ssh_available_10_0_0.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(&lines[7..9], &["10.0.0.5", "10.0.0.77"]);
        assert_eq!(lines[9], "");
        assert_eq!(lines[11], "Scan finished: 2024-03-09 09:00:03");
        assert_eq!(lines[12], "Hosts found  : 2");
        assert_eq!(lines.last(), Some(&RULE));
    }

    #[test]
    fn result_file_should_be_truncated_on_create() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = SubnetPrefix::new(172, 16, 4);
        let stale = dir.path().join(file_name(prefix));
        std::fs::write(&stale, "leftover from an older run\n").unwrap();

        let file = ResultFile::create(dir.path(), prefix, &at(10, 0, 0)).unwrap();
        file.finish(0, &at(10, 0, 1)).unwrap();

        let text = std::fs::read_to_string(&stale).unwrap();
        assert!(!text.contains("leftover"));
        assert!(text.contains("Hosts found  : 0"));
    }

    #[test]
    fn result_file_create_fails_for_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = ResultFile::create(&missing, SubnetPrefix::new(1, 2, 3), &at(0, 0, 0));

        assert!(result.is_err());
    }

    #[test]
    fn live_report_should_append_found_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = SubnetPrefix::new(10, 1, 1);
        let file = ResultFile::create(dir.path(), prefix, &at(11, 0, 0)).unwrap();

        let report = LiveReport::new(Some(&file), Span::none());
        report.host_found(Ipv4Addr::new(10, 1, 1, 20));
        report.probe_finished(1, 254);
        drop(report);

        let path = file.finish(1, &at(11, 0, 1)).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.lines().any(|l| l == "10.1.1.20"));
    }
}
