use std::path::PathBuf;

/// Presentation settings for a run of the tool.
///
/// Scan behaviour (concurrency, timeouts) lives in the core's `ScanSettings`;
/// this only controls what gets printed and written.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hides the start-up banner.
    pub no_banner: bool,
    /// Quiet level. `0` prints everything, `1` drops headers, `2` prints only results.
    pub quiet: u8,
    /// Skips writing the result file.
    pub no_file: bool,
    /// Directory the result file is created in.
    pub output_dir: PathBuf,
    /// Set when the prefix came from the interactive menu.
    ///
    /// The tool then waits for Enter before exiting.
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_banner: false,
            quiet: 0,
            no_file: false,
            output_dir: PathBuf::from("."),
            interactive: false,
        }
    }
}
