use clap::{Parser, ValueEnum};

/// Command line surface of the scraper.
#[derive(Debug, Parser)]
#[command(name = "docscrape", version, about = "Python documentation scraper")]
pub struct Cli {
    /// What to scrape.
    #[arg(value_enum)]
    pub mode: Mode,

    /// Extra ways to render the results.
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Wipe the page cache before running.
    #[arg(short, long)]
    pub clear_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Articles about what's new in each Python version.
    WhatsNew,
    /// Documentation links and statuses per Python version.
    LatestVersions,
    /// Fetch the pdf-a4 documentation archive.
    Download,
    /// Reconcile PEP card statuses against their own pages.
    Pep,
}

impl Mode {
    /// Kebab-case name as typed on the command line; also used in result
    /// file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Aligned ASCII table on stdout.
    Pretty,
    /// CSV file under the results directory.
    File,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mode_names_match_the_command_line() {
        assert_eq!(Mode::WhatsNew.as_str(), "whats-new");
        assert_eq!(Mode::LatestVersions.as_str(), "latest-versions");
        assert_eq!(Mode::Download.as_str(), "download");
        assert_eq!(Mode::Pep.as_str(), "pep");
    }
}
