use anyhow::{Context, Result};
use clap::{Arg, ArgMatches};

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Server settings taken from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_path: Option<String>,
    pub bind: String,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            bind: DEFAULT_BIND.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn command() -> clap::Command {
        clap::Command::new("querystring")
            .about("Serves a catalogue whose links are built with query-string transformations")
            .arg(
                Arg::new("catalog")
                    .short('c')
                    .long("catalog")
                    .value_name("CATALOG")
                    .help("Path to a YAML file containing catalogue entries"),
            )
            .arg(
                Arg::new("bind")
                    .short('b')
                    .long("bind")
                    .value_name("ADDR")
                    .help("Address to listen on")
                    .default_value(DEFAULT_BIND),
            )
            .arg(
                Arg::new("page_size")
                    .short('p')
                    .long("page-size")
                    .value_name("N")
                    .help("Entries per catalogue page")
                    .value_parser(clap::value_parser!(usize))
                    .default_value("5"),
            )
    }

    /// Parse the process arguments
    pub fn from_args() -> Result<Self> {
        Self::from_matches(&Self::command().get_matches())
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let catalog_path = matches.get_one::<String>("catalog").cloned();
        let bind = matches
            .get_one::<String>("bind")
            .cloned()
            .context("missing bind address")?;
        let page_size = matches
            .get_one::<usize>("page_size")
            .copied()
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            catalog_path,
            bind,
            page_size,
        })
    }
}
