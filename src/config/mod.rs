pub mod project;
pub mod server;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(
    name = "rizza",
    version,
    about = "Brute force testing framework for REST API entities",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate and run brute force test tasks against the target server
    Brute(BruteArgs),
    /// Manage saved target server configurations
    Config(ConfigArgs),
    /// Show known entities, fields, methods, and input generators
    List(ListArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Args)]
pub struct BruteArgs {
    /// The name of the entity(s) you want to test (Product; All)
    #[arg(short, long, num_args = 1..)]
    pub entities: Option<Vec<String>>,

    /// The file path to write the test tasks to (export only, no run)
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// The file path to previously exported test tasks
    #[arg(short, long)]
    pub import_path: Option<String>,

    /// The file path to write test results to ('stdout' prints them)
    #[arg(short, long)]
    pub log_path: Option<String>,

    /// The maximum number of entity fields to use
    #[arg(long)]
    pub max_fields: Option<usize>,

    /// The maximum number of input methods to use
    #[arg(long)]
    pub max_inputs: Option<usize>,

    /// One or more fields to exclude from brute force testing (e.g. 'label id')
    #[arg(long, num_args = 1..)]
    pub field_exclude: Option<Vec<String>>,

    /// One or more methods to exclude from brute force testing (e.g. 'search read')
    #[arg(long, num_args = 1..)]
    pub method_exclude: Option<Vec<String>>,

    /// JSON file with a custom entity catalog
    #[arg(long)]
    pub entity_file: Option<String>,

    /// The saved server configuration label to use
    #[arg(long)]
    pub label: Option<String>,

    /// The server configuration file path to use
    #[arg(long)]
    pub config_path: Option<String>,

    /// Log system resource usage during the run
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl Validate for BruteArgs {
    fn validate(&self) -> Result<()> {
        if self.import_path.is_none() {
            let entities = validate_required_field("entities", &self.entities)?;
            for entity in entities {
                validate_non_empty_string("entities", entity)?;
            }
        }

        if let Some(max_fields) = self.max_fields {
            validate_positive_number("max_fields", max_fields, 1)?;
        }
        if let Some(max_inputs) = self.max_inputs {
            validate_positive_number("max_inputs", max_inputs, 1)?;
        }

        if let Some(output_path) = &self.output_path {
            validate_path("output_path", output_path)?;
        }
        if let Some(log_path) = &self.log_path {
            validate_path("log_path", log_path)?;
        }
        if let Some(entity_file) = &self.entity_file {
            validate_file_extensions("entity_file", std::slice::from_ref(entity_file), &["json"])?;
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Username
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password
    #[arg(short, long)]
    pub password: Option<String>,

    /// The target server's URL (https://server.domain.com)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Enable SSL verification (default: disabled)
    #[arg(long)]
    pub verify: bool,

    /// The configuration label to use
    #[arg(long, default_value = "default")]
    pub label: String,

    /// The configuration file path to use
    #[arg(long)]
    pub path: Option<String>,

    /// Clear existing configuration
    #[arg(long)]
    pub clear: bool,

    /// Show existing configuration
    #[arg(long)]
    pub show: bool,
}

#[cfg(feature = "cli")]
impl Validate for ConfigArgs {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("label", &self.label)?;
        if let Some(target) = &self.target {
            validate_url("target", target)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub kind: ListKind,

    /// Entity name (required for fields and methods)
    #[arg(short, long)]
    pub entity: Option<String>,

    /// JSON file with a custom entity catalog
    #[arg(long)]
    pub entity_file: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Entities,
    Fields,
    Methods,
    Inputs,
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brute_args() {
        let cli = Cli::try_parse_from([
            "rizza", "brute", "-e", "Product", "Organization", "--max-fields", "2",
        ])
        .unwrap();

        match cli.command {
            Command::Brute(args) => {
                assert_eq!(
                    args.entities,
                    Some(vec!["Product".to_string(), "Organization".to_string()])
                );
                assert_eq!(args.max_fields, Some(2));
                assert!(args.validate().is_ok());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_brute_requires_entities_without_import() {
        let cli = Cli::try_parse_from(["rizza", "brute", "--max-fields", "2"]).unwrap();
        match cli.command {
            Command::Brute(args) => assert!(args.validate().is_err()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_brute_import_path_lifts_entity_requirement() {
        let cli = Cli::try_parse_from(["rizza", "brute", "-i", "tasks.json"]).unwrap();
        match cli.command {
            Command::Brute(args) => assert!(args.validate().is_ok()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_rejects_bad_target_url() {
        let cli = Cli::try_parse_from(["rizza", "config", "-t", "not-a-url"]).unwrap();
        match cli.command {
            Command::Config(args) => assert!(args.validate().is_err()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_arguments_is_an_error() {
        assert!(Cli::try_parse_from(["rizza"]).is_err());
    }
}
