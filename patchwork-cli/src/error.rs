//! Error handling for PatchWork CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PatchWork CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid input table: {message}")]
    InvalidInput { message: String },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Alignment error: {method} - {message}")]
    Alignment { method: String, message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn missing_argument<S: Into<String>>(name: S) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn alignment<S: Into<String>>(method: S, message: S) -> Self {
        Self::Alignment {
            method: method.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

impl From<patchwork_core::InputError> for CliError {
    fn from(err: patchwork_core::InputError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::MissingArgument { name } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Pass {} on the command line\n\
                 • Or set it in patchwork.toml (see 'patchwork config --example')",
                name
            ));
        }

        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidInput { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • The input table needs SampleID and Fasta columns\n\
                 • SampleID values must be unique\n\
                 • Strand must be '+', '-' or empty\n\
                 • Every Fasta path must point to a readable FASTA file",
            );
        }

        CliError::Alignment { method, .. } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Install {} and ensure it is in your PATH\n\
                 • Or set an explicit binary path in the [alignment] section\n\
                 • Try a different aligner with --aligner",
                method
            ));
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your patchwork.toml configuration file\n\
                 • Use 'patchwork config --example' to generate a sample configuration",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
