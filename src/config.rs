use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_INPUT_EXTENSION};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// What to do with a line that cannot be unpacked into 31 days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Log the line, count it, and keep going with the rest of the file
    #[default]
    Skip,
    /// Fail the whole file; none of its rows reach the output
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessorConfig {
    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,

    #[validate(length(min = 1))]
    pub input_extension: String,

    #[validate(range(min = 1024))]
    pub buffer_size: usize,

    pub malformed_lines: MalformedLinePolicy,

    pub show_progress: bool,
}

impl ProcessorConfig {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            ..Self::default()
        }
    }

    pub fn with_input_extension(mut self, extension: &str) -> Self {
        self.input_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_malformed_lines(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            input_extension: DEFAULT_INPUT_EXTENSION.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            malformed_lines: MalformedLinePolicy::default(),
            show_progress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input_extension, "dly");
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Skip);
    }

    #[test]
    fn test_invalid_config() {
        assert!(ProcessorConfig::new(0).validate().is_err());
        assert!(ProcessorConfig::new(4)
            .with_input_extension("")
            .validate()
            .is_err());
        assert!(ProcessorConfig::new(4)
            .with_buffer_size(16)
            .validate()
            .is_err());
    }

    #[test]
    fn test_extension_dot_is_optional() {
        let config = ProcessorConfig::new(2).with_input_extension(".dly");
        assert_eq!(config.input_extension, "dly");
    }
}
