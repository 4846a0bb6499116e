use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use fs_err::File;

use crate::errors::{Handle, Result};

// Represents any settings for the shell, most of which can be configured by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    // Whether to prefix error messages with the category of the error
    pub show_errors: bool,
    // Whether to show the prompt tick on a new line
    pub multi_line_prompt: bool,
    // The prompt shown while reading the rest of an incomplete line
    pub continuation_prompt: String,
    // How many lines to keep in the command history
    pub history_limit: Option<usize>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            show_errors: false,
            multi_line_prompt: false,
            continuation_prompt: "> ".to_owned(),
            history_limit: None,
        }
    }
}

impl Configuration {
    /// Location of the configuration file when none is given on the command line
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(".config").join("shoal").join("config.shoal")
    }

    // Scans a configuration file for settings and updates the configuration accordingly
    pub fn from_file(filename: &Path) -> Result<Self> {
        let file = File::open(filename)
            .replace_err(|| state_err!(FailedToOpenConfigFile(filename.to_path_buf())))?;
        let reader = BufReader::new(file);

        let mut config = Self::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line.replace_err_with_msg(
                || state_err!(FailedToReadConfigFile(filename.to_path_buf())),
                &format!(
                    "Configuration file {} is not valid UTF-8 text",
                    filename.display()
                ),
            )?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once(':')
                .replace_err(|| state_err!(MalformedConfigLine(index + 1, line.to_owned())))?;
            config.apply(key.trim(), value.trim())?;
        }

        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || state_err!(InvalidConfigValue(key.to_owned(), value.to_owned()));

        match key {
            "show-errors" => self.show_errors = value.parse::<bool>().replace_err(invalid)?,
            "multi-line-prompt" => {
                self.multi_line_prompt = value.parse::<bool>().replace_err(invalid)?
            }
            "continuation-prompt" => {
                // Keep a trailing space when the value is quoted, e.g. "... "
                self.continuation_prompt = value.trim_matches('"').to_owned();
            }
            "history-limit" => {
                self.history_limit = match value {
                    "false" => None,
                    _ => Some(value.parse::<usize>().replace_err(invalid)?),
                }
            }
            _ => return Err(state_err!(UnknownConfigKey(key.to_owned()))),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_from(contents: &str) -> Result<Configuration> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Configuration::from_file(file.path())
    }

    #[test]
    fn test_reads_every_key() {
        let config = config_from(
            "# shoal settings\n\
             show-errors: true\n\
             multi-line-prompt: true\n\
             continuation-prompt: \"... \"\n\
             \n\
             history-limit: 20\n",
        )
        .unwrap();

        assert!(config.show_errors);
        assert!(config.multi_line_prompt);
        assert_eq!(config.continuation_prompt, "... ");
        assert_eq!(config.history_limit, Some(20));
    }

    #[test]
    fn test_history_limit_can_be_disabled() {
        let config = config_from("history-limit: false\n").unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(config_from("colour: blue\n").is_err());
        assert!(config_from("show-errors: sometimes\n").is_err());
        assert!(config_from("no separator here\n").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Configuration::from_file(Path::new("/nonexistent/shoal/config"));
        assert!(result.is_err());
    }
}
