use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use nix::unistd::{gethostname, getuid, User};

use crate::errors::{Handle, Result};

/// Represents the shell environment: who is running it, where, and the variables
/// declared during the session.
/// * Variables are stored under their full token (including the leading `$`) and are only
/// * ever replaced, never removed
pub struct Environment {
    user: String,
    host: String,
    home: PathBuf,
    previous_directory: Option<PathBuf>,
    variables: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        let home = env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut environment = Self {
            user: String::new(),
            host: String::new(),
            home,
            previous_directory: None,
            variables: HashMap::new(),
        };
        environment.refresh_identity();

        environment
    }

    /// Re-reads the user and host names, which may change while a session is running
    pub fn refresh_identity(&mut self) {
        self.user = env::var("USER")
            .ok()
            .or_else(|| {
                User::from_uid(getuid())
                    .ok()
                    .flatten()
                    .map(|user| user.name)
            })
            .unwrap_or_else(|| "unknown".to_owned());

        self.host = gethostname()
            .map(|host| host.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_owned());
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Looks up a token verbatim, e.g. `$NAME`
    pub fn get(&self, token: &str) -> Option<&str> {
        self.variables.get(token).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        debug!("Setting {} = {:?}", name, value);
        self.variables.insert(name.to_owned(), value.to_owned());
    }

    /// Replaces every token that exactly matches a stored variable with its value
    pub fn substitute(&self, tokens: &mut [String]) {
        for token in tokens {
            if let Some(value) = self.get(token) {
                trace!("Substituting {} -> {:?}", token, value);
                *token = value.to_owned();
            }
        }
    }

    pub fn previous_directory(&self) -> Option<&Path> {
        self.previous_directory.as_deref()
    }

    /// Changes the working directory of the shell process, remembering where it was
    pub fn change_directory(&mut self, target: &Path) -> Result<()> {
        if !target.is_dir() {
            return Err(builtin_err!(NoSuchDirectory(target.to_path_buf())));
        }

        let starting_directory = env::current_dir().ok();
        env::set_current_dir(target)
            .replace_err(|| builtin_err!(FailedToChangeDirectory(target.to_path_buf())))?;

        if let Some(starting_directory) = starting_directory {
            env::set_var("OLDPWD", &starting_directory);
            self.previous_directory = Some(starting_directory);
        }
        if let Ok(current_directory) = env::current_dir() {
            env::set_var("PWD", current_directory);
        }

        Ok(())
    }

    /// Renders a path with the home directory collapsed to `~`
    pub fn collapse_home(&self, path: &Path) -> String {
        match path.strip_prefix(&self.home) {
            Ok(rest) if self.home != Path::new("/") => {
                if rest.as_os_str().is_empty() {
                    "~".to_owned()
                } else {
                    format!("~/{}", rest.display())
                }
            }
            _ => path.display().to_string(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn test_whole_token_substitution() {
        let mut environment = Environment::new();
        environment.set("$GREETING", "hello");

        let mut words = tokens(&["echo", "$GREETING", "hi$GREETING", "$GREETINGS"]);
        environment.substitute(&mut words);

        assert_eq!(words, tokens(&["echo", "hello", "hi$GREETING", "$GREETINGS"]));
    }

    #[test]
    fn test_set_overwrites() {
        let mut environment = Environment::new();
        environment.set("$A", "1");
        environment.set("$A", "2");
        assert_eq!(environment.get("$A"), Some("2"));
        assert_eq!(environment.get("A"), None);
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let mut environment = Environment::new();
        let before = env::current_dir().ok();

        let result = environment.change_directory(Path::new("/definitely/not/a/directory"));

        assert!(result.is_err());
        assert!(environment.previous_directory().is_none());
        assert_eq!(env::current_dir().ok(), before);
    }

    #[test]
    fn test_collapse_home() {
        let mut environment = Environment::new();
        environment.home = PathBuf::from("/home/someone");

        assert_eq!(environment.collapse_home(Path::new("/home/someone")), "~");
        assert_eq!(environment.collapse_home(Path::new("/home/someone/src")), "~/src");
        assert_eq!(environment.collapse_home(Path::new("/tmp")), "/tmp");
    }
}
