use clap::Parser;

/// Parses a builtin's arguments with clap, returning from the builtin early when parsing stops.
/// Help output ends the builtin successfully; an extra positional argument becomes
/// `TooManyArguments` and any other problem becomes `InvalidUsage`.
macro_rules! clap_handle {
    ($args_type:ty, $arguments:expr) => {{
        use clap::error::ErrorKind as ClapErrorKind;
        use clap::{CommandFactory, Parser};

        match <$args_type>::try_parse_from($arguments) {
            Ok(parsed) => parsed,
            Err(error) => match error.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                    let _ = error.print();
                    return Ok(());
                }
                ClapErrorKind::UnknownArgument => {
                    let name = <$args_type>::command().get_name().to_owned();
                    return Err(builtin_err!(TooManyArguments(name)));
                }
                _ => {
                    let usage = <$args_type>::command().render_usage().to_string();
                    let usage = usage.trim_start_matches("Usage: ").to_owned();
                    return Err(builtin_err!(InvalidUsage(usage)));
                }
            },
        }
    }};
}

#[derive(Parser, Debug)]
#[command(name = "cd", about = "Change the working directory")]
pub struct ChangeDirectoryArgs {
    #[arg(help = "The directory to switch to: `-` for the previous one, home when omitted")]
    pub path: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "exit",
    about = "Exit the shell immediately",
    allow_negative_numbers = true
)]
pub struct ExitArgs {
    #[arg(help = "The status to exit with")]
    pub code: Option<i32>,
}

#[derive(Parser, Debug)]
#[command(name = "pwd", about = "Print the working directory")]
pub struct WorkingDirectoryArgs {}

#[derive(Parser, Debug)]
#[command(name = "history", about = "List the lines entered so far")]
pub struct HistoryArgs {}

#[derive(Parser, Debug)]
#[command(name = "addenv", about = "Declare a variable for substitution")]
pub struct AddEnvironmentArgs {
    #[arg(value_name = "$NAME", help = "The token to replace, including its leading `$`")]
    pub name: String,
    #[arg(
        value_name = "VALUE",
        allow_hyphen_values = true,
        help = "The text to replace it with"
    )]
    pub value: String,
}

#[derive(Parser, Debug)]
#[command(name = "quit", about = "Stop reading input once the current line finishes")]
pub struct QuitArgs {}
