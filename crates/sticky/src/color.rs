use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Whether terminal output should carry ANSI colors
pub fn should_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        // NO_COLOR (https://no-color.org/) wins over a terminal; runner logs are not terminals
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
    }
}

/// Apply the color choice to `colored` and return it for the log subscriber
pub fn init(choice: ColorChoice) -> bool {
    let enabled = should_color(choice);
    colored::control::set_override(enabled);
    enabled
}
