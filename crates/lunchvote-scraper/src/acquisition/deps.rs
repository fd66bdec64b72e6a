//! Startup check for the external converters.

use std::path::Path;

/// Returns the entries of `commands` that cannot be found.
///
/// Names containing a path separator are checked as paths; bare names are
/// looked up in every directory of `PATH`.
#[must_use]
pub fn missing_commands(commands: &[&str]) -> Vec<String> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let dirs: Vec<_> = std::env::split_paths(&path_var).collect();

    commands
        .iter()
        .filter(|command| {
            if command.contains(std::path::MAIN_SEPARATOR) || command.contains('/') {
                !Path::new(command).is_file()
            } else {
                !dirs.iter().any(|dir| dir.join(command).is_file())
            }
        })
        .map(|command| (*command).to_owned())
        .collect()
}
