//! Utility module for command line interfaces

use std::{error::Error, fmt, fmt::Display, str::FromStr};

/// An error struct to wrap simple static error messages
#[derive(Debug)]
pub struct CliErr(pub &'static str);

impl Display for CliErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for CliErr {}

/// Take the next positional argument, failing with `missing` if there is none.
pub fn next_arg(args: &mut impl Iterator<Item = String>, missing: &'static str) -> Result<String, CliErr> {
    args.next().ok_or(CliErr(missing))
}

/// Parse the next positional argument if there is one.
pub fn parse_optional_arg<T: FromStr>(args: &mut impl Iterator<Item = String>, invalid: &'static str) -> Result<Option<T>, CliErr> {
    args.next().map(|arg| arg.parse().map_err(|_| CliErr(invalid))).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments() {
        let mut args = vec!["graph.fmi".to_string(), "4".to_string(), "x".to_string()].into_iter();
        assert_eq!(next_arg(&mut args, "missing graph").unwrap(), "graph.fmi");
        assert_eq!(parse_optional_arg::<u8>(&mut args, "invalid depth").unwrap(), Some(4));
        assert!(parse_optional_arg::<u8>(&mut args, "invalid depth").is_err());
        assert_eq!(parse_optional_arg::<u8>(&mut args, "invalid depth").unwrap(), None);
        assert_eq!(next_arg(&mut args, "missing output").unwrap_err().to_string(), "missing output");
    }
}
