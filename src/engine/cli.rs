//! Command-line interface for course-galaxy.

use std::env;
use std::path::PathBuf;

use crate::engine::fields::FieldKind;
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Open the window and run the scene.
    Run,
    /// Generate one field and write it to a JSON file.
    Dump { kind: FieldKind, filename: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CLI {
    pub command: CliCommand,
    /// Tuning file; built-in defaults when absent.
    pub config: Option<PathBuf>,
    /// Overrides the seed from the tuning file.
    pub seed: Option<u64>,
}

impl CLI {
    /// Parse command-line arguments.
    ///
    /// Supported commands:
    /// - `./course-galaxy [run]` - Run normally
    /// - `./course-galaxy dump <starfield|sphere|galaxy> <filename>` - Write a field as JSON
    ///
    /// Both accept `--config <file>` and `--seed <n>` anywhere after the program name.
    pub fn parse() -> EngineResult<Self> {
        Self::parse_from(env::args().skip(1))
    }

    pub fn parse_from<I, S>(args: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = None;
        let mut seed = None;
        let mut positional = Vec::new();

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args.next().ok_or_else(|| usage("--config needs a file"))?;
                    config = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = args.next().ok_or_else(|| usage("--seed needs a number"))?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| usage(&format!("--seed expects an integer, got {value:?}")))?;
                    seed = Some(parsed);
                }
                _ => positional.push(arg),
            }
        }

        let command = match positional.as_slice() {
            [] => CliCommand::Run,
            [cmd] if cmd == "run" => CliCommand::Run,
            [cmd, kind, filename] if cmd == "dump" => CliCommand::Dump {
                kind: FieldKind::parse(kind)
                    .ok_or_else(|| usage(&format!("unknown field kind {kind:?}")))?,
                filename: PathBuf::from(filename),
            },
            [cmd, ..] if cmd == "dump" => {
                return Err(usage("dump <starfield|sphere|galaxy> <filename>"));
            }
            [cmd, ..] => return Err(usage(&format!("unknown command {cmd:?}"))),
        };

        Ok(CLI { command, config, seed })
    }
}

fn usage(msg: &str) -> EngineError {
    EngineError::Config(format!(
        "{msg}\nusage: course-galaxy [run | dump <starfield|sphere|galaxy> <file>] [--config <file>] [--seed <n>]"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_runs() {
        let cli = CLI::parse_from(Vec::<String>::new()).unwrap();
        assert_eq!(cli.command, CliCommand::Run);
        assert_eq!(cli.config, None);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn run_with_options() {
        let cli = CLI::parse_from(["--seed", "42", "run", "--config", "assets/tuning.json"]).unwrap();
        assert_eq!(cli.command, CliCommand::Run);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.config, Some(PathBuf::from("assets/tuning.json")));
    }

    #[test]
    fn dump_command() {
        let cli = CLI::parse_from(["dump", "galaxy", "out.json"]).unwrap();
        assert_eq!(
            cli.command,
            CliCommand::Dump {
                kind: FieldKind::Galaxy,
                filename: PathBuf::from("out.json"),
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(CLI::parse_from(["dump", "nebula", "out.json"]).is_err());
        assert!(CLI::parse_from(["dump", "galaxy"]).is_err());
        assert!(CLI::parse_from(["save", "x"]).is_err());
        assert!(CLI::parse_from(["--seed", "abc"]).is_err());
        assert!(CLI::parse_from(["--config"]).is_err());
    }
}
