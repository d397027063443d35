//! CLI Tooling
//!
//! Command-line interface for the simulated filesystem: one-shot command
//! lines, script files, and an interactive prompt over a seeded tree.

use super::shell::{CommandOutput, Shell};
use crate::config::{ConfigLoader, SimfsConfig};
use crate::error::ApiError;
use crate::logging::{LogFormat, LogOutput};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// simfs - in-memory filesystem simulator
#[derive(Parser)]
#[command(name = "simfs")]
#[command(about = "Explore a simulated in-memory filesystem with shell-like commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (merged over the user config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed file (TOML or JSON) describing the initial tree
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Absolute path of the home directory
    #[arg(long)]
    pub home: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Execute command lines in order, stopping at the first failure
    Exec {
        /// Command lines, e.g. "mkdir -p a/b" "ls a"
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Execute a script file, one command per line
    Run {
        script: PathBuf,
        /// Keep going after a failing line
        #[arg(long)]
        keep_going: bool,
    },
    /// Interactive prompt (default)
    Repl,
}

impl Cli {
    /// Load configuration and apply command-line overrides on top of it.
    pub fn config(&self) -> Result<SimfsConfig, ApiError> {
        let mut config = ConfigLoader::load(self.config.as_deref())?;
        if let Some(seed) = &self.seed {
            config.seed = Some(seed.clone());
        }
        if let Some(home) = &self.home {
            config.home = Some(home.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(output) = self.log_output {
            config.logging.output = output;
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if self.no_color {
            config.shell.color = false;
            config.logging.color = false;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Repl)
    }
}

/// CLI context holding the shell session
pub struct CliContext {
    shell: Shell,
    prompt: String,
}

impl CliContext {
    /// Build the seeded filesystem described by `config`.
    pub fn new(config: &SimfsConfig) -> Result<Self, ApiError> {
        let fs = config.load_seed()?.build()?;
        info!(cwd = %fs.current_path(), "session started");
        Ok(Self {
            shell: Shell::new(fs, config.shell.color),
            prompt: config.shell.prompt.clone(),
        })
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Execute a CLI command, writing command output to `out` and
    /// diagnostics to `err`. Returns the process exit status.
    pub fn execute<R: BufRead, W: Write, E: Write>(
        &mut self,
        command: &Commands,
        input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<i32, ApiError> {
        match command {
            Commands::Exec { lines } => {
                for line in lines {
                    let status = self.run_line(line, out, err)?;
                    if status != 0 {
                        return Ok(status);
                    }
                }
                Ok(0)
            }
            Commands::Run { script, keep_going } => {
                let text = std::fs::read_to_string(script)?;
                info!(script = %script.display(), "running script");
                let mut last = 0;
                for line in text.lines() {
                    let status = self.run_line(line, out, err)?;
                    if status != 0 {
                        if !keep_going {
                            return Ok(status);
                        }
                        last = status;
                    }
                }
                Ok(last)
            }
            Commands::Repl => self.repl(input, out, err),
        }
    }

    fn repl<R: BufRead, W: Write, E: Write>(
        &mut self,
        input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<i32, ApiError> {
        let mut status = 0;
        let mut lines = input.lines();
        loop {
            write!(out, "{}", self.shell.prompt(&self.prompt))?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            if matches!(line.trim(), "exit" | "quit") {
                break;
            }
            status = self.run_line(&line, out, err)?;
        }
        Ok(status)
    }

    fn run_line<W: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> Result<i32, ApiError> {
        let CommandOutput {
            stdout,
            stderr,
            status,
        } = self.shell.execute(line);
        out.write_all(stdout.as_bytes())?;
        err.write_all(stderr.as_bytes())?;
        Ok(status)
    }
}
