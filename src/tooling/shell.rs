//! Shell command layer
//!
//! Parses command lines and maps them onto filesystem operations. Every
//! failure is rendered as `<command>: <message>`; nothing here panics on user
//! input.

use super::format::{format_listing, format_long_listing, format_tree};
use crate::error::FsError;
use crate::filesystem::Filesystem;
use crate::resolve::{Resolution, ResolveOptions};
use crate::types::{NodeId, NodeKind, SEPARATOR};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Exit status for a command that ran into a filesystem error.
pub const STATUS_FAILURE: i32 = 1;
/// Exit status for malformed invocations.
pub const STATUS_USAGE: i32 = 2;
/// Exit status for unknown commands.
pub const STATUS_NOT_FOUND: i32 = 127;

const HELP: &str = "\
pwd                      print the current directory
cd [path]                change directory (home when omitted)
ls [-a] [-l] [paths...]  list directory contents
mkdir [-p] paths...      create directories
touch paths...           create empty files or update timestamps
cat paths...             print file contents
write path text...       replace a file's content
rm [-r] paths...         remove files or directories
cp [-r] sources... dest  copy nodes
mv sources... dest       move or rename nodes
tree [path]              draw a directory tree
stat path                show node details as JSON
validate                 check tree consistency
help                     show this help";

/// Result of one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.stdout.push_str(text.as_ref());
        self.stdout.push('\n');
    }

    fn fail(&mut self, command: &str, err: &CommandError) {
        warn!(command, error = %err, "command rejected");
        self.stderr.push_str(&format!("{}: {}\n", command, err));
        self.status = self.status.max(err.status());
    }
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("{0}")]
    Fs(#[from] FsError),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Render(String),
}

impl CommandError {
    fn status(&self) -> i32 {
        match self {
            CommandError::Usage(_) => STATUS_USAGE,
            CommandError::Fs(_) | CommandError::Render(_) => STATUS_FAILURE,
        }
    }
}

type CommandResult = Result<(), CommandError>;

/// Interactive command interpreter over one filesystem.
#[derive(Debug, Clone)]
pub struct Shell {
    fs: Filesystem,
    color: bool,
}

impl Shell {
    pub fn new(fs: Filesystem, color: bool) -> Self {
        Self { fs, color }
    }

    pub fn filesystem(&self) -> &Filesystem {
        &self.fs
    }

    /// Current directory with the home prefix shortened to `~`.
    pub fn display_cwd(&self) -> String {
        let cwd = self.fs.current_path();
        let home = match self.fs.absolute_path(self.fs.home()) {
            Ok(home) if home != SEPARATOR.to_string() => home,
            _ => return cwd,
        };
        if cwd == home {
            "~".to_string()
        } else if let Some(rest) = cwd.strip_prefix(&format!("{}{}", home, SEPARATOR)) {
            format!("~{}{}", SEPARATOR, rest)
        } else {
            cwd
        }
    }

    /// Expand a prompt template; `{cwd}` becomes the current directory.
    pub fn prompt(&self, template: &str) -> String {
        template.replace("{cwd}", &self.display_cwd())
    }

    /// Run one command line.
    pub fn execute(&mut self, line: &str) -> CommandOutput {
        let mut out = CommandOutput::default();
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(message) => {
                out.fail("simfs", &CommandError::Usage(message));
                return out;
            }
        };
        let Some((command, args)) = tokens.split_first() else {
            return out;
        };
        debug!(command = %command, args = args.len(), "executing command");

        let result = match command.as_str() {
            "pwd" => self.pwd(args, &mut out),
            "cd" => self.cd(args),
            "ls" => self.ls(args, &mut out),
            "mkdir" => self.mkdir(args, &mut out),
            "touch" => self.touch(args, &mut out),
            "cat" => self.cat(args, &mut out),
            "write" => self.write(args),
            "rm" => self.rm(args, &mut out),
            "cp" => self.cp(args),
            "mv" => self.mv(args),
            "tree" => self.tree(args, &mut out),
            "stat" => self.stat(args, &mut out),
            "validate" => self.validate(&mut out),
            "help" => {
                out.line(HELP);
                Ok(())
            }
            other => {
                warn!(command = other, "unknown command");
                out.stderr
                    .push_str(&format!("simfs: command not found: {}\n", other));
                out.status = STATUS_NOT_FOUND;
                return out;
            }
        };
        if let Err(err) = result {
            out.fail(command, &err);
        }
        out
    }

    fn pwd(&self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        if !args.is_empty() {
            return Err(CommandError::Usage("too many arguments".to_string()));
        }
        out.line(self.fs.current_path());
        Ok(())
    }

    fn cd(&mut self, args: &[String]) -> CommandResult {
        let target = match args {
            [] => self.fs.home(),
            [path] => self.existing(path, Some(NodeKind::Directory))?,
            _ => return Err(CommandError::Usage("too many arguments".to_string())),
        };
        self.fs.set_cwd(target)?;
        Ok(())
    }

    fn ls(&self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        let (flags, operands) = parse_flags(args, &['a', 'l'])?;
        let all = flags.contains(&'a');
        let long = flags.contains(&'l');
        let operands = if operands.is_empty() {
            vec![".".to_string()]
        } else {
            operands
        };
        let headed = operands.len() > 1;

        for (index, operand) in operands.iter().enumerate() {
            let listing = match self.listing(operand, all, long) {
                Ok(listing) => listing,
                Err(err) => {
                    out.fail("ls", &err);
                    continue;
                }
            };
            if headed {
                if index > 0 {
                    out.line("");
                }
                out.line(format!("{}:", operand));
            }
            if !listing.is_empty() {
                out.line(listing);
            }
        }
        Ok(())
    }

    fn listing(&self, operand: &str, all: bool, long: bool) -> Result<String, CommandError> {
        let id = self.existing(operand, None)?;
        let node = self.fs.node(id)?;
        let entries: Vec<NodeId> = if node.is_directory() {
            let mut visible = Vec::new();
            for child in self.fs.children(id)? {
                if all || !self.fs.node(child)?.is_hidden() {
                    visible.push(child);
                }
            }
            visible
        } else {
            vec![id]
        };
        let rendered = if long {
            format_long_listing(&self.fs, &entries, self.color)?
        } else {
            format_listing(&self.fs, &entries, self.color)?
        };
        Ok(rendered)
    }

    fn mkdir(&mut self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        let (flags, operands) = parse_flags(args, &['p'])?;
        let parents = flags.contains(&'p');
        require_operands(&operands, 1)?;
        for operand in &operands {
            if let Err(err) = self.make_directory(operand, parents) {
                out.fail("mkdir", &err);
            }
        }
        Ok(())
    }

    fn make_directory(&mut self, path: &str, parents: bool) -> CommandResult {
        let resolution = if parents {
            self.fs
                .resolve(path, ResolveOptions::new().create_intermediary())
        } else {
            self.fs.lookup(path, None)
        };
        match resolution {
            Resolution::ParentFoundTargetMissing { parent, name } => {
                self.fs.create_directory(parent, &name)?;
                Ok(())
            }
            Resolution::Found { target, .. }
                if parents && self.fs.node(target)?.is_directory() =>
            {
                Ok(())
            }
            Resolution::Found { name, .. } => Err(FsError::DuplicateName(name).into()),
            other => Err(resolution_error(other).into()),
        }
    }

    fn touch(&mut self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        require_operands(args, 1)?;
        for operand in args {
            let result = match self.fs.lookup(operand, None) {
                Resolution::Found { target, .. } => self.fs.touch(target),
                Resolution::ParentFoundTargetMissing { parent, name } => {
                    self.fs.create_file(parent, &name, "").map(|_| ())
                }
                other => Err(resolution_error(other)),
            };
            if let Err(err) = result {
                out.fail("touch", &CommandError::from(err));
            }
        }
        Ok(())
    }

    fn cat(&self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        require_operands(args, 1)?;
        for operand in args {
            let content = self
                .existing(operand, Some(NodeKind::File))
                .and_then(|id| self.fs.content(id).map_err(CommandError::from));
            match content {
                Ok(content) => out.stdout.push_str(content),
                Err(err) => out.fail("cat", &err),
            }
        }
        Ok(())
    }

    fn write(&mut self, args: &[String]) -> CommandResult {
        let Some((path, words)) = args.split_first() else {
            return Err(CommandError::Usage("missing file operand".to_string()));
        };
        let mut text = words.join(" ");
        if !text.is_empty() {
            text.push('\n');
        }
        match self.fs.lookup(path, Some(NodeKind::File)) {
            Resolution::Found { target, .. } => self.fs.set_content(target, text)?,
            Resolution::ParentFoundTargetMissing { parent, name } => {
                self.fs.create_file(parent, &name, &text)?;
            }
            Resolution::TypeMismatch { name, .. } => return Err(FsError::NotAFile(name).into()),
            other => return Err(resolution_error(other).into()),
        }
        Ok(())
    }

    fn rm(&mut self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        let (flags, operands) = parse_flags(args, &['r', 'R'])?;
        let recursive = flags.contains(&'r') || flags.contains(&'R');
        require_operands(&operands, 1)?;
        for operand in &operands {
            let result = self
                .fs
                .lookup_existing(operand)
                .and_then(|id| self.fs.delete_subtree(id, recursive));
            if let Err(err) = result {
                out.fail("rm", &CommandError::from(err));
            }
        }
        Ok(())
    }

    fn cp(&mut self, args: &[String]) -> CommandResult {
        let (flags, operands) = parse_flags(args, &['r', 'R'])?;
        let recursive = flags.contains(&'r') || flags.contains(&'R');
        let (sources, destination) = self.transfer_operands(&operands)?;
        self.fs.copy_many(&sources, &destination, recursive)?;
        Ok(())
    }

    fn mv(&mut self, args: &[String]) -> CommandResult {
        let (_, operands) = parse_flags(args, &[])?;
        let (sources, destination) = self.transfer_operands(&operands)?;
        self.fs.move_many(&sources, &destination)?;
        Ok(())
    }

    fn transfer_operands(
        &self,
        operands: &[String],
    ) -> Result<(Vec<NodeId>, Resolution), CommandError> {
        let Some((destination, sources)) = operands.split_last() else {
            return Err(CommandError::Usage("missing file operand".to_string()));
        };
        if sources.is_empty() {
            return Err(CommandError::Usage(format!(
                "missing destination file operand after {}",
                destination
            )));
        }
        let sources = sources
            .iter()
            .map(|source| self.fs.lookup_existing(source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((sources, self.fs.lookup(destination, None)))
    }

    fn tree(&self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        let target = match args {
            [] => self.fs.cwd(),
            [path] => self.existing(path, None)?,
            _ => return Err(CommandError::Usage("too many arguments".to_string())),
        };
        out.line(format_tree(&self.fs, target, self.color)?);
        Ok(())
    }

    fn stat(&self, args: &[String], out: &mut CommandOutput) -> CommandResult {
        let [path] = args else {
            return Err(CommandError::Usage("expected exactly one path".to_string()));
        };
        let info = self.fs.node_info(self.existing(path, None)?)?;
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| CommandError::Render(e.to_string()))?;
        out.line(json);
        Ok(())
    }

    fn validate(&self, out: &mut CommandOutput) -> CommandResult {
        let nodes = self.fs.check_consistency().map_err(CommandError::Render)?;
        out.line(format!("ok: {} nodes", nodes));
        Ok(())
    }

    /// Resolve to an existing node, reporting a wrong kind the way the
    /// command expects it.
    fn existing(&self, path: &str, kind: Option<NodeKind>) -> Result<NodeId, CommandError> {
        match self.fs.lookup(path, kind) {
            Resolution::Found { target, .. } => Ok(target),
            Resolution::TypeMismatch { name, .. } => Err(match kind {
                Some(NodeKind::Directory) => FsError::NotADirectory(name),
                _ => FsError::NotAFile(name),
            }
            .into()),
            other => Err(resolution_error(other).into()),
        }
    }
}

fn resolution_error(resolution: Resolution) -> FsError {
    resolution.error().unwrap_or(FsError::InvalidPath)
}

fn require_operands(operands: &[String], at_least: usize) -> CommandResult {
    if operands.len() < at_least {
        return Err(CommandError::Usage("missing operand".to_string()));
    }
    Ok(())
}

/// Split leading `-x` style flags from operands. `--` ends flag parsing.
fn parse_flags(
    args: &[String],
    allowed: &[char],
) -> Result<(HashSet<char>, Vec<String>), CommandError> {
    let mut flags = HashSet::new();
    let mut operands = Vec::new();
    let mut flags_done = false;
    for arg in args {
        if flags_done || !arg.starts_with('-') || arg.len() == 1 {
            operands.push(arg.clone());
            continue;
        }
        if arg == "--" {
            flags_done = true;
            continue;
        }
        for flag in arg.chars().skip(1) {
            if !allowed.contains(&flag) {
                return Err(CommandError::Usage(format!("invalid option -- '{}'", flag)));
            }
            flags.insert(flag);
        }
    }
    Ok((flags, operands))
}

/// Split a command line into words. Single quotes are literal, double quotes
/// allow backslash escapes, and a `#` at the start of a word begins a comment.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    tokens.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '#' if !in_word => break,
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err("unterminated single quote".to_string()),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => current.push(c),
                            None => return Err("unterminated double quote".to_string()),
                        },
                        Some(c) => current.push(c),
                        None => return Err("unterminated double quote".to_string()),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(c) = chars.next() {
                    current.push(c);
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        tokens.push(current);
    }
    Ok(tokens)
}
