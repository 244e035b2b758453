/* ********************************************************************** **
**  This file is part of dielec.                                          **
**                                                                        **
**  dielec is free software: you can redistribute it and/or modify it     **
**  under the terms of the GNU General Public License as published by the **
**  Free Software Foundation, either version 3 of the License, or (at     **
**  your option) any later version.                                       **
**                                                                        **
**      http://www.gnu.org/licenses/                                      **
**                                                                        **
** Do note that, while the whole of dielec is licensed under the GPL,     **
** many parts of it are licensed under more permissive terms.             **
** ********************************************************************** */

use crate::FailResult;

use log::{Level, LevelFilter};
use std::fmt;
use std::path::{Path, PathBuf};

/// Builder-style setup for logging
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    path: Option<PathBuf>,
    verbosity: Verbosity,
    quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity { Default, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Default }
}

impl GlobalLogger {
    /// Also write the log to this file.
    pub fn path(&mut self, path: impl AsRef<Path>) -> &mut Self
    { self.path = Some(path.as_ref().to_owned()); self }

    /// Any integer will be accepted; the level will be truncated
    /// to the most extreme value supported.
    pub fn verbosity(&mut self, level: u64) -> &mut Self {
        self.verbosity = match level > 0 {
            true => Verbosity::Loud,
            false => Verbosity::Default,
        };
        self
    }

    /// Only show warnings and errors.  For the non-coordinating processes of a
    /// multi-process run, which would otherwise repeat everything the coordinator says.
    pub fn quiet(&mut self, quiet: bool) -> &mut Self
    { self.quiet = quiet; self }

    /// NOTE: This can only succeed once per process.
    pub fn apply(&mut self) -> FailResult<()> {
        use std::time::Instant;

        let ours = match (self.quiet, &self.verbosity) {
            (true, _) => LevelFilter::Warn,
            (false, Verbosity::Default) => LevelFilter::Debug,
            (false, Verbosity::Loud) => LevelFilter::Trace,
        };
        let theirs = match self.quiet {
            true => LevelFilter::Warn,
            false => LevelFilter::Info,
        };

        let start = Instant::now();
        let mut dispatch = fern::Dispatch::new();
        dispatch = dispatch.format(move |out, message, record| {
                let t = start.elapsed();
                out.finish(format_args!("[{:>4}.{:03}s][{}][{}] {}",
                    t.as_secs(),
                    t.subsec_millis(),
                    record.target(),
                    ColorizedLevel(record.level()),
                    message))
            })
            .level(theirs)
            .level_for("dielec_tasks", ours)
            .level_for("dielec_dielectric", ours)
            .level_for("dielec_dist", ours)
            .level_for("dielec_fs_util", ours)
            .chain(std::io::stdout());

        if let Some(path) = self.path.as_ref() {
            dispatch = dispatch.chain(fern::log_file(path)?);
        }

        dispatch.apply()?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);
impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let style = match self.0 {
            Level::Error => ansi_term::Colour::Red.bold(),
            Level::Warn  => ansi_term::Colour::Red.normal(),
            Level::Info  => ansi_term::Colour::Cyan.bold(),
            Level::Debug => ansi_term::Colour::Yellow.dimmed(),
            Level::Trace => ansi_term::Colour::Cyan.normal(),
        };
        write!(f, "{}", style.paint(format!("{:<5}", self.0)))
    }
}
