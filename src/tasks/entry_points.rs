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
use crate::config::Settings;
use crate::ui::logging::GlobalLogger;
use dielec_dist::Root;
use std::ffi::OsStr;
use std::path::PathBuf;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        }
        std::process::exit(1);
    });
}

fn config_arg<'a, 'b>() -> clap::Arg<'a, 'b> {
    clap::Arg::with_name("config")
        .short("c").long("config")
        .value_name("SETTINGS")
        .takes_value(true)
        .required(true)
        .help("settings yaml; relative paths inside it are resolved against its directory")
}

fn output_arg<'a, 'b>() -> clap::Arg<'a, 'b> {
    clap::Arg::with_name("output")
        .short("o").long("output")
        .value_name("PREFIX")
        .takes_value(true)
        .default_value("dielec")
        .help("prefix for output files")
}

fn verbose_arg<'a, 'b>() -> clap::Arg<'a, 'b> {
    clap::Arg::with_name("verbose")
        .short("v").long("verbose")
        .multiple(true)
        .help("log more; may be repeated")
}

struct CommonArgs {
    settings: PathBuf,
    prefix: PathBuf,
    verbosity: u64,
}

impl CommonArgs {
    fn from_matches(m: &clap::ArgMatches<'_>) -> FailResult<Self> {
        let settings = match m.value_of_os("config") {
            Some(path) => PathBuf::from(path),
            None => bail!("--config is required"),
        };
        let prefix = PathBuf::from(m.value_of_os("output").unwrap_or_else(|| OsStr::new("dielec")));
        let verbosity = m.occurrences_of("verbose");
        Ok(CommonArgs { settings, prefix, verbosity })
    }

    /// Log to stdout and `PREFIX.log`; non-root processes only report problems.
    fn init_logger(&self, root: &impl Root) -> FailResult<()> {
        let mut logger = GlobalLogger::default();
        logger.verbosity(self.verbosity).quiet(!root.is_root());
        if root.is_root() {
            logger.path(crate::cmd::output_path(&self.prefix, "log"));
        }
        logger.apply()
    }
}

#[cfg(feature = "mpi-support")]
fn init_mpi() -> FailResult<mpi::environment::Universe> {
    match mpi::initialize() {
        Some(universe) => Ok(universe),
        None => bail!("MPI was already initialized"),
    }
}

// -------------------------------------------------------------------------------------

// %% CRATES: binary: dielec %%
pub fn dielec() {
    wrap_result_main(|| {
        let matches = {
            clap::App::new("dielec")
                .version(env!("CARGO_PKG_VERSION"))
                .about("\
                    Ionic contribution to the frequency-dependent dielectric tensor, \
                    followed by the mode effective charges.\
                ")
                .args(&[config_arg(), output_arg(), verbose_arg()])
                .get_matches()
        };
        let args = CommonArgs::from_matches(&matches)?;

        #[cfg(feature = "mpi-support")]
        let _universe = init_mpi()?;

        dielec_dist::with_default_root(|root| {
            args.init_logger(root)?;
            let settings = Settings::load(&args.settings)?;
            crate::cmd::run_dielectric(root, &settings, &args.prefix)
        })
    });
}

// %% CRATES: binary: dielec-zmode %%
pub fn dielec_zmode() {
    wrap_result_main(|| {
        let matches = {
            clap::App::new("dielec-zmode")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Mode effective charges of the zone-center phonons.")
                .args(&[config_arg(), output_arg(), verbose_arg()])
                .arg({
                    clap::Arg::with_name("normalize")
                        .long("normalize")
                        .help("divide by the norm of each displacement (overrides normalize-zmode)")
                })
                .get_matches()
        };
        let args = CommonArgs::from_matches(&matches)?;

        #[cfg(feature = "mpi-support")]
        let _universe = init_mpi()?;

        dielec_dist::with_default_root(|root| {
            args.init_logger(root)?;
            let settings = Settings::load(&args.settings)?;
            let normalize = matches.is_present("normalize") || settings.normalize_zmode;
            crate::cmd::run_zmode(root, &settings, &args.prefix, normalize)
        })
    });
}
