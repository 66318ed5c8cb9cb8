//! Application orchestrator.
//! Loads/merges config, initializes logging, and dispatches to the `put` or
//! `empty` engine with real collaborators (device resolver, system clock,
//! thread RNG, console prompts).

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::debug;

use trashcan::config::{default_config_path, load_config, Config};
use trashcan::empty::{Emptier, EmptyStats, Guard, RetentionPolicy, TrashDirsSelector};
use trashcan::output as out;
use trashcan::put::{PutMode, RandomSuffixes, Trasher};
use trashcan::{list_volume_roots, ConsoleInput, Environ, RealVolumes, SystemClock, Volume};

use crate::cli::{Args, Command, EmptyArgs, PutArgs};
use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let mut cfg = load_config();
    args.apply_overrides(&mut cfg);

    // Guard must be held until exit so the file appender flushes.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)?;

    debug!("starting trashcan: {:?}", args);

    let Some(command) = args.command else {
        bail!("no subcommand given; see `trashcan --help`");
    };

    let environ: Environ = std::env::vars().collect();
    let uid = effective_uid();

    match command {
        Command::Put(put) => run_put(&cfg, &put, &environ, uid),
        Command::Empty(empty) => run_empty(&cfg, &empty, &environ, uid),
    }
}

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var("TRASHCAN_CONFIG") {
        out::print_info(&format!("Using TRASHCAN_CONFIG (explicit):\n  {cfg_env}\n"));
        out::print_info("To override, unset TRASHCAN_CONFIG or set it to another file.");
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default trashcan config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there yet. It is created on the next normal run.",
                );
            }
        }
        None => {
            out::print_error("Could not determine a default config path.");
        }
    }
}

fn effective_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() }
}

fn run_put(cfg: &Config, args: &PutArgs, environ: &Environ, uid: u32) -> Result<()> {
    let volumes = RealVolumes;
    let clock = SystemClock;
    let trasher = Trasher::new(&volumes, &clock);
    let mut input = ConsoleInput;
    let mut suffixes = RandomSuffixes;

    // -i wins over -f when both are given.
    let mode = if args.interactive {
        PutMode::Interactive
    } else if args.force {
        PutMode::Force
    } else {
        PutMode::Standard
    };
    let forced_volume = args.volume.as_ref().map(Volume::new);

    let mut failed = 0usize;
    for path in &args.paths {
        let result = trasher.trash(
            path,
            mode,
            forced_volume.as_ref(),
            args.trash_dir.as_deref(),
            cfg.home_trash.as_deref(),
            environ,
            uid,
            &mut input,
            &mut suffixes,
        );
        if result.is_failure() {
            out::print_error(&format!("cannot trash '{}'", path.display()));
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("failed to trash {failed} of {} items", args.paths.len());
    }
    Ok(())
}

fn run_empty(cfg: &Config, args: &EmptyArgs, environ: &Environ, uid: u32) -> Result<()> {
    let clock = SystemClock;
    let mut input = ConsoleInput;

    let policy = RetentionPolicy::from_days(args.days.or(cfg.days));

    let roots: Vec<PathBuf> = list_volume_roots();
    let selector = TrashDirsSelector::new(&roots);
    let trash_dirs = selector.select(
        args.all_users,
        &args.trash_dir,
        cfg.home_trash.as_deref(),
        environ,
        uid,
    );
    if trash_dirs.is_empty() {
        out::print_info("no trash directories to empty");
        return Ok(());
    }

    let pass = Guard.ask(args.interactive, trash_dirs, &mut input);
    if !pass.proceed {
        out::print_info("nothing emptied");
        return Ok(());
    }

    let emptier = Emptier::new(policy, &clock, args.dry_run);
    let stats = emptier.empty(&pass.trash_dirs);
    finish_empty(&stats, args.dry_run)
}

/// Final reporting and exit mapping for an emptying pass. Per-entry failures
/// were already reported by the emptier and are summarized here; they never
/// turn into a nonzero exit, since the pass itself ran to completion.
fn finish_empty(stats: &EmptyStats, dry_run: bool) -> Result<()> {
    if dry_run {
        out::print_info(&format!(
            "dry-run: {} entries would be removed, {} retained",
            stats.would_delete, stats.retained
        ));
    } else {
        out::print_info(&format!(
            "{} entries removed, {} retained",
            stats.deleted, stats.retained
        ));
    }
    if stats.failed > 0 {
        out::print_warn(&format!("{} entries could not be removed", stats.failed));
    }
    Ok(())
}
