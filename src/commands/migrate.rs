//! One-off (but rerunnable) store migration for the Saunders bracket's
//! 4-team → 6-team expansion.

use crate::cli::MigrateArgs;
use crate::rounds;
use crate::store::{self, RecordStore};

pub fn run(args: MigrateArgs) -> anyhow::Result<()> {
    if let Err(e) = store::guard_overwrite(&args.input, &args.output, args.in_place) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let mut store = RecordStore::load(&args.input)?;
    let changed = rounds::normalize_store(&mut store, args.six_team_start);
    store.save(&args.output)?;

    println!(
        "Normalized Saunders rounds. Updated {changed} games. Wrote: {}",
        args.output.display()
    );
    Ok(())
}
