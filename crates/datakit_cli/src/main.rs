//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `datakit_core` linkage with one in-memory repository round trip.
//! - Keep output deterministic for quick local sanity checks.

use datakit_core::{MemoryRepository, Repository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("datakit_core version={}", datakit_core::core_version());

    let repo: MemoryRepository<String> = MemoryRepository::new();
    let outcome = repo
        .create("hello".to_string())
        .and_then(|id| Ok((id, repo.get(id)?, repo.get_all()?.len())));

    match outcome {
        Ok((id, value, total)) => {
            println!("memory_repo id={id} value={value} total={total}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=cli_smoke module=cli status=error error={err}");
            eprintln!("memory_repo error={err}");
            ExitCode::FAILURE
        }
    }
}
