// Orchestration — the multi-step flows behind each subcommand.

pub mod collect;
pub mod export;
