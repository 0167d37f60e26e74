use clap::Args;
use scheduler_engine::Scheduler;

use super::{print_json, CommandResult};

#[derive(Debug, Args)]
pub struct SettingArgs {
    /// `session_length_minutes` or `break_minutes`
    pub key: String,
    pub value: String,
}

/// A rejected value is reported in the output, not treated as a failure
pub fn execute(scheduler: &Scheduler, args: SettingArgs) -> CommandResult {
    let report = scheduler.update_setting(&args.key, &args.value);
    print_json(&report)
}
