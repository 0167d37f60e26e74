use scheduler_engine::Scheduler;

use super::{print_json, CommandResult};

pub fn execute(scheduler: &Scheduler) -> CommandResult {
    print_json(&scheduler.snapshot())
}
