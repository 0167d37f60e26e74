use clap::Args;
use scheduler_engine::Scheduler;

use super::{print_json, CommandResult};

#[derive(Debug, Args)]
pub struct ClassroomArgs {
    /// Classroom id (1-based)
    pub id: u32,
}

pub fn execute(scheduler: &Scheduler, args: ClassroomArgs) -> CommandResult {
    let view = scheduler.classroom(args.id)?;
    print_json(&view)
}
