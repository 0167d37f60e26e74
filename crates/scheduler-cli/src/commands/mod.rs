pub mod classroom;
pub mod form;
pub mod setting;
pub mod show;

use std::path::Path;

use scheduler_engine::Scheduler;
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the database and run the startup load
pub fn open(db: &Path) -> Result<Scheduler, Box<dyn std::error::Error>> {
    Ok(Scheduler::open(db)?)
}

pub fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
