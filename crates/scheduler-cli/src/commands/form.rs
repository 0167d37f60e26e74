//! Form writes given as `key=value` pairs, using the same keys as the web form

use clap::Args;
use scheduler_core::form::FormData;
use scheduler_engine::Scheduler;

use super::{print_json, CommandResult};

#[derive(Debug, Args)]
pub struct FormArgs {
    /// Form fields, e.g. `num_classrooms=2 block_count=4 title_1_0=Intro`
    #[arg(value_parser = parse_pair)]
    pub fields: Vec<(String, String)>,
}

impl FormArgs {
    fn form_data(self) -> FormData {
        self.fields.into_iter().collect()
    }
}

pub fn execute_blocks(scheduler: &Scheduler, args: FormArgs) -> CommandResult {
    let report = scheduler.submit_block_form(&args.form_data());
    print_json(&report)
}

pub fn execute_sessions(scheduler: &Scheduler, args: FormArgs) -> CommandResult {
    let report = scheduler.submit_session_form(&args.form_data());
    print_json(&report)
}

/// `title_1_0=Opening talk` -> ("title_1_0", "Opening talk"); the value may
/// itself contain `=`
fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("desc_1_0=a=b").unwrap(),
            ("desc_1_0".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_pair("roomname_2=").unwrap(),
            ("roomname_2".to_string(), String::new())
        );
        assert!(parse_pair("no_equals").is_err());
        assert!(parse_pair("=value").is_err());
    }
}
