use std::io::{self, Write};

use serde::Serialize;

use crate::app::{AnnotateResult, GroupListResult, OverlapResult, SessionResult};

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_groups(result: &GroupListResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_overlap(result: &OverlapResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_session(result: &SessionResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_annotations(result: &AnnotateResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
