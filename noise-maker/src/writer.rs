use std::io::{self, Write};

use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;

use crate::generator::{generate_access_log, generate_malformed_log};

#[derive(Debug, Clone, Copy)]
pub struct Plan {
    pub lines: usize,
    pub malformed_every: usize,
    pub start: NaiveDateTime,
    pub spacing: TimeDelta,
}

impl Plan {
    fn is_malformed(&self, line_no: usize) -> bool {
        self.malformed_every > 0 && line_no % self.malformed_every == 0
    }
}

/// Writes `plan.lines` log lines, one per line, with timestamps advancing by
/// `plan.spacing`. Returns how many of them were malformed.
pub fn write_log<W: Write, R: Rng + ?Sized>(
    mut out: W,
    rng: &mut R,
    plan: &Plan,
) -> io::Result<usize> {
    let mut malformed = 0;
    let mut at = plan.start;
    for line_no in 1..=plan.lines {
        if line_no > 1 {
            at = at.checked_add_signed(plan.spacing).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("timestamps run past the supported range after {at}"),
                )
            })?;
        }
        let line = if plan.is_malformed(line_no) {
            malformed += 1;
            generate_malformed_log(rng, at)
        } else {
            generate_access_log(rng, at)
        };
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(malformed)
}
