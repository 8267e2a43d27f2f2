//! Switch scripts for the simulator.
//!
//! One event per line, ordered by time:
//!
//! ```text
//! # hold Fn and tap q
//! 0    press 3 3
//! 20   press 0 0
//! 60   release 0 0
//! 80   release 3 3
//! 100  link down
//! 150  link up
//! ```
//!
//! Blank lines and `#` comments are ignored.

use anyhow::{bail, Context, Result};
use thumb35_core::layout::{COLS, ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Close the switch at (row, col)
    Press(usize, usize),
    /// Open the switch at (row, col)
    Release(usize, usize),
    /// Wireless link connects or drops
    Link(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub at_ms: u32,
    pub action: Action,
}

pub fn parse_script(input: &str) -> Result<Vec<Step>> {
    let mut steps: Vec<Step> = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let step = parse_line(line).with_context(|| format!("line {}", line_num))?;

        if let Some(last) = steps.last() {
            if step.at_ms < last.at_ms {
                bail!(
                    "line {}: time {} goes back from {}",
                    line_num,
                    step.at_ms,
                    last.at_ms
                );
            }
        }
        steps.push(step);
    }

    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let at_ms = fields[0]
        .parse::<u32>()
        .with_context(|| format!("invalid time '{}'", fields[0]))?;

    let action = match fields[1..] {
        ["press", row, col] => {
            let (row, col) = parse_position(row, col)?;
            Action::Press(row, col)
        }
        ["release", row, col] => {
            let (row, col) = parse_position(row, col)?;
            Action::Release(row, col)
        }
        ["link", "up"] => Action::Link(true),
        ["link", "down"] => Action::Link(false),
        _ => bail!("unrecognised event '{}'", fields[1..].join(" ")),
    };

    Ok(Step { at_ms, action })
}

fn parse_position(row: &str, col: &str) -> Result<(usize, usize)> {
    let row: usize = row.parse().with_context(|| format!("invalid row '{}'", row))?;
    let col: usize = col.parse().with_context(|| format!("invalid column '{}'", col))?;
    if row >= ROWS || col >= COLS {
        bail!("({}, {}) is outside the {}x{} matrix", row, col, ROWS, COLS);
    }
    Ok((row, col))
}
