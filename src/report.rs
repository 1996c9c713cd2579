use std::io::Write;

use serde::Deserialize;
use serde::Serialize;

use crate::exchange::ExchangeOutcome;
use crate::gather::GatherBuffer;
use crate::vectors::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFormat {
    /// `proc <rank>: <max>`
    #[default]
    Rank,
    /// `Process [<coordinate>]: <max>`
    Coordinates,
}

fn format_list(values: impl Iterator<Item = Value>) -> String {
    let values: Vec<_> = values.map(|v| v.to_string()).collect();
    format!("[{}]", values.join(", "))
}

/// One line per contribution: `<rank> [<v0>, ..., <vn-1>]`.
pub fn write_rows(out: &mut impl Write, buffer: &GatherBuffer) -> std::io::Result<()> {
    for (rank, payload) in buffer.contributions() {
        writeln!(out, "{} {}", rank, format_list(payload.iter().copied()))?;
    }
    Ok(())
}

/// Contributions are the columns: first a line with the rank tags,
/// then the i-th entry of every column on line i.
pub fn write_cols(out: &mut impl Write, buffer: &GatherBuffer) -> std::io::Result<()> {
    let header: String = buffer.rank_tags().map(|tag| format!(" {} ", tag)).collect();
    writeln!(out, "{}", header)?;
    let columns: Vec<_> = buffer.contributions().map(|(_, col)| col).collect();
    let num_entries = columns.first().map(|col| col.len()).unwrap_or(0);
    for i in 0..num_entries {
        writeln!(out, "{}", format_list(columns.iter().map(|col| col[i])))?;
    }
    Ok(())
}

pub fn write_matrices(
    out: &mut impl Write,
    a_rows: &GatherBuffer,
    b_cols: &GatherBuffer,
) -> std::io::Result<()> {
    writeln!(out, "Matrix A")?;
    write_rows(out, a_rows)?;
    writeln!(out, "Matrix B")?;
    write_cols(out, b_cols)
}

pub fn format_result(outcome: &ExchangeOutcome, format: ResultFormat) -> String {
    match format {
        ResultFormat::Rank => format!("proc {}: {}", outcome.coordinate, outcome.maximum),
        ResultFormat::Coordinates => {
            format!("Process [{}]: {}", outcome.coordinate, outcome.maximum)
        }
    }
}
