//! Execution log and utilization tally of the simulated vector unit.
//!
//! Every instruction issued by an [`Engine`](crate::simd::engine::Engine) is
//! recorded here together with the mask it ran under. The counters are always
//! kept; the per-instruction trace is only recorded when tracing is enabled,
//! since a large workload issues millions of instructions.
//!
//! The logger is pure bookkeeping: nothing in the kernels ever reads it back.

use std::fmt;
use std::io::{self, Write};

use crate::simd::mask::Mask;

/// Instructions understood by the simulated unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Set,
    Load,
    Store,
    Add,
    Sub,
    Mult,
    Div,
    Abs,
    Move,
    Gt,
    Lt,
    Eq,
    MaskNot,
    MaskAnd,
    MaskOr,
    CntBits,
    Hadd,
    Interleave,
}

impl Instruction {
    /// Mnemonic shown in the execution log.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Set => "vset",
            Instruction::Load => "vload",
            Instruction::Store => "vstore",
            Instruction::Add => "vadd",
            Instruction::Sub => "vsub",
            Instruction::Mult => "vmult",
            Instruction::Div => "vdiv",
            Instruction::Abs => "vabs",
            Instruction::Move => "vmove",
            Instruction::Gt => "vgt",
            Instruction::Lt => "vlt",
            Instruction::Eq => "veq",
            Instruction::MaskNot => "masknot",
            Instruction::MaskAnd => "maskand",
            Instruction::MaskOr => "maskor",
            Instruction::CntBits => "cntbits",
            Instruction::Hadd => "hadd",
            Instruction::Interleave => "interleave",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

/// One line of the execution trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogEntry<const W: usize> {
    pub instruction: Instruction,
    pub mask: Mask<W>,
}

impl<const W: usize> LogEntry<W> {
    /// Number of lanes that did useful work.
    pub fn active_lanes(&self) -> usize {
        self.mask.count_ones()
    }
}

/// Aggregate counters of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_instructions: u64,
    pub utilized_lanes: u64,
    pub total_lanes: u64,
}

impl Stats {
    /// Fraction of issued lane slots that were active, in `[0, 1]`.
    ///
    /// Zero when nothing has been issued yet.
    pub fn utilization(&self) -> f64 {
        if self.total_lanes == 0 {
            return 0.0;
        }
        self.utilized_lanes as f64 / self.total_lanes as f64
    }

    fn absorb(&mut self, other: &Stats) {
        self.total_instructions += other.total_instructions;
        self.utilized_lanes += other.utilized_lanes;
        self.total_lanes += other.total_lanes;
    }
}

/// Per-engine execution log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Logger<const W: usize> {
    entries: Vec<LogEntry<W>>,
    stats: Stats,
    trace: bool,
}

impl<const W: usize> Logger<W> {
    /// A logger that keeps the counters and the full instruction trace.
    pub fn new() -> Self {
        Self::with_trace(true)
    }

    /// A logger that keeps the full trace only when `trace` is set.
    pub fn with_trace(trace: bool) -> Self {
        Self {
            entries: Vec::new(),
            stats: Stats::default(),
            trace,
        }
    }

    pub fn is_tracing(&self) -> bool {
        self.trace
    }

    /// Records one issued instruction.
    pub fn record(&mut self, instruction: Instruction, mask: Mask<W>) {
        let active = mask.count_ones();

        self.stats.total_instructions += 1;
        self.stats.utilized_lanes += active as u64;
        self.stats.total_lanes += W as u64;

        tracing::trace!(%instruction, active, width = W, "issued");

        if self.trace {
            self.entries.push(LogEntry { instruction, mask });
        }
    }

    pub fn entries(&self) -> &[LogEntry<W>] {
        &self.entries
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn utilization(&self) -> f64 {
        self.stats.utilization()
    }

    /// Clears counters and trace; the tracing setting is kept.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.stats = Stats::default();
    }

    /// Appends `other`'s trace after this one and adds its counters.
    pub fn merge(&mut self, other: Logger<W>) {
        self.stats.absorb(&other.stats);
        if self.trace {
            self.entries.extend(other.entries);
        }
    }

    /// Writes the per-instruction lane occupancy table.
    pub fn write_log<O: Write>(&self, out: &mut O) -> io::Result<()> {
        writeln!(
            out,
            "***************** Printing Vector Unit Execution Log *****************"
        )?;
        writeln!(
            out,
            " Instruction | Vector Lane Occupancy ('*' for active, '_' for inactive)"
        )?;
        writeln!(
            out,
            "------------- --------------------------------------------------------"
        )?;
        for entry in &self.entries {
            writeln!(out, "{:>12} | {}", entry.instruction, entry.mask)?;
        }
        Ok(())
    }

    /// Writes the aggregate utilization statistics.
    pub fn write_stats<O: Write>(&self, out: &mut O) -> io::Result<()> {
        writeln!(
            out,
            "****************** Printing Vector Unit Statistics *******************"
        )?;
        writeln!(out, "Vector Width:              {}", W)?;
        writeln!(
            out,
            "Total Vector Instructions: {}",
            self.stats.total_instructions
        )?;
        writeln!(
            out,
            "Vector Utilization:        {:.1}%",
            self.stats.utilization() * 100.0
        )?;
        writeln!(out, "Utilized Vector Lanes:     {}", self.stats.utilized_lanes)?;
        writeln!(out, "Total Vector Lanes:        {}", self.stats.total_lanes)
    }

    /// Prints the execution log to stdout.
    pub fn print_log(&self) -> io::Result<()> {
        self.write_log(&mut io::stdout().lock())
    }

    /// Prints the utilization statistics to stdout.
    pub fn print_stats(&self) -> io::Result<()> {
        self.write_stats(&mut io::stdout().lock())
    }
}

impl<const W: usize> Default for Logger<W> {
    fn default() -> Self {
        Self::new()
    }
}
