//! The discrete-event simulation driver: owns all shared resource
//! tables and applies the ISSUE/START/WRITEBACK transitions until the
//! pending queue drains or a NaN result forces early termination (§4).

use tracing::{debug, info, warn};

use crate::arithmetic::{compute_result, is_nan};
use crate::event::{Event, EventKind, PendingQueue, RetirementHeap};
use crate::functional_unit::FunctionalUnitTable;
use crate::instruction::{Instruction, NO_SRC};
use crate::register::RegisterFile;
use crate::stage::{Stage, StageOccupancy};

/// All process-wide mutable state for one simulation run, owned by the
/// driver and passed by `&mut` into each transition (§9, "Process-wide
/// mutable tables").
pub struct SimulationContext {
    pub registers: RegisterFile,
    pub functional_units: FunctionalUnitTable,
    pub stages: StageOccupancy,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self {
            registers: RegisterFile::new(),
            functional_units: FunctionalUnitTable::new(),
            stages: StageOccupancy::new(),
        }
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a completed run: the retired schedule, in original
/// instruction order, and whether a NaN result cut the run short (§4.6).
/// `terminated_early` is not an error — a NaN-triggered stop is success
/// from the process's point of view (§7).
pub struct RunOutcome {
    pub retired: Vec<Event>,
    pub terminated_early: bool,
}

/// Builds the initial ISSUE events and assigns stable tie-break indices
/// in `(curr_time, arrival_cycle)` pop order, before simulation starts (§4.5).
fn seed_events(instructions: &[Instruction]) -> PendingQueue {
    let unindexed: PendingQueue = instructions
        .iter()
        .cloned()
        .map(|instr| Event::new_issue(0, instr))
        .collect();
    let ordered = unindexed.drain_ordered();
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, mut e)| {
            e.index = index;
            e
        })
        .collect()
}

/// Runs the full DES over `instructions` and returns the retired schedule.
pub fn run(instructions: &[Instruction]) -> RunOutcome {
    let mut ctx = SimulationContext::new();
    let mut pending = seed_events(instructions);
    let mut retirements = RetirementHeap::new();
    let mut terminated_early = false;

    info!(count = instructions.len(), "seeded pending queue");

    while let Some(mut event) = pending.pop() {
        match event.kind {
            EventKind::Issue => transition_issue(&mut event, &mut ctx, &mut pending),
            EventKind::Start => transition_start(&mut event, &mut ctx, &mut pending),
            EventKind::Writeback => {
                if transition_writeback(&mut event, &mut ctx, &mut pending, &mut retirements) {
                    warn!(
                        index = event.index,
                        instr = %event.instr.risc_string(),
                        "NaN result retired; terminating simulation early"
                    );
                    terminated_early = true;
                    break;
                }
            }
        }
    }

    let retired = retirements.drain_in_order();
    debug!(retired = retired.len(), terminated_early, "run complete");
    RunOutcome {
        retired,
        terminated_early,
    }
}

fn transition_issue(event: &mut Event, ctx: &mut SimulationContext, pending: &mut PendingQueue) {
    if ctx.stages.is_available(Stage::Issue, event.curr_time) {
        event.issue = event.curr_time;
        ctx.stages.occupy(Stage::Issue, event.curr_time);
        event.kind = EventKind::Start;
    } else {
        event.curr_time = ctx.stages.use_after(Stage::Issue);
    }
    pending.push(event.clone());
}

fn transition_start(event: &mut Event, ctx: &mut SimulationContext, pending: &mut PendingQueue) {
    let instr = &event.instr;
    let op = &instr.op;
    let dst_ready = ctx.registers.is_available(instr.dst, event.curr_time);
    let src1_ready = ctx.registers.is_available(instr.src1, event.curr_time);
    let src2_ready = instr.src2 == NO_SRC
        || ctx
            .registers
            .is_available(instr.src2 as u8, event.curr_time);
    let fu_ready = ctx.functional_units.is_available(op, event.curr_time);

    if dst_ready && src1_ready && src2_ready && fu_ready {
        let latency = ctx.functional_units.latency(op);
        let upd = event.curr_time + latency;

        event.start = event.curr_time;
        // Zero-latency units (unrecognized opcodes, §4.3) would underflow
        // `upd - 1` here; the original C++ used a signed `int` and let it
        // go to -1, so saturate instead of propagating that into a u64 panic.
        event.complete = upd.saturating_sub(1);

        // Sources are read before the destination is written, so this is
        // safe even when dst aliases src1/src2.
        let result = compute_result(instr, &ctx.registers);
        ctx.registers.commit(instr.dst, result, upd);
        ctx.functional_units.reserve(op, upd);

        event.result = result;
        event.curr_time = upd;
        event.kind = EventKind::Writeback;
    } else {
        let mut binding = ctx.functional_units.free_at(op);
        binding = binding.max(ctx.registers.get(instr.dst).free_at);
        binding = binding.max(ctx.registers.get(instr.src1).free_at);
        if instr.src2 != NO_SRC {
            binding = binding.max(ctx.registers.get(instr.src2 as u8).free_at);
        }
        event.curr_time = binding;
    }
    pending.push(event.clone());
}

fn transition_writeback(
    event: &mut Event,
    ctx: &mut SimulationContext,
    pending: &mut PendingQueue,
    retirements: &mut RetirementHeap,
) -> bool {
    if ctx.stages.is_available(Stage::Writeback, event.curr_time) {
        event.writeback = event.curr_time;
        ctx.stages.occupy(Stage::Writeback, event.curr_time);
        let nan_hit = is_nan(event.result);
        retirements.push(event.clone());
        nan_hit
    } else {
        event.curr_time = ctx.stages.use_after(Stage::Writeback);
        pending.push(event.clone());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Opcode;

    fn trace(lines: &[(u64, Opcode, u8, u8, i16)]) -> Vec<Instruction> {
        lines
            .iter()
            .map(|(c, op, d, s1, s2)| Instruction::new(*c, op.clone(), *d, *s1, *s2))
            .collect()
    }

    #[test]
    fn single_fadd_s_matches_worked_example() {
        let instrs = trace(&[(0, Opcode::FaddS, 1, 2, 3)]);
        let outcome = run(&instrs);
        assert_eq!(outcome.retired.len(), 1);
        let e = &outcome.retired[0];
        assert_eq!(e.issue, 0);
        assert_eq!(e.start, 0);
        assert_eq!(e.complete, 2);
        assert_eq!(e.writeback, 3);
        assert!((e.result - 6.293525966).abs() < 1e-6);
    }

    #[test]
    fn back_to_back_fmul_s_structural_hazard() {
        let instrs = trace(&[(0, Opcode::FmulS, 1, 2, 3), (0, Opcode::FmulS, 4, 2, 3)]);
        let outcome = run(&instrs);
        assert_eq!(outcome.retired.len(), 2);
        let first = &outcome.retired[0];
        let second = &outcome.retired[1];
        assert_eq!(first.start, 0);
        assert_eq!(second.start, 4);
        assert_eq!(second.complete, 7);
        assert_eq!(second.writeback, 8);
    }

    #[test]
    fn raw_on_destination_register() {
        let instrs = trace(&[(0, Opcode::FaddD, 1, 2, 3), (0, Opcode::FaddD, 5, 1, 4)]);
        let outcome = run(&instrs);
        assert_eq!(outcome.retired[1].start, 5);
    }

    #[test]
    fn fmov_without_src2() {
        let instrs = trace(&[(0, Opcode::FmovS, 7, 2, NO_SRC)]);
        let outcome = run(&instrs);
        let e = &outcome.retired[0];
        assert_eq!(e.instr.risc_string(), "FMOV.S R7 R2");
        assert_eq!(e.start, 0);
        assert_eq!(e.complete, 0);
        assert_eq!(e.writeback, 1);
    }

    #[test]
    fn divide_by_zero_terminates_early() {
        let instrs = trace(&[
            (0, Opcode::FsubD, 3, 4, 4),
            (0, Opcode::FdivD, 1, 2, 3),
            (0, Opcode::FaddS, 5, 6, 7),
        ]);
        let outcome = run(&instrs);
        assert!(outcome.terminated_early);
        assert_eq!(outcome.retired.len(), 2);
        assert!(is_nan(outcome.retired[1].result));
    }

    #[test]
    fn same_cycle_issue_serializes_in_input_order() {
        let instrs = trace(&[
            (0, Opcode::FaddS, 1, 2, 3),
            (0, Opcode::FsubS, 4, 5, 6),
            (0, Opcode::FmulD, 7, 8, 9),
        ]);
        let outcome = run(&instrs);
        let issues: Vec<u64> = outcome.retired.iter().map(|e| e.issue).collect();
        assert_eq!(issues, vec![0, 1, 2]);
    }

    #[test]
    fn unknown_opcode_at_cycle_zero_does_not_underflow_complete() {
        let instrs = trace(&[(0, Opcode::Unknown("FOO.S".to_string()), 1, 2, 3)]);
        let outcome = run(&instrs);
        assert!(outcome.terminated_early);
        let e = &outcome.retired[0];
        assert_eq!(e.start, 0);
        assert_eq!(e.complete, 0);
        assert!(is_nan(e.result));
    }
}
