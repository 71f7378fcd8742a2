//! IR validation: every branch target must be a label in the same function,
//! and no function may define the same label twice. Validation runs before
//! execution and is fatal on failure.

use rustc_hash::FxHashSet;

use crate::ir::{Opcode, Program};

/// Validate a lowered program. The error message names the offending
/// function and label.
pub fn validate(prog: &Program) -> Result<(), String> {
    for func in &prog.funcs {
        let mut labels: FxHashSet<&str> = FxHashSet::default();
        for ins in &func.instrs {
            if ins.op == Opcode::Label {
                let label = ins.s.as_deref().unwrap_or("");
                if !labels.insert(label) {
                    return Err(format!(
                        "duplicate label {} in function {}",
                        label, func.name
                    ));
                }
            }
        }
        for ins in &func.instrs {
            if matches!(ins.op, Opcode::Jump | Opcode::JumpIfFalse) {
                let target = ins.s.as_deref().unwrap_or("");
                if !labels.contains(target) {
                    return Err(format!(
                        "dangling label {} in function {}",
                        target, func.name
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Function;

    #[test]
    fn accepts_matched_jumps() {
        let mut f = Function::new("main");
        f.emit_label("start");
        let c = f.emit_const_bool(true);
        f.emit_jump_if_false(c, "end");
        f.emit_jump("start");
        f.emit_label("end");
        let prog = Program {
            funcs: vec![f],
            schemas: Default::default(),
        };
        assert!(validate(&prog).is_ok());
    }

    #[test]
    fn rejects_dangling_target() {
        let mut f = Function::new("main");
        f.emit_jump("nowhere");
        let prog = Program {
            funcs: vec![f],
            schemas: Default::default(),
        };
        let err = validate(&prog).unwrap_err();
        assert!(err.contains("dangling label nowhere"));
        assert!(err.contains("function main"));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let mut f = Function::new("helper");
        f.emit_label("twice");
        f.emit_label("twice");
        let prog = Program {
            funcs: vec![f],
            schemas: Default::default(),
        };
        let err = validate(&prog).unwrap_err();
        assert!(err.contains("duplicate label twice"));
        assert!(err.contains("function helper"));
    }

    #[test]
    fn labels_are_per_function() {
        // A jump may only target labels in its own function.
        let mut a = Function::new("a");
        a.emit_label("shared");
        let mut b = Function::new("b");
        b.emit_jump("shared");
        let prog = Program {
            funcs: vec![a, b],
            schemas: Default::default(),
        };
        assert!(validate(&prog).is_err());
    }
}
