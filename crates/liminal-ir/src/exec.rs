//! The IR interpreter.
//!
//! Single-threaded: one function activation at a time, a per-activation
//! slot array sized to the function's temp count, and a per-activation
//! environment layered over the caller's. Standard input/output and the
//! oracle are parameters of the execution call. The interpreter never
//! aborts on its own: every failure is either captured as a Result value
//! or silently defaulted to an empty/zero value.

use std::io::{BufRead, Write};

use liminal_rt::env::Env;
use liminal_rt::json::{validate_flat_object, FieldKind};
use liminal_rt::oracle::Oracle;
use liminal_rt::value::{parse_input, Value, ValueRepr};
use liminal_typeck::ty::{SchemaDef, Ty};

use crate::ir::{Function, Opcode, Program};

/// Execute a validated program: run its entry function (the first one)
/// against the given streams and oracle.
pub fn execute(
    prog: &Program,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    oracle: &mut dyn Oracle,
) -> std::io::Result<()> {
    let Some(entry) = prog.funcs.first() else {
        return Ok(());
    };
    let mut env = Env::new();
    execute_func(prog, entry, &mut env, input, out, oracle)?;
    Ok(())
}

/// Validation kinds for a schema's fields.
fn schema_field_kinds(schema: &SchemaDef) -> Vec<(String, FieldKind)> {
    schema
        .fields
        .iter()
        .map(|f| {
            let kind = match f.ty.resolved() {
                Ty::Int | Ty::Byte | Ty::Enum(_) => FieldKind::Int,
                Ty::Real => FieldKind::Real,
                Ty::Bool => FieldKind::Bool,
                Ty::Str | Ty::Char => FieldKind::Str,
                _ => FieldKind::Any,
            };
            (f.name.clone(), kind)
        })
        .collect()
}

/// Index into the slot array; absent operands read as default zero.
fn slot(temps: &[Value], idx: i32) -> Value {
    if idx >= 0 {
        temps.get(idx as usize).cloned().unwrap_or_default()
    } else {
        Value::default()
    }
}

fn set_slot(temps: &mut [Value], idx: i32, value: Value) {
    if idx >= 0 {
        if let Some(slot) = temps.get_mut(idx as usize) {
            *slot = value;
        }
    }
}

fn find_label(func: &Function, name: &str) -> Option<usize> {
    func.instrs.iter().position(|ins| {
        ins.op == Opcode::Label && ins.s.as_deref() == Some(name)
    })
}

/// Run one function activation to completion and produce its return value:
/// the operand of an explicit `ret`, or the value of the local `Result`.
fn execute_func(
    prog: &Program,
    func: &Function,
    env: &mut Env<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    oracle: &mut dyn Oracle,
) -> std::io::Result<Value> {
    let mut temps: Vec<Value> = vec![Value::default(); func.temp_count()];
    let mut ip = 0usize;

    while ip < func.instrs.len() {
        let ins = &func.instrs[ip];
        match ins.op {
            Opcode::Nop | Opcode::Label => {}

            Opcode::ConstInt => set_slot(&mut temps, ins.dest, Value::int(ins.imm)),
            Opcode::ConstReal => set_slot(&mut temps, ins.dest, Value::real(ins.fimm)),
            Opcode::ConstBool => set_slot(&mut temps, ins.dest, Value::bool(ins.imm != 0)),
            Opcode::ConstString => set_slot(
                &mut temps,
                ins.dest,
                Value::str(ins.s.as_deref().unwrap_or("")),
            ),
            Opcode::ConstOptionalNone => set_slot(&mut temps, ins.dest, Value::nothing()),

            Opcode::LoadVar => {
                let name = ins.s.as_deref().unwrap_or("");
                let value = env.get(name).with_origin(name);
                set_slot(&mut temps, ins.dest, value);
            }
            Opcode::StoreVar => {
                let name = ins.s.as_deref().unwrap_or("");
                env.set(name, slot(&temps, ins.arg1));
            }

            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod => {
                let a = slot(&temps, ins.arg1);
                let b = slot(&temps, ins.arg2);
                let value = arith(ins.op, &a, &b);
                set_slot(&mut temps, ins.dest, value);
            }

            Opcode::Eq | Opcode::Neq | Opcode::Lt | Opcode::Gt | Opcode::Le | Opcode::Ge => {
                let a = slot(&temps, ins.arg1);
                let b = slot(&temps, ins.arg2);
                set_slot(&mut temps, ins.dest, Value::bool(compare(ins.op, &a, &b)));
            }

            Opcode::And | Opcode::Or => {
                let a = slot(&temps, ins.arg1).is_truthy();
                let b = slot(&temps, ins.arg2).is_truthy();
                let value = if ins.op == Opcode::And { a && b } else { a || b };
                set_slot(&mut temps, ins.dest, Value::bool(value));
            }

            Opcode::Jump => {
                if let Some(target) = find_label(func, ins.s.as_deref().unwrap_or("")) {
                    ip = target;
                    continue;
                }
            }
            Opcode::JumpIfFalse => {
                if !slot(&temps, ins.arg1).is_truthy() {
                    if let Some(target) = find_label(func, ins.s.as_deref().unwrap_or("")) {
                        ip = target;
                        continue;
                    }
                }
            }

            Opcode::Ret => return Ok(slot(&temps, ins.arg1)),

            Opcode::Print => {
                write!(out, "{}", slot(&temps, ins.arg1))?;
                out.flush()?;
            }
            Opcode::Println => {
                if ins.arg1 >= 0 {
                    write!(out, "{}", slot(&temps, ins.arg1))?;
                }
                writeln!(out)?;
                out.flush()?;
            }
            Opcode::Readln => {
                let mut line = String::new();
                input.read_line(&mut line)?;
                let trimmed = line.trim_end_matches(['\n', '\r']);
                let name = ins.s.as_deref().unwrap_or("");
                env.set(name, parse_input(trimmed));
            }
            Opcode::ReadFile => {
                let path_value = slot(&temps, ins.arg1);
                let contents = match &path_value.repr {
                    ValueRepr::Str(path) => std::fs::read_to_string(path).unwrap_or_default(),
                    _ => String::new(),
                };
                set_slot(&mut temps, ins.dest, Value::str(contents));
            }
            Opcode::WriteFile => {
                let path_value = slot(&temps, ins.arg1);
                let content_value = slot(&temps, ins.arg2);
                if let (ValueRepr::Str(path), ValueRepr::Str(content)) =
                    (&path_value.repr, &content_value.repr)
                {
                    let _ = std::fs::write(path, content);
                }
            }

            Opcode::Ask => {
                let prompt_value = slot(&temps, ins.arg1);
                let prompt = match &prompt_value.repr {
                    ValueRepr::Str(s) => s.clone(),
                    _ => String::new(),
                };
                let value = match oracle.call_text(&prompt) {
                    Ok(text) => match ins.s2.as_deref() {
                        Some(schema_name) => match prog.schemas.get(schema_name) {
                            Some(schema) => {
                                let fields = schema_field_kinds(schema);
                                match validate_flat_object(&text, &fields) {
                                    Ok(()) => Value::ok(text),
                                    Err(reason) => Value::err(reason),
                                }
                            }
                            None => Value::err("schema not found"),
                        },
                        None => Value::ok(text),
                    },
                    Err(reason) => {
                        if ins.arg2 >= 0 {
                            let fb = slot(&temps, ins.arg2);
                            match &fb.repr {
                                ValueRepr::Str(s) => Value::ok(s.clone()),
                                ValueRepr::Res(Ok(text)) => Value::ok(text.clone()),
                                _ => Value::ok(""),
                            }
                        } else {
                            Value::err(reason)
                        }
                    }
                };
                set_slot(&mut temps, ins.dest, value);
            }

            Opcode::ResultUnwrap => {
                let rv = slot(&temps, ins.arg1);
                let value = match &rv.repr {
                    ValueRepr::Res(Ok(text)) => Value::str(text.clone()),
                    ValueRepr::Res(Err(_)) => {
                        let fb = slot(&temps, ins.arg2);
                        match &fb.repr {
                            ValueRepr::Str(s) if ins.arg2 >= 0 => Value::str(s.clone()),
                            _ => Value::str(""),
                        }
                    }
                    ValueRepr::Str(s) => Value::str(s.clone()),
                    _ => Value::str(""),
                };
                set_slot(&mut temps, ins.dest, value);
            }
            Opcode::ResultIsOk => {
                let rv = slot(&temps, ins.arg1);
                let ok = matches!(rv.repr, ValueRepr::Res(Ok(_)));
                set_slot(&mut temps, ins.dest, Value::bool(ok));
            }
            Opcode::ResultUnwrapErr => {
                let rv = slot(&temps, ins.arg1);
                let value = match &rv.repr {
                    ValueRepr::Res(Err(reason)) => Value::str(reason.clone()),
                    _ => Value::str(""),
                };
                set_slot(&mut temps, ins.dest, value);
            }
            Opcode::MakeResultOk => {
                let v = slot(&temps, ins.arg1);
                let text = v.scalar_text().unwrap_or_default();
                set_slot(&mut temps, ins.dest, Value::ok(text));
            }
            Opcode::MakeResultErr => {
                let v = slot(&temps, ins.arg1);
                let text = v.scalar_text().unwrap_or_default();
                set_slot(&mut temps, ins.dest, Value::err(text));
            }
            Opcode::Concat => {
                let a = slot(&temps, ins.arg1);
                let b = slot(&temps, ins.arg2);
                let joined = format!("{}{}", a.concat_text(), b.concat_text());
                set_slot(&mut temps, ins.dest, Value::str(joined));
            }
            Opcode::ResultOrFallback => {
                let rv = slot(&temps, ins.arg1);
                let value = match &rv.repr {
                    ValueRepr::Res(Ok(text)) => Value::ok(text.clone()),
                    ValueRepr::Res(Err(reason)) => {
                        let fb = slot(&temps, ins.arg2);
                        match &fb.repr {
                            ValueRepr::Str(s) if ins.arg2 >= 0 => Value::ok(s.clone()),
                            _ => Value::err(reason.clone()),
                        }
                    }
                    ValueRepr::Str(s) => Value::ok(s.clone()),
                    _ => Value::err("invalid result"),
                };
                set_slot(&mut temps, ins.dest, value);
            }

            Opcode::Call => {
                let name = ins.s.as_deref().unwrap_or("");
                let value = match prog.func(name) {
                    Some(callee) => {
                        let mut child = Env::with_parent(&*env);
                        if let Some(param) = callee.params.first() {
                            if ins.arg1 >= 0 {
                                child.set(param, slot(&temps, ins.arg1));
                            }
                        }
                        if let Some(param) = callee.params.get(1) {
                            if ins.arg2 >= 0 {
                                child.set(param, slot(&temps, ins.arg2));
                            }
                        }
                        execute_func(prog, callee, &mut child, input, out, oracle)?
                    }
                    None => Value::default(),
                };
                set_slot(&mut temps, ins.dest, value);
            }

            Opcode::Index => {
                let idx_value = slot(&temps, ins.arg2);
                let idx = match idx_value.repr {
                    ValueRepr::Real(v) => v as i64,
                    ValueRepr::Int(v) => v,
                    _ => 0,
                };
                let value = match ins.s.as_deref() {
                    Some(base) => {
                        let name = format!("{base}.{idx}");
                        env.get(&name).with_origin(name)
                    }
                    None => Value::default(),
                };
                set_slot(&mut temps, ins.dest, value);
            }
        }
        ip += 1;
    }

    Ok(env.get("Result"))
}

/// Arithmetic with the string-overloaded `add`: if either operand is a
/// string, both stringify and concatenate. Division and modulo by zero
/// yield zero. A result stays integral unless either operand was real.
fn arith(op: Opcode, a: &Value, b: &Value) -> Value {
    if op == Opcode::Add
        && (matches!(a.repr, ValueRepr::Str(_)) || matches!(b.repr, ValueRepr::Str(_)))
    {
        return Value::str(format!("{}{}", a.concat_text(), b.concat_text()));
    }
    let da = a.as_f64();
    let db = b.as_f64();
    let result = match op {
        Opcode::Add => da + db,
        Opcode::Sub => da - db,
        Opcode::Mul => da * db,
        Opcode::Div => {
            if db != 0.0 {
                da / db
            } else {
                0.0
            }
        }
        Opcode::Mod => {
            let ib = db as i64;
            if ib != 0 {
                ((da as i64) % ib) as f64
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    let any_real = matches!(a.repr, ValueRepr::Real(_)) || matches!(b.repr, ValueRepr::Real(_));
    if any_real {
        Value::real(result)
    } else {
        Value::int(result as i64)
    }
}

/// Comparison: two strings compare lexically, anything else numerically.
fn compare(op: Opcode, a: &Value, b: &Value) -> bool {
    if let (ValueRepr::Str(sa), ValueRepr::Str(sb)) = (&a.repr, &b.repr) {
        return match op {
            Opcode::Eq => sa == sb,
            Opcode::Neq => sa != sb,
            Opcode::Lt => sa < sb,
            Opcode::Gt => sa > sb,
            Opcode::Le => sa <= sb,
            Opcode::Ge => sa >= sb,
            _ => false,
        };
    }
    let da = a.as_f64();
    let db = b.as_f64();
    match op {
        Opcode::Eq => da == db,
        Opcode::Neq => da != db,
        Opcode::Lt => da < db,
        Opcode::Gt => da > db,
        Opcode::Le => da <= db,
        Opcode::Ge => da >= db,
        _ => false,
    }
}
