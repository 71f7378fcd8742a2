//! The Liminal register IR.
//!
//! A program is a flat list of instructions per function plus the schema
//! table. Each instruction has an opcode, a destination slot, two source
//! slots (`NO_SLOT` denotes absence), integer and real immediates, and up
//! to two string fields (variable names, label names, oracle names, schema
//! names). Slots are numbered, function-local temporaries allocated
//! monotonically by the builder.

use std::fmt;

use liminal_typeck::ty::SchemaTable;

/// Sentinel for an absent slot operand.
pub const NO_SLOT: i32 = -1;

/// Every IR opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Nop,
    // Constants
    ConstInt,
    ConstReal,
    ConstString,
    ConstBool,
    ConstOptionalNone,
    // Variable IO
    LoadVar,
    StoreVar,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    // Logic
    And,
    Or,
    // Control
    Jump,
    JumpIfFalse,
    Label,
    Ret,
    // IO
    Print,
    Println,
    Readln,
    ReadFile,
    WriteFile,
    // Oracle
    Ask,
    // Result helpers
    ResultUnwrap,
    ResultIsOk,
    ResultUnwrapErr,
    MakeResultOk,
    MakeResultErr,
    Concat,
    ResultOrFallback,
    // Function call
    Call,
    // Field-path indexing
    Index,
}

impl Opcode {
    fn name(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::ConstInt => "CONST_INT",
            Opcode::ConstReal => "CONST_REAL",
            Opcode::ConstString => "CONST_STRING",
            Opcode::ConstBool => "CONST_BOOL",
            Opcode::ConstOptionalNone => "CONST_NONE",
            Opcode::LoadVar => "LOAD_VAR",
            Opcode::StoreVar => "STORE_VAR",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Eq => "EQ",
            Opcode::Neq => "NEQ",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Le => "LE",
            Opcode::Ge => "GE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfFalse => "JUMP_IF_FALSE",
            Opcode::Label => "LABEL",
            Opcode::Ret => "RET",
            Opcode::Print => "PRINT",
            Opcode::Println => "PRINTLN",
            Opcode::Readln => "READLN",
            Opcode::ReadFile => "READ_FILE",
            Opcode::WriteFile => "WRITE_FILE",
            Opcode::Ask => "ASK",
            Opcode::ResultUnwrap => "RESULT_UNWRAP",
            Opcode::ResultIsOk => "RESULT_IS_OK",
            Opcode::ResultUnwrapErr => "RESULT_UNWRAP_ERR",
            Opcode::MakeResultOk => "RESULT_OK",
            Opcode::MakeResultErr => "RESULT_ERR",
            Opcode::Concat => "CONCAT",
            Opcode::ResultOrFallback => "RESULT_OR_FALLBACK",
            Opcode::Call => "CALL",
            Opcode::Index => "INDEX",
        }
    }
}

/// One IR instruction.
#[derive(Debug, Clone)]
pub struct Instr {
    pub op: Opcode,
    /// Destination slot, or `NO_SLOT`.
    pub dest: i32,
    /// First source slot, or `NO_SLOT`.
    pub arg1: i32,
    /// Second source slot, or `NO_SLOT`.
    pub arg2: i32,
    /// Integer immediate (constants).
    pub imm: i64,
    /// Real immediate (constants).
    pub fimm: f64,
    /// Variable name, label name, oracle name, or callee name.
    pub s: Option<String>,
    /// Auxiliary string: the schema name of an `ask`.
    pub s2: Option<String>,
}

impl Instr {
    fn new(op: Opcode) -> Instr {
        Instr {
            op,
            dest: NO_SLOT,
            arg1: NO_SLOT,
            arg2: NO_SLOT,
            imm: 0,
            fimm: 0.0,
            s: None,
            s2: None,
        }
    }
}

/// A lowered function: a name, positional parameter names, and a linear
/// instruction sequence. `temp_count` is the builder's running temp
/// counter, which sizes the interpreter's slot array.
#[derive(Debug, Clone, Default)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub instrs: Vec<Instr>,
    next_temp: i32,
    next_label: u32,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Function {
        Function {
            name: name.into(),
            ..Function::default()
        }
    }

    /// Number of slots this function's activation needs.
    pub fn temp_count(&self) -> usize {
        self.next_temp as usize
    }

    fn new_temp(&mut self) -> i32 {
        let t = self.next_temp;
        self.next_temp += 1;
        t
    }

    /// A fresh label name built from a stem, unique within this function.
    pub fn fresh_label(&mut self, stem: &str) -> String {
        let n = self.next_label;
        self.next_label += 1;
        format!("{stem}{n}")
    }

    fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    fn emit_with_dest(&mut self, mut instr: Instr) -> i32 {
        let t = self.new_temp();
        instr.dest = t;
        self.emit(instr);
        t
    }

    // ── Builder API ────────────────────────────────────────────────────

    pub fn emit_const_int(&mut self, value: i64) -> i32 {
        let mut i = Instr::new(Opcode::ConstInt);
        i.imm = value;
        self.emit_with_dest(i)
    }

    pub fn emit_const_real(&mut self, value: f64) -> i32 {
        let mut i = Instr::new(Opcode::ConstReal);
        i.fimm = value;
        self.emit_with_dest(i)
    }

    pub fn emit_const_string(&mut self, value: &str) -> i32 {
        let mut i = Instr::new(Opcode::ConstString);
        i.s = Some(value.to_string());
        self.emit_with_dest(i)
    }

    pub fn emit_const_bool(&mut self, value: bool) -> i32 {
        let mut i = Instr::new(Opcode::ConstBool);
        i.imm = i64::from(value);
        self.emit_with_dest(i)
    }

    pub fn emit_const_none(&mut self) -> i32 {
        self.emit_with_dest(Instr::new(Opcode::ConstOptionalNone))
    }

    pub fn emit_load_var(&mut self, name: &str) -> i32 {
        let mut i = Instr::new(Opcode::LoadVar);
        i.s = Some(name.to_string());
        self.emit_with_dest(i)
    }

    pub fn emit_store_var(&mut self, name: &str, src: i32) {
        let mut i = Instr::new(Opcode::StoreVar);
        i.s = Some(name.to_string());
        i.arg1 = src;
        self.emit(i);
    }

    pub fn emit_binop(&mut self, op: Opcode, lhs: i32, rhs: i32) -> i32 {
        let mut i = Instr::new(op);
        i.arg1 = lhs;
        i.arg2 = rhs;
        self.emit_with_dest(i)
    }

    pub fn emit_jump(&mut self, label: &str) {
        let mut i = Instr::new(Opcode::Jump);
        i.s = Some(label.to_string());
        self.emit(i);
    }

    pub fn emit_jump_if_false(&mut self, cond: i32, label: &str) {
        let mut i = Instr::new(Opcode::JumpIfFalse);
        i.arg1 = cond;
        i.s = Some(label.to_string());
        self.emit(i);
    }

    pub fn emit_label(&mut self, label: &str) {
        let mut i = Instr::new(Opcode::Label);
        i.s = Some(label.to_string());
        self.emit(i);
    }

    pub fn emit_ret(&mut self, src: i32) {
        let mut i = Instr::new(Opcode::Ret);
        i.arg1 = src;
        self.emit(i);
    }

    pub fn emit_print(&mut self, src: i32) {
        let mut i = Instr::new(Opcode::Print);
        i.arg1 = src;
        self.emit(i);
    }

    /// Print with newline; `NO_SLOT` prints a blank line.
    pub fn emit_println(&mut self, src: i32) {
        let mut i = Instr::new(Opcode::Println);
        i.arg1 = src;
        self.emit(i);
    }

    pub fn emit_readln(&mut self, name: &str) {
        let mut i = Instr::new(Opcode::Readln);
        i.s = Some(name.to_string());
        self.emit(i);
    }

    pub fn emit_read_file(&mut self, path: i32) -> i32 {
        let mut i = Instr::new(Opcode::ReadFile);
        i.arg1 = path;
        self.emit_with_dest(i)
    }

    pub fn emit_write_file(&mut self, path: i32, content: i32) {
        let mut i = Instr::new(Opcode::WriteFile);
        i.arg1 = path;
        i.arg2 = content;
        self.emit(i);
    }

    pub fn emit_ask(
        &mut self,
        prompt: i32,
        fallback: i32,
        oracle: &str,
        schema: Option<&str>,
    ) -> i32 {
        let mut i = Instr::new(Opcode::Ask);
        i.arg1 = prompt;
        i.arg2 = fallback;
        i.s = Some(oracle.to_string());
        i.s2 = schema.map(|s| s.to_string());
        self.emit_with_dest(i)
    }

    pub fn emit_result_unwrap(&mut self, result: i32, fallback: i32) -> i32 {
        let mut i = Instr::new(Opcode::ResultUnwrap);
        i.arg1 = result;
        i.arg2 = fallback;
        self.emit_with_dest(i)
    }

    pub fn emit_result_is_ok(&mut self, result: i32) -> i32 {
        let mut i = Instr::new(Opcode::ResultIsOk);
        i.arg1 = result;
        self.emit_with_dest(i)
    }

    pub fn emit_result_unwrap_err(&mut self, result: i32) -> i32 {
        let mut i = Instr::new(Opcode::ResultUnwrapErr);
        i.arg1 = result;
        self.emit_with_dest(i)
    }

    pub fn emit_make_result_ok(&mut self, src: i32) -> i32 {
        let mut i = Instr::new(Opcode::MakeResultOk);
        i.arg1 = src;
        self.emit_with_dest(i)
    }

    pub fn emit_make_result_err(&mut self, src: i32) -> i32 {
        let mut i = Instr::new(Opcode::MakeResultErr);
        i.arg1 = src;
        self.emit_with_dest(i)
    }

    pub fn emit_concat(&mut self, a: i32, b: i32) -> i32 {
        let mut i = Instr::new(Opcode::Concat);
        i.arg1 = a;
        i.arg2 = b;
        self.emit_with_dest(i)
    }

    pub fn emit_result_or_fallback(&mut self, result: i32, fallback: i32) -> i32 {
        let mut i = Instr::new(Opcode::ResultOrFallback);
        i.arg1 = result;
        i.arg2 = fallback;
        self.emit_with_dest(i)
    }

    /// Call with up to two arguments (`NO_SLOT` marks absence).
    pub fn emit_call(&mut self, name: &str, arg0: i32, arg1: i32) -> i32 {
        let mut i = Instr::new(Opcode::Call);
        i.s = Some(name.to_string());
        i.arg1 = arg0;
        i.arg2 = arg1;
        self.emit_with_dest(i)
    }

    /// Load `base.<idx>` where `base` is a variable name and `idx` is the
    /// value in the index slot.
    pub fn emit_index(&mut self, base: &str, idx: i32) -> i32 {
        let mut i = Instr::new(Opcode::Index);
        i.s = Some(base.to_string());
        i.arg2 = idx;
        self.emit_with_dest(i)
    }
}

/// A lowered program: functions (entry first) plus the schemas its `ask`
/// instructions reference.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub funcs: Vec<Function>,
    pub schemas: SchemaTable,
}

impl Program {
    /// Find a function by name.
    pub fn func(&self, name: &str) -> Option<&Function> {
        self.funcs.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.schemas.is_empty() {
            writeln!(f, "schemas")?;
            for schema in self.schemas.iter() {
                writeln!(f, "  {}", schema.name)?;
                for field in &schema.fields {
                    writeln!(f, "    {}", field.name)?;
                }
            }
        }
        for func in &self.funcs {
            writeln!(f, "func {}", func.name)?;
            for ins in &func.instrs {
                write_instr(f, ins)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_instr(f: &mut fmt::Formatter<'_>, ins: &Instr) -> fmt::Result {
    let name = ins.op.name();
    let s = ins.s.as_deref().unwrap_or("");
    match ins.op {
        Opcode::ConstInt | Opcode::ConstBool => {
            writeln!(f, "  t{} = {} {}", ins.dest, name, ins.imm)
        }
        Opcode::ConstReal => writeln!(f, "  t{} = {} {}", ins.dest, name, ins.fimm),
        Opcode::ConstString => writeln!(f, "  t{} = {} \"{}\"", ins.dest, name, s),
        Opcode::ConstOptionalNone => writeln!(f, "  t{} = {}", ins.dest, name),
        Opcode::LoadVar => writeln!(f, "  t{} = {} {}", ins.dest, name, s),
        Opcode::StoreVar => writeln!(f, "  {} = t{}", s, ins.arg1),
        Opcode::Index => writeln!(f, "  t{} = {} {} t{}", ins.dest, name, s, ins.arg2),
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod
        | Opcode::Eq
        | Opcode::Neq
        | Opcode::Lt
        | Opcode::Gt
        | Opcode::Le
        | Opcode::Ge
        | Opcode::And
        | Opcode::Or
        | Opcode::Concat
        | Opcode::ResultUnwrap
        | Opcode::ResultOrFallback => {
            writeln!(f, "  t{} = {} t{}, t{}", ins.dest, name, ins.arg1, ins.arg2)
        }
        Opcode::Jump => writeln!(f, "  {} L{}", name, s),
        Opcode::JumpIfFalse => writeln!(f, "  {} t{}, L{}", name, ins.arg1, s),
        Opcode::Label => writeln!(f, "L{}:", s),
        Opcode::Ret => writeln!(f, "  RET t{}", ins.arg1),
        Opcode::Print => writeln!(f, "  {} t{}", name, ins.arg1),
        Opcode::Println => {
            if ins.arg1 >= 0 {
                writeln!(f, "  {} t{}", name, ins.arg1)
            } else {
                writeln!(f, "  {}", name)
            }
        }
        Opcode::Readln => writeln!(f, "  {} {}", name, s),
        Opcode::ReadFile => writeln!(f, "  t{} = {} t{}", ins.dest, name, ins.arg1),
        Opcode::WriteFile => writeln!(f, "  {} t{}, t{}", name, ins.arg1, ins.arg2),
        Opcode::Ask => match ins.s2.as_deref() {
            Some(schema) if !schema.is_empty() => writeln!(
                f,
                "  t{} = {} t{}, fallback t{} oracle {} schema {}",
                ins.dest, name, ins.arg1, ins.arg2, s, schema
            ),
            _ => writeln!(
                f,
                "  t{} = {} t{}, fallback t{} oracle {}",
                ins.dest, name, ins.arg1, ins.arg2, s
            ),
        },
        Opcode::ResultIsOk | Opcode::ResultUnwrapErr | Opcode::MakeResultOk
        | Opcode::MakeResultErr => {
            writeln!(f, "  t{} = {} t{}", ins.dest, name, ins.arg1)
        }
        Opcode::Call => {
            if ins.arg2 >= 0 {
                writeln!(
                    f,
                    "  t{} = {} {} t{}, t{}",
                    ins.dest, name, s, ins.arg1, ins.arg2
                )
            } else if ins.arg1 >= 0 {
                writeln!(f, "  t{} = {} {} t{}", ins.dest, name, s, ins.arg1)
            } else {
                writeln!(f, "  t{} = {} {}", ins.dest, name, s)
            }
        }
        Opcode::Nop => writeln!(f, "  {}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temps_allocate_monotonically() {
        let mut f = Function::new("main");
        let a = f.emit_const_int(1);
        let b = f.emit_const_int(2);
        let c = f.emit_binop(Opcode::Add, a, b);
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(f.temp_count(), 3);
    }

    #[test]
    fn fresh_labels_are_unique() {
        let mut f = Function::new("main");
        let a = f.fresh_label("loop");
        let b = f.fresh_label("loop");
        assert_ne!(a, b);
    }

    #[test]
    fn display_lists_instructions() {
        let mut f = Function::new("main");
        let s = f.emit_const_string("hi");
        f.emit_println(s);
        let prog = Program {
            funcs: vec![f],
            schemas: Default::default(),
        };
        let printed = prog.to_string();
        assert!(printed.contains("func main"));
        assert!(printed.contains("t0 = CONST_STRING \"hi\""));
        assert!(printed.contains("PRINTLN t0"));
    }
}
