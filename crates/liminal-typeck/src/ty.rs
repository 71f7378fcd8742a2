//! Semantic type representation for the Liminal type checker.
//!
//! Primitives are unit variants (cheap, shared, immutable); composite types
//! own their parts. Equality is structural with two deliberate equivalences:
//! aliases are transparent, and an enum is assignment-compatible with Int.

use std::fmt;

/// A Liminal semantic type.
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    Int,
    Real,
    Bool,
    Str,
    Bytes,
    Char,
    Byte,
    /// Homogeneous array.
    Array(Box<Ty>),
    /// Fixed-shape tuple.
    Tuple(Vec<Ty>),
    /// Named alias, transparent for equality.
    Alias(String, Box<Ty>),
    /// Named oracle-output contract with ordered fields.
    Schema(String, Vec<(String, Ty)>),
    /// Anonymous record with ordered fields.
    Record(Vec<(String, Ty)>),
    /// Enumeration; variants are Int-valued constants.
    Enum(Vec<String>),
    /// `?T`
    Optional(Box<Ty>),
    /// `!T` -- ok and err sides.
    Result(Box<Ty>, Box<Ty>),
    /// Unresolved or erroneous.
    Unknown,
}

impl Ty {
    /// Create an optional type.
    pub fn optional(inner: Ty) -> Ty {
        Ty::Optional(Box::new(inner))
    }

    /// Create a result type.
    pub fn result(ok: Ty, err: Ty) -> Ty {
        Ty::Result(Box::new(ok), Box::new(err))
    }

    /// Create an array type.
    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }

    /// Whether this is a numeric type (Int or Real).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Real)
    }

    /// Follow alias targets to the underlying type.
    pub fn resolved(&self) -> &Ty {
        match self {
            Ty::Alias(_, target) => target.resolved(),
            other => other,
        }
    }

    /// The field list for record and schema types.
    pub fn fields(&self) -> Option<&[(String, Ty)]> {
        match self.resolved() {
            Ty::Schema(_, fields) | Ty::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a field's type on a record or schema.
    pub fn field(&self, name: &str) -> Option<&Ty> {
        self.fields()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }
}

/// Structural equality with transparent aliases and Enum≈Int.
pub fn ty_equals(a: &Ty, b: &Ty) -> bool {
    let a = a.resolved();
    let b = b.resolved();
    match (a, b) {
        (Ty::Enum(_), Ty::Int) | (Ty::Int, Ty::Enum(_)) => true,
        (Ty::Optional(ia), Ty::Optional(ib)) => ty_equals(ia, ib),
        (Ty::Result(oa, ea), Ty::Result(ob, eb)) => ty_equals(oa, ob) && ty_equals(ea, eb),
        (Ty::Array(ea), Ty::Array(eb)) => ty_equals(ea, eb),
        (Ty::Tuple(ta), Ty::Tuple(tb)) => {
            ta.len() == tb.len() && ta.iter().zip(tb).all(|(x, y)| ty_equals(x, y))
        }
        (Ty::Schema(_, fa) | Ty::Record(fa), Ty::Schema(_, fb) | Ty::Record(fb)) => {
            fa.len() == fb.len()
                && fa.iter().all(|(name, t)| {
                    fb.iter()
                        .find(|(n, _)| n == name)
                        .is_some_and(|(_, u)| ty_equals(t, u))
                })
        }
        (Ty::Enum(va), Ty::Enum(vb)) => va == vb,
        _ => std::mem::discriminant(a) == std::mem::discriminant(b),
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "Integer"),
            Ty::Real => write!(f, "Real"),
            Ty::Bool => write!(f, "Boolean"),
            Ty::Str => write!(f, "String"),
            Ty::Bytes => write!(f, "Bytes"),
            Ty::Char => write!(f, "Char"),
            Ty::Byte => write!(f, "Byte"),
            Ty::Array(elem) => write!(f, "array({elem})"),
            Ty::Tuple(elems) => {
                write!(f, "tuple<")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ">")
            }
            Ty::Alias(name, _) => write!(f, "{name}"),
            Ty::Schema(name, _) => write!(f, "{name}"),
            Ty::Record(_) => write!(f, "Record"),
            Ty::Enum(_) => write!(f, "Enum"),
            Ty::Optional(inner) => write!(f, "?{inner}"),
            Ty::Result(ok, _) => write!(f, "!{ok}"),
            Ty::Unknown => write!(f, "Unknown"),
        }
    }
}

// ── Schema table ───────────────────────────────────────────────────────

/// One field of a declared schema, with everything JSON Schema emission and
/// oracle validation need.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub ty: Ty,
    /// Natural-language `describe` annotation.
    pub description: Option<String>,
    /// `[min..max]` range (numeric) or length (string) lower bound.
    pub min: Option<i64>,
    /// Upper bound, as above.
    pub max: Option<i64>,
    /// `matching` regex source.
    pub pattern: Option<String>,
}

/// A declared schema: a named, ordered field list.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDef {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

impl SchemaDef {
    /// The semantic type of this schema.
    pub fn ty(&self) -> Ty {
        Ty::Schema(
            self.name.clone(),
            self.fields
                .iter()
                .map(|f| (f.name.clone(), f.ty.clone()))
                .collect(),
        )
    }
}

/// All schemas declared by a program, in declaration order.
///
/// The table outlives type checking: lowering clones it into the IR, which
/// owns the schemas its `ask` instructions reference.
#[derive(Clone, Debug, Default)]
pub struct SchemaTable {
    defs: Vec<SchemaDef>,
}

impl SchemaTable {
    pub fn push(&mut self, def: SchemaDef) {
        self.defs.push(def);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDef> {
        self.defs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_equality() {
        assert!(ty_equals(&Ty::Int, &Ty::Int));
        assert!(!ty_equals(&Ty::Int, &Ty::Real));
        assert!(!ty_equals(&Ty::Str, &Ty::Char));
    }

    #[test]
    fn alias_is_transparent() {
        let age = Ty::Alias("Age".into(), Box::new(Ty::Int));
        assert!(ty_equals(&age, &Ty::Int));
        assert!(ty_equals(&Ty::Int, &age));
        let nested = Ty::Alias("Years".into(), Box::new(age.clone()));
        assert!(ty_equals(&nested, &Ty::Int));
    }

    #[test]
    fn enum_is_int_compatible() {
        let color = Ty::Enum(vec!["Red".into(), "Green".into()]);
        assert!(ty_equals(&color, &Ty::Int));
        assert!(ty_equals(&Ty::Int, &color));
        assert!(!ty_equals(&color, &Ty::Real));
    }

    #[test]
    fn structural_composites() {
        assert!(ty_equals(&Ty::array(Ty::Int), &Ty::array(Ty::Int)));
        assert!(!ty_equals(&Ty::array(Ty::Int), &Ty::array(Ty::Str)));
        assert!(ty_equals(
            &Ty::Tuple(vec![Ty::Int, Ty::Str]),
            &Ty::Tuple(vec![Ty::Int, Ty::Str])
        ));
        assert!(!ty_equals(
            &Ty::Tuple(vec![Ty::Int]),
            &Ty::Tuple(vec![Ty::Int, Ty::Int])
        ));
    }

    #[test]
    fn schema_fields_compare_by_name() {
        let a = Ty::Schema(
            "P".into(),
            vec![("Name".into(), Ty::Str), ("Age".into(), Ty::Int)],
        );
        // Field order does not matter, names and types do.
        let b = Ty::Record(vec![("Age".into(), Ty::Int), ("Name".into(), Ty::Str)]);
        assert!(ty_equals(&a, &b));
        let c = Ty::Record(vec![("Name".into(), Ty::Str), ("Age".into(), Ty::Real)]);
        assert!(!ty_equals(&a, &c));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Ty::optional(Ty::Int).to_string(), "?Integer");
        assert_eq!(Ty::result(Ty::Str, Ty::Str).to_string(), "!String");
        assert_eq!(Ty::array(Ty::Real).to_string(), "array(Real)");
        assert_eq!(Ty::Tuple(vec![Ty::Int, Ty::Bool]).to_string(), "tuple<Integer,Boolean>");
    }
}
