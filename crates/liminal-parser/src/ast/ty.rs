//! Typed AST nodes for type expressions.

use crate::ast::item::FieldDecl;
use crate::ast::{ast_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Any type node.
#[derive(Debug, Clone)]
pub enum Type {
    Ref(TypeRef),
    Array(ArrayType),
    Tuple(TupleType),
    Record(RecordType),
    Enum(EnumType),
    Optional(OptionalType),
    Result(ResultType),
    Constrained(ConstrainedType),
    Schema(SchemaType),
}

impl Type {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TYPE_REF => Some(Type::Ref(TypeRef { syntax: node })),
            SyntaxKind::ARRAY_TYPE => Some(Type::Array(ArrayType { syntax: node })),
            SyntaxKind::TUPLE_TYPE => Some(Type::Tuple(TupleType { syntax: node })),
            SyntaxKind::RECORD_TYPE => Some(Type::Record(RecordType { syntax: node })),
            SyntaxKind::ENUM_TYPE => Some(Type::Enum(EnumType { syntax: node })),
            SyntaxKind::OPTIONAL_TYPE => Some(Type::Optional(OptionalType { syntax: node })),
            SyntaxKind::RESULT_TYPE => Some(Type::Result(ResultType { syntax: node })),
            SyntaxKind::CONSTRAINED_TYPE => {
                Some(Type::Constrained(ConstrainedType { syntax: node }))
            }
            SyntaxKind::SCHEMA_TYPE => Some(Type::Schema(SchemaType { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Type::Ref(n) => &n.syntax,
            Type::Array(n) => &n.syntax,
            Type::Tuple(n) => &n.syntax,
            Type::Record(n) => &n.syntax,
            Type::Enum(n) => &n.syntax,
            Type::Optional(n) => &n.syntax,
            Type::Result(n) => &n.syntax,
            Type::Constrained(n) => &n.syntax,
            Type::Schema(n) => &n.syntax,
        }
    }
}

// ── Type reference ───────────────────────────────────────────────────────

ast_node!(TypeRef, TYPE_REF);

impl TypeRef {
    /// The name token: an identifier or a primitive type keyword.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    /// The referenced name as text (`Integer`, `Person`, ...).
    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

// ── Composite types ──────────────────────────────────────────────────────

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    /// The element type.
    pub fn elem(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }

    /// The optional `[lo..hi]` length bounds.
    pub fn len_bounds(&self) -> (Option<i64>, Option<i64>) {
        let mut ints = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::INT_LITERAL)
            .map(|t| t.text().parse::<i64>().ok());
        (ints.next().flatten(), ints.next().flatten())
    }
}

ast_node!(TupleType, TUPLE_TYPE);

impl TupleType {
    pub fn elements(&self) -> impl Iterator<Item = Type> + '_ {
        self.syntax.children().filter_map(Type::cast)
    }
}

ast_node!(RecordType, RECORD_TYPE);

impl RecordType {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(EnumType, ENUM_TYPE);

impl EnumType {
    /// The variant names, in declaration order.
    pub fn variants(&self) -> Vec<String> {
        self.syntax
            .children()
            .filter_map(TypeRef::cast)
            .filter_map(|r| r.name())
            .collect()
    }
}

ast_node!(OptionalType, OPTIONAL_TYPE);

impl OptionalType {
    pub fn inner(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }
}

ast_node!(ResultType, RESULT_TYPE);

impl ResultType {
    /// The ok-side type. The err side defaults to String.
    pub fn ok(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }
}

ast_node!(ConstrainedType, CONSTRAINED_TYPE);

impl ConstrainedType {
    /// The constrained base type name.
    pub fn base(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    /// `[min..max]` bounds, when present.
    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        let mut ints = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::INT_LITERAL)
            .map(|t| t.text().parse::<i64>().ok());
        (ints.next().flatten(), ints.next().flatten())
    }

    /// The `matching '...'` pattern token, when present (still quoted).
    pub fn pattern(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::STRING_LITERAL)
            .or_else(|| child_token(&self.syntax, SyntaxKind::CHAR_LITERAL))
    }
}

ast_node!(SchemaType, SCHEMA_TYPE);

impl SchemaType {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + '_ {
        child_nodes(&self.syntax)
    }
}
