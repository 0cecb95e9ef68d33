// The program graph: what the parser hands to the evaluator.
//
// Statements execute in sequence order; a while loop nests its body
// as a sub-sequence. Literal elements keep the raw source text, and
// decoding happens at evaluation time.


// A sequence of syntax nodes.
pub type Seq<T> = Vec<T>;


// Binary operators. `Is` and `In` are accepted by the grammar but
// have no evaluation rule; the dispatcher reports them as invalid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Operator {
    Plus,
    Minus,
    Asterisk,
    Power,
    Mod,
    Div,
    Equal,
    NotEqual,
    Lt,
    Lte,
    Gt,
    Gte,
    Is,
    In,
}


// The smallest syntax leaf: a literal or an identifier.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    IntLiteral(String),
    RealLiteral(String),
    StrLiteral(String),
    True,
    False,
    None,
    Identifier(String),
}


// One element, or two elements joined by an operator. No prefix
// operators reach this level: the parser folds a numeric sign into
// the literal text.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Unary(Element),
    Binary(Element, Operator, Element),
}


// A call to a built-in function, with at most one argument.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub parameter: Option<Element>,
}


// The right-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum RValue {
    Expr(Expr),
    Call(FunctionCall),
}


#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Assignment { var_name: String, rhs: RValue },
    FunctionCall(FunctionCall),
    WhileLoop { condition: Expr, body: Seq<Stmt> },
    Pass,
}


// A statement, tagged with its source line for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub line: u32,
    pub kind: StmtKind,
}


pub type Program = Seq<Stmt>;
