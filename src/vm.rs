// (C) 2020 Brandon Lewis
//
// A tree-walking evaluator for a small dynamically-typed language.
//
// *Execution Model*
//
// A program is a sequence of statements; a while loop nests its body
// as a sub-sequence. Execution advances statement by statement
// against an explicitly-passed Ram, and stops at the end of the
// program or at the first semantic error. Errors are reported on the
// console, not propagated to the embedding code.
//
// A taken while loop runs its body through a recursive walk, after
// which the outer walk does not resume.
//
// *Values*
//
// - none, int, real, str, bool, and a reserved ptr tag.
//
// Arithmetic mixes int and real freely, promoting to real. Strings
// support `+` (concatenation) and the relational operators. Bool
// never promotes to a number. The ptr tag is recognized by memory
// and the dump, but no evaluation rule produces one.
//
// *The Console*
//
// All program output, prompts, and diagnostics go through the
// Console trait, so tests can script stdin and capture stdout.

use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write as IoWrite};
use std::rc::Rc;

use enumflags2::BitFlags;

use crate::ast::{Element, Expr, FunctionCall, Operator, RValue, Stmt, StmtKind};
use crate::config::Config;
use crate::ram::Ram;
use crate::util::{atof, atoi};


// The result of any evaluation step.
pub type Result<T> = core::result::Result<T, Error>;


// All valid values.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Int(i64),
    Real(f64),
    Str(Rc<String>),
    Bool(bool),
    Ptr(i64),
}


#[derive(BitFlags, Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum TypeTag {
    None = 0b000001,
    Int  = 0b000010,
    Real = 0b000100,
    Str  = 0b001000,
    Bool = 0b010000,
    Ptr  = 0b100000,
}

pub type TypeSet = BitFlags<TypeTag>;


// An error raised by operator dispatch, before the statement line is
// known.
#[derive(Clone, Debug, PartialEq)]
pub enum OpError {
    Mismatch(TypeTag, TypeTag),
    ZeroDivision,
    BadOperator,
}

impl OpError {
    // Stamp with the line of the statement being executed.
    fn at(self, line: u32) -> Error {
        match self {
            OpError::Mismatch(_, _) => Error::InvalidOperands(line),
            OpError::ZeroDivision => Error::DivisionByZero(line),
            OpError::BadOperator => Error::InvalidOperator(line),
        }
    }
}

type OpResult = core::result::Result<Value, OpError>;

// Construct an OpError::Mismatch from two operands.
fn mismatch(a: &Value, b: &Value) -> OpError {
    OpError::Mismatch(a.get_type(), b.get_type())
}


// Factors out the boilerplate in operator method implementations.
//
// Each arm is one row of the type-promotion table; anything not
// listed is an operand-type error.
macro_rules! operator {
    ($name:ident { $( $p:pat => $e:expr ),+ $(,)? }) => {
        pub fn $name(&self, other: &Value) -> OpResult {
            use Value::*;
            match (self, other) {
                $($p => Ok($e)),+ ,
                (a, b) => Err(mismatch(a, b)),
            }
        }
    };
}


impl Value {
    pub fn get_type(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::None,
            Value::Int(_) => TypeTag::Int,
            Value::Real(_) => TypeTag::Real,
            Value::Str(_) => TypeTag::Str,
            Value::Bool(_) => TypeTag::Bool,
            Value::Ptr(_) => TypeTag::Ptr,
        }
    }

    operator! { add {
        (Int(a), Int(b)) => Int(a + b),
        (Real(a), Real(b)) => Real(a + b),
        (Int(a), Real(b)) => Real(*a as f64 + b),
        (Real(a), Int(b)) => Real(a + *b as f64),
        (Str(a), Str(b)) => Str(Rc::new(format!("{}{}", a, b))),
    } }

    operator! { sub {
        (Int(a), Int(b)) => Int(a - b),
        (Real(a), Real(b)) => Real(a - b),
        (Int(a), Real(b)) => Real(*a as f64 - b),
        (Real(a), Int(b)) => Real(a - *b as f64),
    } }

    operator! { mul {
        (Int(a), Int(b)) => Int(a * b),
        (Real(a), Real(b)) => Real(a * b),
        (Int(a), Real(b)) => Real(*a as f64 * b),
        (Real(a), Int(b)) => Real(a * *b as f64),
    } }

    // Exponentiation goes through floating math even for two ints,
    // truncating the result back toward zero.
    operator! { pow {
        (Int(a), Int(b)) => Int((*a as f64).powf(*b as f64) as i64),
        (Real(a), Real(b)) => Real(a.powf(*b)),
        (Int(a), Real(b)) => Real((*a as f64).powf(*b)),
        (Real(a), Int(b)) => Real(a.powf(*b as f64)),
    } }

    // Division and remainder are written out by hand: the integer
    // rows must reject a zero divisor, while the real rows follow
    // IEEE-754 and let Inf/NaN propagate.
    pub fn div(&self, other: &Value) -> OpResult {
        use Value::*;
        match (self, other) {
            (Int(_), Int(0)) => Err(OpError::ZeroDivision),
            (Int(a), Int(b)) => Ok(Int(a / b)),
            (Real(a), Real(b)) => Ok(Real(a / b)),
            (Int(a), Real(b)) => Ok(Real(*a as f64 / b)),
            (Real(a), Int(b)) => Ok(Real(a / *b as f64)),
            (a, b) => Err(mismatch(a, b)),
        }
    }

    pub fn modulo(&self, other: &Value) -> OpResult {
        use Value::*;
        match (self, other) {
            (Int(_), Int(0)) => Err(OpError::ZeroDivision),
            (Int(a), Int(b)) => Ok(Int(a % b)),
            (Real(a), Real(b)) => Ok(Real(a % b)),
            (Int(a), Real(b)) => Ok(Real(*a as f64 % b)),
            (Real(a), Int(b)) => Ok(Real(a % *b as f64)),
            (a, b) => Err(mismatch(a, b)),
        }
    }

    // Relational operators share one partial ordering: ints compare
    // exactly, numeric mixes compare as reals, strings compare
    // byte-lexicographically. NaN orders with nothing, so every
    // comparison against it is false except `!=`.
    fn partial_compare(
        &self,
        other: &Value
    ) -> core::result::Result<Option<Ordering>, OpError> {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => Ok(Some(a.cmp(b))),
            (Real(a), Real(b)) => Ok(a.partial_cmp(b)),
            (Int(a), Real(b)) => Ok((*a as f64).partial_cmp(b)),
            (Real(a), Int(b)) => Ok(a.partial_cmp(&(*b as f64))),
            (Str(a), Str(b)) => Ok(Some(a.cmp(b))),
            (a, b) => Err(mismatch(a, b)),
        }
    }

    fn relational(&self, op: Operator, other: &Value) -> OpResult {
        let ord = self.partial_compare(other)?;
        let truth = match op {
            Operator::Equal => ord == Some(Ordering::Equal),
            Operator::NotEqual => ord != Some(Ordering::Equal),
            Operator::Lt => ord == Some(Ordering::Less),
            Operator::Lte => {
                matches!(ord, Some(Ordering::Less) | Some(Ordering::Equal))
            }
            Operator::Gt => ord == Some(Ordering::Greater),
            Operator::Gte => {
                matches!(ord, Some(Ordering::Greater) | Some(Ordering::Equal))
            }
            _ => return Err(OpError::BadOperator),
        };
        Ok(Value::Bool(truth))
    }

    // Dispatch a binary operator to its implementation.
    pub fn binary(&self, op: Operator, other: &Value) -> OpResult {
        match op {
            Operator::Plus => self.add(other),
            Operator::Minus => self.sub(other),
            Operator::Asterisk => self.mul(other),
            Operator::Power => self.pow(other),
            Operator::Mod => self.modulo(other),
            Operator::Div => self.div(other),
            Operator::Equal
            | Operator::NotEqual
            | Operator::Lt
            | Operator::Lte
            | Operator::Gt
            | Operator::Gte => self.relational(op, other),
            Operator::Is | Operator::In => Err(OpError::BadOperator),
        }
    }
}


// A diagnostic tied to a source line. Display produces the exact
// message written to the console.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    NotDefined(String, u32),
    InvalidOperands(u32),
    InvalidOperator(u32),
    DivisionByZero(u32),
    InvalidIntString(u32),
    InvalidFloatString(u32),
    InvalidFunction(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotDefined(name, line) => write!(
                f,
                "**SEMANTIC ERROR: name '{}' is not defined (line {})",
                name, line
            ),
            Error::InvalidOperands(line) => write!(
                f,
                "**SEMANTIC ERROR: invalid operand types (line {})",
                line
            ),
            Error::InvalidOperator(line) => write!(
                f,
                "**SEMANTIC ERROR: invalid operator type (line {})",
                line
            ),
            Error::DivisionByZero(line) => write!(
                f,
                "**SEMANTIC ERROR: division by zero (line {})",
                line
            ),
            Error::InvalidIntString(line) => write!(
                f,
                "**SEMANTIC ERROR: invalid string for int() (line {})",
                line
            ),
            Error::InvalidFloatString(line) => write!(
                f,
                "**SEMANTIC ERROR: invalid string for float() (line {})",
                line
            ),
            Error::InvalidFunction(line) => write!(
                f,
                "**SEMANTIC ERROR: invalid function name (line {})",
                line
            ),
        }
    }
}


// The console seam: program output, prompts, and diagnostics on one
// side, input lines on the other.
pub trait Console {
    // Write raw text. No implicit newline.
    fn write(&mut self, text: &str);

    // Read one line from the input source, end-of-line stripped.
    fn read_line(&mut self) -> String;
}


// Console over the process's real standard streams.
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&mut self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        line
    }
}


// A while condition must land on a boolean-truthy integer: Bool(true)
// or Int(1) continue, Bool(false) and any other int stop.
fn truthy(value: &Value, line: u32) -> Result<bool> {
    let allowed: TypeSet = TypeTag::Int | TypeTag::Bool;
    if !allowed.contains(value.get_type()) {
        return Err(Error::InvalidOperands(line));
    }
    Ok(matches!(value, Value::Bool(true) | Value::Int(1)))
}


// int(): the all-zeros rule: a string of '0' characters (including
// the empty string) decodes to zero; any other string must produce a
// non-zero integer prefix.
fn int_from_str(text: &str, line: u32) -> Result<Value> {
    if text.chars().all(|c| c == '0') {
        return Ok(Value::Int(0));
    }
    match atoi(text) {
        0 => Err(Error::InvalidIntString(line)),
        n => Ok(Value::Int(n)),
    }
}

// float(): as int(), with '.' joining '0' in the all-zeros set.
fn float_from_str(text: &str, line: u32) -> Result<Value> {
    if text.chars().all(|c| c == '0' || c == '.') {
        return Ok(Value::Real(0.0));
    }
    let d = atof(text);
    if d != 0.0 {
        Ok(Value::Real(d))
    } else {
        Err(Error::InvalidFloatString(line))
    }
}


// The raw token text behind an element; input() uses it as a prompt.
fn element_text(element: &Element) -> &str {
    match element {
        Element::IntLiteral(text) => text,
        Element::RealLiteral(text) => text,
        Element::StrLiteral(text) => text,
        Element::Identifier(text) => text,
        Element::True => "True",
        Element::False => "False",
        Element::None => "None",
    }
}


// The statement executor. Holds the console and output formatting;
// memory is always passed in explicitly.
pub struct Interp<'a, C: Console> {
    console: &'a mut C,
    precision: usize,
}

impl<'a, C: Console> Interp<'a, C> {
    pub fn new(console: &'a mut C, config: &Config) -> Interp<'a, C> {
        Interp {
            console,
            precision: config.real_precision,
        }
    }

    // Execute the program to completion or to the first semantic
    // error. The error is reported on the console, never propagated:
    // the caller always gets control back cleanly.
    pub fn execute(&mut self, program: &[Stmt], memory: &mut Ram) {
        if let Err(e) = self.run(program, memory) {
            self.console.write(&format!("{}\n", e));
        }
    }

    fn run(&mut self, program: &[Stmt], memory: &mut Ram) -> Result<()> {
        for stmt in program {
            trace!("line {}: {:?}", stmt.line, stmt.kind);
            match &stmt.kind {
                StmtKind::Assignment { var_name, rhs } => {
                    self.exec_assignment(stmt.line, var_name, rhs, memory)?;
                }
                StmtKind::FunctionCall(call) => {
                    self.exec_call(stmt.line, call, memory)?;
                }
                StmtKind::WhileLoop { condition, body } => {
                    let value = self.eval_expr(stmt.line, condition, memory)?;
                    if truthy(&value, stmt.line)? {
                        // The body runs once; the outer walk does not
                        // resume afterwards.
                        return self.run(body, memory);
                    }
                }
                StmtKind::Pass => (),
            }
        }
        Ok(())
    }

    // A failed right-hand side leaves memory untouched.
    fn exec_assignment(
        &mut self,
        line: u32,
        var_name: &str,
        rhs: &RValue,
        memory: &mut Ram
    ) -> Result<()> {
        let value = match rhs {
            RValue::Expr(expr) => self.eval_expr(line, expr, memory)?,
            RValue::Call(call) => self.eval_rhs_call(line, call, memory)?,
        };
        memory.write_by_name(var_name, value);
        Ok(())
    }

    // The only function allowed at statement position is print. Its
    // argument is a single element, not an expression.
    fn exec_call(
        &mut self,
        line: u32,
        call: &FunctionCall,
        memory: &Ram
    ) -> Result<()> {
        if call.name != "print" {
            return Err(Error::InvalidFunction(line));
        }
        match &call.parameter {
            None => self.console.write("\n"),
            Some(element) => {
                let value = self.element_value(line, element, memory)?;
                let text = self.format_value(&value);
                self.console.write(&format!("{}\n", text));
            }
        }
        Ok(())
    }

    fn eval_expr(
        &mut self,
        line: u32,
        expr: &Expr,
        memory: &Ram
    ) -> Result<Value> {
        match expr {
            Expr::Unary(element) => self.element_value(line, element, memory),
            Expr::Binary(lhs, op, rhs) => {
                let lhs = self.element_value(line, lhs, memory)?;
                let rhs = self.element_value(line, rhs, memory)?;
                lhs.binary(*op, &rhs).map_err(|e| e.at(line))
            }
        }
    }

    // Literals decode here, every time they are evaluated. An
    // identifier reads a copy out of memory.
    fn element_value(
        &self,
        line: u32,
        element: &Element,
        memory: &Ram
    ) -> Result<Value> {
        match element {
            Element::IntLiteral(text) => Ok(Value::Int(atoi(text))),
            Element::RealLiteral(text) => Ok(Value::Real(atof(text))),
            Element::StrLiteral(text) => {
                Ok(Value::Str(Rc::new(text.clone())))
            }
            Element::True => Ok(Value::Bool(true)),
            Element::False => Ok(Value::Bool(false)),
            Element::None => Ok(Value::None),
            Element::Identifier(name) => memory
                .read_by_name(name)
                .ok_or_else(|| Error::NotDefined(name.clone(), line)),
        }
    }

    // Function calls recognized on the right-hand side of an
    // assignment: input, int, float.
    fn eval_rhs_call(
        &mut self,
        line: u32,
        call: &FunctionCall,
        memory: &Ram
    ) -> Result<Value> {
        match call.name.as_str() {
            "input" => Ok(self.input(call.parameter.as_ref())),
            "int" => match self.argument_value(line, call, memory)? {
                Value::Str(s) => int_from_str(&s, line),
                _ => Err(Error::InvalidIntString(line)),
            },
            "float" => match self.argument_value(line, call, memory)? {
                Value::Str(s) => float_from_str(&s, line),
                _ => Err(Error::InvalidFloatString(line)),
            },
            _ => Err(Error::InvalidFunction(line)),
        }
    }

    // input(prompt): the prompt plus a space, then one line from the
    // console.
    fn input(&mut self, prompt: Option<&Element>) -> Value {
        let text = match prompt {
            Some(element) => element_text(element),
            None => "",
        };
        self.console.write(&format!("{} ", text));
        Value::Str(Rc::new(self.console.read_line()))
    }

    // int() and float() take the name of a variable to convert.
    fn argument_value(
        &self,
        line: u32,
        call: &FunctionCall,
        memory: &Ram
    ) -> Result<Value> {
        match &call.parameter {
            Some(Element::Identifier(name)) => memory
                .read_by_name(name)
                .ok_or_else(|| Error::NotDefined(name.clone(), line)),
            _ => Err(Error::InvalidFunction(line)),
        }
    }

    // Render a value the way print does.
    fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Int(i) => i.to_string(),
            Value::Real(d) => format!("{:.*}", self.precision, d),
            Value::Str(s) => s.to_string(),
            Value::Bool(true) => String::from("True"),
            Value::Bool(false) => String::from("False"),
            Value::None => String::from("None"),
            Value::Ptr(p) => p.to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use std::collections::VecDeque;
    use Value::*;

    // A scripted console: canned input lines, captured output.
    struct TestConsole {
        output: String,
        input: VecDeque<String>,
    }

    impl TestConsole {
        fn new(input: &[&str]) -> TestConsole {
            TestConsole {
                output: String::new(),
                input: input.iter().map(|s| String::from(*s)).collect(),
            }
        }
    }

    impl Console for TestConsole {
        fn write(&mut self, text: &str) {
            self.output.push_str(text);
        }

        fn read_line(&mut self) -> String {
            self.input.pop_front().unwrap_or_default()
        }
    }

    fn s(text: &str) -> Value {
        Str(Rc::new(String::from(text)))
    }

    fn run_program(source: &str, input: &[&str]) -> (String, Ram) {
        let mut bytes = source.as_bytes();
        let program = parser::parse(&mut bytes).expect("program should parse");
        let mut memory = Ram::new();
        let mut console = TestConsole::new(input);
        let config = Config::default();
        Interp::new(&mut console, &config).execute(&program, &mut memory);
        (console.output, memory)
    }

    fn output_of(source: &str) -> String {
        run_program(source, &[]).0
    }

    #[test]
    fn test_arithmetic_promotion() {
        assert_eq!(Int(1).add(&Real(2.0)), Ok(Real(3.0)));
        assert_eq!(Real(2.0).add(&Int(1)), Ok(Real(3.0)));
        assert_eq!(Int(1).add(&Int(2)), Ok(Int(3)));
        assert_eq!(Real(1.5).add(&Real(2.5)), Ok(Real(4.0)));
        assert_eq!(Int(7).sub(&Int(3)), Ok(Int(4)));
        assert_eq!(Int(3).mul(&Real(2.0)), Ok(Real(6.0)));
    }

    #[test]
    fn test_string_concat() {
        assert_eq!(s("a").add(&s("b")), Ok(s("ab")));
        assert_eq!(
            s("a").sub(&s("b")),
            Err(OpError::Mismatch(TypeTag::Str, TypeTag::Str))
        );
        assert_eq!(
            s("a").mul(&s("b")),
            Err(OpError::Mismatch(TypeTag::Str, TypeTag::Str))
        );
    }

    #[test]
    fn test_bool_does_not_promote() {
        assert_eq!(
            Bool(true).add(&Int(1)),
            Err(OpError::Mismatch(TypeTag::Bool, TypeTag::Int))
        );
        assert_eq!(
            Bool(true).relational(Operator::Equal, &Bool(true)),
            Err(OpError::Mismatch(TypeTag::Bool, TypeTag::Bool))
        );
    }

    #[test]
    fn test_division() {
        assert_eq!(Int(7).div(&Int(2)), Ok(Int(3)));
        assert_eq!(Int(7).div(&Int(0)), Err(OpError::ZeroDivision));
        assert_eq!(Int(7).modulo(&Int(0)), Err(OpError::ZeroDivision));
        // Real division follows IEEE-754.
        match Real(1.0).div(&Int(0)) {
            Ok(Real(d)) => assert!(d.is_infinite()),
            other => panic!("expected Inf, got {:?}", other),
        }
        match Real(0.0).div(&Real(0.0)) {
            Ok(Real(d)) => assert!(d.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_modulo() {
        assert_eq!(Int(7).modulo(&Int(3)), Ok(Int(1)));
        assert_eq!(Int(-7).modulo(&Int(3)), Ok(Int(-1)));
        assert_eq!(Real(7.5).modulo(&Int(2)), Ok(Real(1.5)));
    }

    #[test]
    fn test_power_truncates_for_ints() {
        assert_eq!(Int(2).pow(&Int(10)), Ok(Int(1024)));
        assert_eq!(Int(2).pow(&Int(-1)), Ok(Int(0)));
        assert_eq!(Real(2.0).pow(&Int(3)), Ok(Real(8.0)));
    }

    #[test]
    fn test_relational() {
        assert_eq!(Real(2.0).relational(Operator::Equal, &Int(2)), Ok(Bool(true)));
        assert_eq!(Int(1).relational(Operator::Lt, &Real(1.5)), Ok(Bool(true)));
        assert_eq!(Int(2).relational(Operator::Gte, &Int(2)), Ok(Bool(true)));
        assert_eq!(s("abc").relational(Operator::Lt, &s("abd")), Ok(Bool(true)));
        assert_eq!(s("a").relational(Operator::Equal, &s("a")), Ok(Bool(true)));
        assert_eq!(
            Int(1).relational(Operator::Equal, &s("1")),
            Err(OpError::Mismatch(TypeTag::Int, TypeTag::Str))
        );
    }

    #[test]
    fn test_nan_comparisons() {
        let nan = Real(f64::NAN);
        assert_eq!(nan.relational(Operator::Equal, &nan), Ok(Bool(false)));
        assert_eq!(nan.relational(Operator::NotEqual, &nan), Ok(Bool(true)));
        assert_eq!(nan.relational(Operator::Lt, &Real(1.0)), Ok(Bool(false)));
        assert_eq!(nan.relational(Operator::Gte, &Real(1.0)), Ok(Bool(false)));
    }

    #[test]
    fn test_is_and_in_are_invalid() {
        assert_eq!(Int(1).binary(Operator::Is, &Int(1)), Err(OpError::BadOperator));
        assert_eq!(Int(1).binary(Operator::In, &Int(1)), Err(OpError::BadOperator));
    }

    #[test]
    fn test_int_from_str_rules() {
        assert_eq!(int_from_str("7", 1), Ok(Int(7)));
        assert_eq!(int_from_str("-5", 1), Ok(Int(-5)));
        assert_eq!(int_from_str("0", 1), Ok(Int(0)));
        assert_eq!(int_from_str("00", 1), Ok(Int(0)));
        assert_eq!(int_from_str("", 1), Ok(Int(0)));
        // The decoded prefix wins even with trailing junk.
        assert_eq!(int_from_str("12abc", 1), Ok(Int(12)));
        assert_eq!(int_from_str("abc", 1), Err(Error::InvalidIntString(1)));
        assert_eq!(int_from_str("0x", 1), Err(Error::InvalidIntString(1)));
    }

    #[test]
    fn test_float_from_str_rules() {
        assert_eq!(float_from_str("3.14", 1), Ok(Real(3.14)));
        assert_eq!(float_from_str("0.0", 1), Ok(Real(0.0)));
        assert_eq!(float_from_str("000", 1), Ok(Real(0.0)));
        assert_eq!(float_from_str(".", 1), Ok(Real(0.0)));
        assert_eq!(float_from_str("abc", 1), Err(Error::InvalidFloatString(1)));
    }

    #[test]
    fn test_truthy() {
        assert_eq!(truthy(&Bool(true), 1), Ok(true));
        assert_eq!(truthy(&Bool(false), 1), Ok(false));
        assert_eq!(truthy(&Int(1), 1), Ok(true));
        assert_eq!(truthy(&Int(0), 1), Ok(false));
        assert_eq!(truthy(&Int(5), 1), Ok(false));
        assert_eq!(truthy(&Real(1.0), 1), Err(Error::InvalidOperands(1)));
    }

    #[test]
    fn test_assignment_and_print() {
        assert_eq!(output_of("x = 5\ny = x + 3\nprint(y)\n"), "8\n");
    }

    #[test]
    fn test_string_program() {
        assert_eq!(
            output_of("s = \"hi\"\nt = s + \"!\"\nprint(t)\n"),
            "hi!\n"
        );
    }

    #[test]
    fn test_undefined_name() {
        assert_eq!(
            output_of("print(z)\n"),
            "**SEMANTIC ERROR: name 'z' is not defined (line 1)\n"
        );
    }

    #[test]
    fn test_real_formatting() {
        assert_eq!(
            output_of("x = 2\ny = 3.0\nz = x + y\nprint(z)\n"),
            "5.000000\n"
        );
    }

    #[test]
    fn test_int_conversion_program() {
        assert_eq!(
            output_of("a = \"7\"\nb = int(a)\nc = b + 1\nprint(c)\n"),
            "8\n"
        );
    }

    #[test]
    fn test_while_runs_body_once() {
        assert_eq!(
            output_of("i = 1\nwhile i < 3:\n{\nprint(i)\ni = i + 1\n}\n"),
            "1\n"
        );
    }

    #[test]
    fn test_while_false_falls_through() {
        assert_eq!(
            output_of("i = 5\nwhile i < 3:\n{\nprint(i)\n}\nprint(i)\n"),
            "5\n"
        );
    }

    #[test]
    fn test_statements_after_taken_loop_do_not_run() {
        assert_eq!(
            output_of(
                "i = 1\nwhile i == 1:\n{\nprint(i)\n}\nprint(i)\n"
            ),
            "1\n"
        );
    }

    #[test]
    fn test_input_program() {
        let (output, memory) = run_program(
            "name = input('who?')\nprint(name)\n",
            &["bob"],
        );
        assert_eq!(output, "who? bob\n");
        assert_eq!(memory.read_by_name("name"), Some(s("bob")));
    }

    #[test]
    fn test_print_variants() {
        assert_eq!(output_of("print(5)\n"), "5\n");
        assert_eq!(output_of("print(007)\n"), "7\n");
        assert_eq!(output_of("print(2.5)\n"), "2.500000\n");
        assert_eq!(output_of("print('hi')\n"), "hi\n");
        assert_eq!(output_of("print(True)\n"), "True\n");
        assert_eq!(output_of("print()\n"), "\n");
        assert_eq!(output_of("x = None\nprint(x)\n"), "None\n");
        assert_eq!(output_of("b = 2.0 == 2\nprint(b)\n"), "True\n");
    }

    #[test]
    fn test_division_by_zero_diagnostic() {
        assert_eq!(
            output_of("x = 1\ny = x / 0\nprint(y)\n"),
            "**SEMANTIC ERROR: division by zero (line 2)\n"
        );
    }

    #[test]
    fn test_invalid_operand_diagnostic() {
        assert_eq!(
            output_of("x = 1 + 'a'\n"),
            "**SEMANTIC ERROR: invalid operand types (line 1)\n"
        );
    }

    #[test]
    fn test_invalid_operator_diagnostic() {
        assert_eq!(
            output_of("x = 1 is 2\n"),
            "**SEMANTIC ERROR: invalid operator type (line 1)\n"
        );
    }

    #[test]
    fn test_invalid_function_diagnostics() {
        assert_eq!(
            output_of("x = foo(1)\n"),
            "**SEMANTIC ERROR: invalid function name (line 1)\n"
        );
        assert_eq!(
            output_of("foo(1)\n"),
            "**SEMANTIC ERROR: invalid function name (line 1)\n"
        );
    }

    #[test]
    fn test_bad_conversion_diagnostics() {
        assert_eq!(
            output_of("a = 'junk'\nb = int(a)\n"),
            "**SEMANTIC ERROR: invalid string for int() (line 2)\n"
        );
        assert_eq!(
            output_of("a = 'junk'\nb = float(a)\n"),
            "**SEMANTIC ERROR: invalid string for float() (line 2)\n"
        );
        assert_eq!(
            output_of("b = int(a)\n"),
            "**SEMANTIC ERROR: name 'a' is not defined (line 1)\n"
        );
    }

    #[test]
    fn test_error_stops_execution() {
        let (output, memory) = run_program(
            "x = 5\ny = z + 1\nprint(x)\n",
            &[],
        );
        assert_eq!(
            output,
            "**SEMANTIC ERROR: name 'z' is not defined (line 2)\n"
        );
        // The failed assignment left memory unchanged.
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.read_by_name("x"), Some(Int(5)));
        assert!(memory.read_by_name("y").is_none());
    }

    #[test]
    fn test_float_conversion_program() {
        let (output, memory) = run_program(
            "a = '2.5'\nb = float(a)\nc = b * 2\nprint(c)\n",
            &[],
        );
        assert_eq!(output, "5.000000\n");
        assert_eq!(memory.read_by_name("b"), Some(Real(2.5)));
    }

    #[test]
    fn test_pass_and_blank_lines() {
        assert_eq!(output_of("pass\n\nx = 1\nprint(x)\n"), "1\n");
    }

    #[test]
    fn test_memory_after_run() {
        let (_, memory) = run_program(
            "x = 5\ns = 'hi'\nflag = True\n",
            &[],
        );
        assert_eq!(memory.get_addr("x"), Some(0));
        assert_eq!(memory.get_addr("s"), Some(1));
        assert_eq!(memory.get_addr("flag"), Some(2));
        assert_eq!(memory.read_by_name("flag"), Some(Bool(true)));
    }

    #[test]
    fn test_determinism() {
        let source = "x = 1\ny = x + 2\nprint(y)\nprint('done')\n";
        assert_eq!(output_of(source), output_of(source));
    }
}
