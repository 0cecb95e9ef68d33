// Flat, name-keyed variable storage.
//
// Cells keep their insertion order, so the address of a name never
// changes once assigned and the debug dump is deterministic. Lookup
// is a linear scan; programs in this language are small.

use std::fmt;

use crate::vm::Value;


// A name/value slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub name: String,
    pub value: Value,
}


pub struct Ram {
    cells: Vec<Cell>,
    capacity: usize,
}


impl Ram {
    pub fn new() -> Ram {
        Ram {
            cells: Vec::with_capacity(4),
            capacity: 4,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // The address of a name, if it has ever been written. First
    // match wins.
    pub fn get_addr(&self, name: &str) -> Option<usize> {
        self.cells.iter().position(|cell| cell.name == name)
    }

    // A copy of the value at the given address. The copy is
    // independent of the store: overwriting the cell afterwards does
    // not change it.
    pub fn read_by_addr(&self, addr: usize) -> Option<Value> {
        self.cells.get(addr).map(|cell| cell.value.clone())
    }

    pub fn read_by_name(&self, name: &str) -> Option<Value> {
        self.read_by_addr(self.get_addr(name)?)
    }

    // Overwrite an existing cell. False when no cell exists at the
    // address.
    pub fn write_by_addr(&mut self, addr: usize, value: Value) -> bool {
        match self.cells.get_mut(addr) {
            Some(cell) => {
                cell.value = value;
                true
            }
            None => false,
        }
    }

    // Overwrite in place, or append a new cell for an unseen name.
    // Capacity doubles when full. Never fails.
    pub fn write_by_name(&mut self, name: &str, value: Value) {
        match self.get_addr(name) {
            Some(addr) => self.cells[addr].value = value,
            None => {
                if self.cells.len() == self.capacity {
                    self.capacity *= 2;
                }
                self.cells.push(Cell {
                    name: String::from(name),
                    value,
                });
            }
        }
    }
}


// The debug memory dump.
impl fmt::Display for Ram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "**MEMORY PRINT**")?;
        writeln!(f, "Capacity: {}", self.capacity)?;
        writeln!(f, "Num values: {}", self.cells.len())?;
        writeln!(f, "Contents:")?;
        for (addr, cell) in self.cells.iter().enumerate() {
            write!(f, " {}: {}, ", addr, cell.name)?;
            match &cell.value {
                Value::Int(i) => writeln!(f, "int, {}", i)?,
                Value::Real(d) => writeln!(f, "real, {:.6}", d)?,
                Value::Str(s) => writeln!(f, "str, '{}'", s)?,
                Value::Bool(true) => writeln!(f, "boolean, True")?,
                Value::Bool(false) => writeln!(f, "boolean, False")?,
                Value::Ptr(p) => writeln!(f, "ptr, {}", p)?,
                Value::None => writeln!(f, "none, None")?,
            }
        }
        writeln!(f, "**END PRINT**")
    }
}
