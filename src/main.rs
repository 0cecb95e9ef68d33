// uPython: featherweight interpreter for a small Python-ish language.
//
// Copyright (C) 2019  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

use std::env::args;
use std::fs::File;
use std::io::{self, BufReader};

use upython::ast::Program;
use upython::config::{self, Config};
use upython::parser::{self, ParseResult};
use upython::ram::Ram;
use upython::vm::{Interp, StdConsole};


// Parse the program from the named file, or interactively from the
// keyboard until the `$` sentinel.
fn parse_program(path: Option<String>) -> Option<ParseResult<Program>> {
    match path {
        Some(path) => {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(_) => {
                    println!(
                        "**ERROR: unable to open input file '{}' for input.",
                        path
                    );
                    return None;
                }
            };
            Some(parser::parse(&mut BufReader::new(file)))
        }
        None => {
            println!("upython input (enter $ when you're done)>");
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            Some(parser::parse(&mut lock))
        }
    }
}

fn main() {
    let config = match args().nth(2) {
        Some(path) => config::load(&path).expect("couldn't load config"),
        None => Config::default(),
    };

    let program = match parse_program(args().nth(1)) {
        Some(Ok(program)) => program,
        Some(Err(e)) => {
            println!("{}", e);
            println!("**parsing failed...");
            return;
        }
        None => return,
    };

    println!("**parsing successful, valid syntax");
    println!("**building program graph...");
    println!("**executing...");

    let mut memory = Ram::new();
    let mut console = StdConsole;
    Interp::new(&mut console, &config).execute(&program, &mut memory);

    println!("**done");
    if config.dump_memory {
        print!("{}", memory);
    }
}
