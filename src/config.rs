// Run options, loaded from a RON file.
//
// Every field has a default, so a config file only lists what it
// overrides, and running without one is always possible.

use std::error::Error;
use std::fs::File;

use ron::de::from_reader;
use serde::Deserialize;


#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // Fractional digits printed for real values.
    pub real_precision: usize,
    // Print the memory dump after execution.
    pub dump_memory: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            real_precision: 6,
            dump_memory: true,
        }
    }
}


pub fn load(path: &str) -> Result<Config, Box<dyn Error>> {
    let reader = File::open(path)?;
    Ok(from_reader(reader)?)
}
