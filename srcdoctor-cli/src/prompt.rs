//! stdin-backed prompt for the interactive mode.

use std::io::{self, BufRead, Write};

use srcdoctor_core::{PromptChoice, UserPrompt};

pub struct StdinPrompt;

impl UserPrompt for StdinPrompt {
    fn show(&mut self, text: &str) {
        println!("{text}");
    }

    fn choose(&mut self) -> anyhow::Result<PromptChoice> {
        let stdin = io::stdin();
        loop {
            print!("Apply this fix? [y]es / [n]o / [q]uit: ");
            io::stdout().flush()?;

            let mut line = String::new();
            let n = stdin.lock().read_line(&mut line)?;
            if n == 0 {
                // stdin closed; treat like quit rather than spinning.
                return Ok(PromptChoice::Quit);
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(PromptChoice::Apply),
                "n" | "no" | "s" | "skip" => return Ok(PromptChoice::Skip),
                "q" | "quit" => return Ok(PromptChoice::Quit),
                other => println!("Unrecognized answer '{other}'."),
            }
        }
    }
}
