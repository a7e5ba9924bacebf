//! The `quizbank init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizbank.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("banks").context("failed to create banks/")?;
    write_if_missing(Path::new("banks/example.txt"), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Add your own questions to banks/example.txt (or a new file)");
    println!("  2. Run: quizbank validate --bank banks/example.txt");
    println!("  3. Run: quizbank run");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizbank configuration

default_bank = "banks/example.txt"
default_certification = "shell101"
default_block = "all"
default_count = 10
default_feedback = "immediate"

[[certifications]]
id = "shell101"
title = "Shell Basics"

[[certifications.blocks]]
id = 1
name = "Navigation"

[[certifications.blocks]]
id = 2
name = "Files and permissions"
"#;

const EXAMPLE_BANK: &str = "\
// quizbank question file
// #BLOCK n   tags the following questions with block n
// Q: text    starts a question; plain lines after it extend the text
// A) text    an option; put * before the text to mark it correct
// <image>path</image> attaches a reference image
// A blank line ends a question.

#BLOCK 1
Q: Which command prints the current working directory?
A) cd
B) *pwd
C) ls
D) echo

Q: What does `cd ..` do?
A) Opens the parent directory in a file manager
B) *Moves to the parent directory
C) Lists the parent directory
D) Deletes the current directory

#BLOCK 2
Q: Which of these commands change file permissions or ownership?
A) *chmod
B) *chown
C) cat
D) touch

Q: In the permission string `-rwxr-x---`, what may members
of the owning group do?
A) Read, write and execute
B) *Read and execute
C) Nothing
";
