use clap::CommandFactory;
use clap_complete::{generate_to, shells};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    generate_docs_for_binary(&out_dir, cli::TypegenArgs::command(), "schema-typegen")?;

    Ok(())
}

/// Man page under `man/man1`, completions for every shell clap_complete knows
fn generate_docs_for_binary(out_dir: &Path, mut cmd: clap::Command, bin_name: &str) -> Result<()> {
    let man_dir = out_dir.join("man").join("man1");
    fs::create_dir_all(&man_dir)?;

    let mut page = Vec::new();
    Man::new(cmd.clone()).render(&mut page)?;
    fs::write(man_dir.join(format!("{bin_name}.1")), page)?;

    let comp_dir = out_dir.join("completions");
    fs::create_dir_all(&comp_dir)?;

    for shell in [
        shells::Shell::Bash,
        shells::Shell::Elvish,
        shells::Shell::Fish,
        shells::Shell::PowerShell,
        shells::Shell::Zsh,
    ] {
        generate_to(shell, &mut cmd, bin_name, &comp_dir)?;
    }

    Ok(())
}
