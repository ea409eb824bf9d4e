use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs only needs clap + clap_complete, both listed as
// build-dependencies, so it can be compiled on its own here.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    let root = cli::Cli::command();
    write_man_page(&root, &man_dir);
    for sub in root.get_subcommands().filter(|s| !s.is_hide_set()) {
        let page = sub.clone().name(format!("netinv-{}", sub.get_name()));
        write_man_page(&page, &man_dir);
    }
}

fn write_man_page(cmd: &clap::Command, dir: &Path) {
    let name = cmd.get_name().to_owned();
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut buf)
        .unwrap_or_else(|e| panic!("failed to render man page for `{name}`: {e}"));
    let path = dir.join(format!("{name}.1"));
    fs::write(&path, buf).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
