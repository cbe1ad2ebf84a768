//! Binary entry point for `graft`.

fn main() {
    if let Err(err) = graftwork::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
