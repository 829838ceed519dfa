fn main() {
    if let Err(e) = noobie::cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
