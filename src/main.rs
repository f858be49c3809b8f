fn main() {
    if let Err(err) = reviewer_allocation::run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
