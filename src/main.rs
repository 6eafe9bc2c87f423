fn main() {
    mupl::cli::run();
}
