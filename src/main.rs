fn main() -> anyhow::Result<()> {
    account_book::cli::run_cli()
}
