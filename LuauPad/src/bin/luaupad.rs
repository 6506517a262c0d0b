fn main() -> anyhow::Result<()> {
    luaupad::cli::run_cli()
}
