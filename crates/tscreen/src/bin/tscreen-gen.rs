fn main() -> anyhow::Result<()> {
    tscreen::generator::run()
}
