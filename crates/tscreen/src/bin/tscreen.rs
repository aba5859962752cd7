fn main() -> anyhow::Result<()> {
    let result = tscreen::player::run();

    // Make sure nothing is left buffered before an error is printed
    use std::io::{self, Write};
    let _ = io::stderr().flush();
    let _ = io::stdout().flush();

    result
}
