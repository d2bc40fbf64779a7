fn main() -> anyhow::Result<()> {
    bafscript_rust::run()
}
