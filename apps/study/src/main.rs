fn main() -> anyhow::Result<()> {
    swipe_study::run()
}
