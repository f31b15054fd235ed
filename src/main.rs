fn main() -> anyhow::Result<()> {
    policy_keeper::cli::run()
}
